// Jaskier Shared Pattern -- error
//! Tool error taxonomy and the uniform result envelope.
//!
//! Every tool invocation resolves to a `ToolEnvelope` — `{ok: true, data}`
//! on success, `{ok: false, error: {kind, message}}` on failure. No error is
//! allowed to escape the envelope and terminate the bridge; a failed
//! invocation never affects concurrent or subsequent ones.

use serde::Serialize;
use serde_json::Value;

/// Max bytes of an upstream error body carried in the envelope.
const MAX_BODY_EXCERPT: usize = 500;

/// Everything that can go wrong during a single tool invocation.
/// Logged server-side in full; clients see kind + sanitized message only.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// Bad or missing arguments — rejected before any upstream call.
    #[error("{0}")]
    Validation(String),

    /// Tool name not present in the registry.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// A credential the tool requires is not configured.
    #[error("{0}")]
    AuthMissing(String),

    /// Upstream answered with a non-2xx status.
    #[error("Upstream returned HTTP {status}: {body_excerpt}")]
    Upstream { status: u16, body_excerpt: String },

    /// The fixed per-call deadline elapsed.
    #[error("Upstream call timed out after {0}s")]
    Timeout(u64),

    /// Connection-level failure (DNS, refused, reset).
    #[error("Upstream unreachable: {0}")]
    Network(String),
}

impl ToolError {
    /// Machine-readable error kind for the envelope.
    pub fn kind(&self) -> &'static str {
        match self {
            ToolError::Validation(_) => "ValidationError",
            ToolError::UnknownTool(_) => "UnknownTool",
            ToolError::AuthMissing(_) => "AuthMissing",
            ToolError::Upstream { .. } => "UpstreamError",
            ToolError::Timeout(_) => "TimeoutError",
            ToolError::Network(_) => "NetworkError",
        }
    }

    /// Build an `Upstream` error from a status code and raw body text.
    pub fn upstream(status: u16, body: &str) -> Self {
        ToolError::Upstream {
            status,
            body_excerpt: truncate_str(body, MAX_BODY_EXCERPT),
        }
    }
}

/// The uniform success/error wrapper returned for every tool invocation.
#[derive(Debug, Serialize)]
pub struct ToolEnvelope {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<EnvelopeError>,
}

#[derive(Debug, Serialize)]
pub struct EnvelopeError {
    pub kind: &'static str,
    pub message: String,
}

impl ToolEnvelope {
    pub fn success(data: Value) -> Self {
        Self { ok: true, data: Some(data), error: None }
    }

    pub fn failure(err: ToolError) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(EnvelopeError { kind: err.kind(), message: err.to_string() }),
        }
    }
}

impl From<Result<Value, ToolError>> for ToolEnvelope {
    fn from(result: Result<Value, ToolError>) -> Self {
        match result {
            Ok(data) => ToolEnvelope::success(data),
            Err(e) => ToolEnvelope::failure(e),
        }
    }
}

/// Truncate at a char boundary, appending `...` when cut.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        let boundary = s
            .char_indices()
            .take_while(|(i, _)| *i < max_len)
            .last()
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(max_len);
        format!("{}...", &s[..boundary])
    }
}
