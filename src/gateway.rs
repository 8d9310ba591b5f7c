//! Tool-dispatch gateway.
//!
//! The registry is a declarative table built once at startup: tool name →
//! (parameter schema, required credential, handler). Dispatch validates the
//! arguments against the schema, checks the credential is configured, runs
//! the handler, and wraps the outcome in the uniform envelope. The gateway
//! holds no mutable state — concurrent invocations share only the immutable
//! `Config` behind the `UpstreamClient`.
//!
//! Per-invocation path: Received → Validated → Dispatched → Completed, or
//! Received → Rejected (unknown name / schema mismatch / missing credential).

use futures_util::future::BoxFuture;
use serde_json::Value;
use uuid::Uuid;

use crate::error::{ToolEnvelope, ToolError};
use crate::upstream::UpstreamClient;

/// Handler signature: pure function of (upstream client, arguments).
/// Plain `fn` pointers — no captured state, enumerable at compile time.
pub type Handler =
    for<'a> fn(&'a UpstreamClient, Value) -> BoxFuture<'a, Result<Value, ToolError>>;

/// Which outbound credential a tool needs before it may dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialKind {
    /// LEGION platform JWT (`LEGION_AUTH_TOKEN`).
    Crm,
    /// GitHub token + configured repository.
    GitHub,
    /// No credential — e.g. the health probe.
    None,
}

/// What a tool exposes to the transport: name, description, JSON Schema.
#[derive(Debug, Clone)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
}

/// One registry row: descriptor + credential requirement + handler.
pub struct ToolEntry {
    pub descriptor: ToolDescriptor,
    pub credential: CredentialKind,
    handler: Handler,
}

impl ToolEntry {
    pub fn new(descriptor: ToolDescriptor, credential: CredentialKind, handler: Handler) -> Self {
        Self { descriptor, credential, handler }
    }
}

/// Static mapping from tool name to entry. Built once, never mutated.
pub struct ToolRegistry {
    entries: Vec<ToolEntry>,
}

impl ToolRegistry {
    /// Panics on duplicate names. Registration happens once, at startup.
    pub fn new(entries: Vec<ToolEntry>) -> Self {
        for (i, a) in entries.iter().enumerate() {
            for b in &entries[i + 1..] {
                assert_ne!(
                    a.descriptor.name, b.descriptor.name,
                    "duplicate tool registered"
                );
            }
        }
        Self { entries }
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &ToolDescriptor> {
        self.entries.iter().map(|e| &e.descriptor)
    }

    fn lookup(&self, name: &str) -> Option<&ToolEntry> {
        self.entries.iter().find(|e| e.descriptor.name == name)
    }

    /// Dispatch one invocation. Never panics, never escapes the envelope.
    pub async fn invoke(&self, upstream: &UpstreamClient, name: &str, args: Value) -> ToolEnvelope {
        let invocation = Uuid::new_v4();
        tracing::debug!(tool = %name, %invocation, "dispatch: received");

        let entry = match self.lookup(name) {
            Some(e) => e,
            None => {
                tracing::debug!(tool = %name, %invocation, "dispatch: rejected (unknown tool)");
                return ToolEnvelope::failure(ToolError::UnknownTool(name.to_string()));
            }
        };

        if let Err(e) = validate_args(&entry.descriptor.input_schema, &args) {
            tracing::debug!(tool = %name, %invocation, error = %e, "dispatch: rejected");
            return ToolEnvelope::failure(e);
        }

        if let Err(e) = check_credential(entry.credential, upstream) {
            tracing::debug!(tool = %name, %invocation, error = %e, "dispatch: rejected");
            return ToolEnvelope::failure(e);
        }

        tracing::debug!(tool = %name, %invocation, "dispatch: validated, calling handler");
        let result = (entry.handler)(upstream, args).await;

        match &result {
            Ok(_) => tracing::debug!(tool = %name, %invocation, "dispatch: completed"),
            Err(e) => {
                tracing::warn!(tool = %name, %invocation, kind = e.kind(), error = %e, "dispatch: tool failed")
            }
        }
        result.into()
    }
}

/// Reject a tool whose outbound credential is absent before any request is
/// built.
fn check_credential(kind: CredentialKind, upstream: &UpstreamClient) -> Result<(), ToolError> {
    let config = upstream.config();
    match kind {
        CredentialKind::Crm if !config.has_crm_auth() => Err(ToolError::AuthMissing(
            "LEGION_AUTH_TOKEN not configured".to_string(),
        )),
        CredentialKind::GitHub if config.github_token.is_none() => Err(ToolError::AuthMissing(
            "GITHUB_TOKEN not configured".to_string(),
        )),
        CredentialKind::GitHub if config.github_repo.is_none() => Err(ToolError::AuthMissing(
            "GITHUB_REPO not configured".to_string(),
        )),
        _ => Ok(()),
    }
}

/// Check `args` against the descriptor's JSON Schema: every `required`
/// property present, every supplied property of the declared type. All
/// missing fields are reported in one message.
pub fn validate_args(schema: &Value, args: &Value) -> Result<(), ToolError> {
    let empty = serde_json::Map::new();
    let args_obj = match args {
        Value::Object(map) => map,
        Value::Null => &empty,
        _ => {
            return Err(ToolError::Validation(
                "arguments must be a JSON object".to_string(),
            ));
        }
    };

    let missing: Vec<&str> = schema
        .get("required")
        .and_then(|r| r.as_array())
        .map(|required| {
            required
                .iter()
                .filter_map(|f| f.as_str())
                .filter(|f| !args_obj.contains_key(*f) || args_obj[*f].is_null())
                .collect()
        })
        .unwrap_or_default();

    if !missing.is_empty() {
        return Err(ToolError::Validation(format!(
            "Missing required argument(s): {}",
            missing.join(", ")
        )));
    }

    if let Some(properties) = schema.get("properties").and_then(|p| p.as_object()) {
        for (key, value) in args_obj {
            let Some(expected) = properties
                .get(key)
                .and_then(|p| p.get("type"))
                .and_then(|t| t.as_str())
            else {
                continue; // unknown or untyped argument — tolerated
            };
            if !type_matches(expected, value) {
                return Err(ToolError::Validation(format!(
                    "Argument '{}' must be of type {}",
                    key, expected
                )));
            }
        }
    }

    Ok(())
}

fn type_matches(expected: &str, value: &Value) -> bool {
    match expected {
        "string" => value.is_string(),
        "integer" => value.is_i64() || value.is_u64(),
        "number" => value.is_number(),
        "boolean" => value.is_boolean(),
        "array" => value.is_array(),
        "object" => value.is_object(),
        _ => true,
    }
}
