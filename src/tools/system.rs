//! Platform health probe. Never produces an error envelope — any failure
//! becomes a structured `online: false` result.

use std::time::Instant;

use futures_util::future::BoxFuture;
use serde_json::{json, Value};

use crate::error::ToolError;
use crate::gateway::{CredentialKind, ToolDescriptor, ToolEntry};
use crate::upstream::UpstreamClient;

/// Unauthenticated status endpoint on the platform.
const HEALTH_PATH: &str = "/api/trpc/system.health";

pub fn entries() -> Vec<ToolEntry> {
    vec![ToolEntry::new(
        ToolDescriptor {
            name: "legion_health_check",
            description: "Check whether the LEGION platform is running and healthy. Always returns a result, never an error.",
            input_schema: json!({ "type": "object", "properties": {}, "required": [] }),
        },
        CredentialKind::None,
        health_check,
    )]
}

fn health_check(up: &UpstreamClient, _args: Value) -> BoxFuture<'_, Result<Value, ToolError>> {
    Box::pin(async move {
        let url = format!("{}{}", up.config().base_url, HEALTH_PATH);
        let started = Instant::now();

        let report = match up.crm_probe(HEALTH_PATH).await {
            Ok((status, body)) => json!({
                "online": (200..300).contains(&status),
                "latency_ms": started.elapsed().as_millis() as u64,
                "http_status": status,
                "response": body,
                "url": url,
                "checked_at": chrono::Utc::now().to_rfc3339(),
            }),
            Err(e) => json!({
                "online": false,
                "latency_ms": started.elapsed().as_millis() as u64,
                "error": e.to_string(),
                "url": url,
                "checked_at": chrono::Utc::now().to_rfc3339(),
            }),
        };

        Ok(report)
    })
}
