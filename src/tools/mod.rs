//! Tool implementations, grouped by the upstream surface they drive:
//!
//! - `crm` — leads, pipeline, dashboard metrics (LEGION platform)
//! - `intelligence` — call analysis, call stats, boardroom debates
//! - `github` — recent deploys, issue listing/creation
//! - `system` — platform health probe
//!
//! `registry()` assembles the full table handed to the dispatch gateway.

use serde_json::Value;

use crate::gateway::ToolRegistry;

pub mod crm;
pub mod github;
pub mod intelligence;
pub mod system;

/// Hard cap on any listing tool — bounds the payload handed back to the
/// model regardless of what the caller asked for.
pub const MAX_LIST_LIMIT: u64 = 100;

/// Build the complete tool registry. Called once at startup.
pub fn registry() -> ToolRegistry {
    let mut entries = Vec::new();
    entries.extend(crm::entries());
    entries.extend(intelligence::entries());
    entries.extend(github::entries());
    entries.extend(system::entries());
    ToolRegistry::new(entries)
}

/// Read an optional numeric argument, clamped to the listing cap.
pub(crate) fn clamped_limit(args: &Value, key: &str, default: u64) -> u64 {
    args[key].as_u64().unwrap_or(default).min(MAX_LIST_LIMIT)
}

/// Truncation for passthrough responses: an upstream that ignores our
/// `limit` must not blow up the envelope.
pub(crate) fn cap_list(value: Value) -> Value {
    match value {
        Value::Array(mut items) => {
            if items.len() > MAX_LIST_LIMIT as usize {
                items.truncate(MAX_LIST_LIMIT as usize);
            }
            Value::Array(items)
        }
        other => other,
    }
}
