// Jaskier Shared Pattern -- mcp/server
//! MCP Server — exposes the tool registry as an MCP endpoint.
//!
//! MCP clients discover and call the LEGION tools via JSON-RPC 2.0 over
//! HTTP POST at `/mcp`.
//!
//! Supported methods:
//! - `initialize` — server info + capabilities
//! - `notifications/initialized` — client ack (no-op)
//! - `tools/list` — list all registered tools
//! - `tools/call` — dispatch a tool through the gateway
//! - `ping` — health check

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use crate::state::AppState;

/// MCP JSON-RPC 2.0 endpoint handler.
///
/// Routes incoming JSON-RPC requests to the appropriate MCP method handler.
/// Supports both single requests and notifications (no `id` field).
pub async fn mcp_handler(
    State(state): State<AppState>,
    Json(request): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let method = request.get("method").and_then(|m| m.as_str()).unwrap_or("");
    let id = request.get("id").cloned().unwrap_or(Value::Null);

    tracing::debug!(method = %method, "MCP server: incoming request");

    let result = match method {
        "initialize" => handle_initialize(&id),
        "notifications/initialized" => {
            // Client acknowledgment — no response needed for notifications
            return (StatusCode::OK, Json(json!({})));
        }
        "ping" => handle_ping(&id),
        "tools/list" => handle_tools_list(&state, &id),
        "tools/call" => handle_tools_call(&state, &request, &id).await,
        _ => json_rpc_error(id, -32601, &format!("Method not found: {}", method)),
    };

    (StatusCode::OK, Json(result))
}

// ── initialize ──────────────────────────────────────────────────────────────

fn handle_initialize(id: &Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": {
            "protocolVersion": "2024-11-05",
            "capabilities": {
                "tools": { "listChanged": false }
            },
            "serverInfo": {
                "name": "legion-mcp",
                "version": env!("CARGO_PKG_VERSION")
            },
            "instructions": "LEGION AI platform bridge — operate the sales automation system: leads, pipeline, call intelligence, analytics, and deployments."
        }
    })
}

// ── ping ────────────────────────────────────────────────────────────────────

fn handle_ping(id: &Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": {}
    })
}

// ── tools/list ──────────────────────────────────────────────────────────────

fn handle_tools_list(state: &AppState, id: &Value) -> Value {
    let tools: Vec<Value> = state
        .registry
        .descriptors()
        .map(|d| {
            json!({
                "name": d.name,
                "description": d.description,
                "inputSchema": d.input_schema,
            })
        })
        .collect();

    json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": {
            "tools": tools
        }
    })
}

// ── tools/call ──────────────────────────────────────────────────────────────

async fn handle_tools_call(state: &AppState, request: &Value, id: &Value) -> Value {
    let params = request.get("params").cloned().unwrap_or(json!({}));
    let tool_name = params.get("name").and_then(|n| n.as_str()).unwrap_or("");
    let arguments = params.get("arguments").cloned().unwrap_or(json!({}));

    if tool_name.is_empty() {
        return json_rpc_error(id.clone(), -32602, "Missing 'name' in params");
    }

    tracing::info!(tool = %tool_name, "MCP server: tools/call");

    let envelope = state
        .registry
        .invoke(&state.upstream, tool_name, arguments)
        .await;

    let is_error = !envelope.ok;
    let text = serde_json::to_string_pretty(&envelope)
        .unwrap_or_else(|_| r#"{"ok":false,"error":{"kind":"Internal","message":"serialization failed"}}"#.to_string());

    json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": {
            "content": [{ "type": "text", "text": text }],
            "isError": is_error
        }
    })
}

// ── JSON-RPC error helper ───────────────────────────────────────────────────

fn json_rpc_error(id: Value, code: i32, message: &str) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": {
            "code": code,
            "message": message
        }
    })
}
