// MCP transport integration tests — JSON-RPC 2.0 over POST /mcp, driven
// through the real router with tower's oneshot (no network port).

use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use legion_mcp::config::Config;
use legion_mcp::state::AppState;

/// Config pointing at a loopback port nothing listens on — good enough for
/// every test that never dispatches an upstream call.
fn offline_config() -> Config {
    Config {
        base_url: "http://127.0.0.1:9".to_string(),
        auth_token: Some("jwt".to_string()),
        github_token: Some("ghp_x".to_string()),
        github_repo: Some("acme/legion".to_string()),
        github_api_url: "http://127.0.0.1:9".to_string(),
        timeout: Duration::from_secs(1),
        auth_secret: None,
    }
}

fn app(config: Config) -> axum::Router {
    legion_mcp::create_router(AppState::new(config))
}

fn rpc_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/mcp")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn initialize_reports_server_info() {
    let response = app(offline_config())
        .oneshot(rpc_request(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "initialize",
            "params": {}
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["jsonrpc"], "2.0");
    assert_eq!(body["result"]["serverInfo"]["name"], "legion-mcp");
    assert_eq!(body["result"]["protocolVersion"], "2024-11-05");
}

#[tokio::test]
async fn tools_list_exposes_the_full_registry() {
    let response = app(offline_config())
        .oneshot(rpc_request(json!({
            "jsonrpc": "2.0",
            "id": 2,
            "method": "tools/list"
        })))
        .await
        .unwrap();

    let body = body_json(response).await;
    let tools = body["result"]["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 12);

    let names: Vec<&str> = tools.iter().filter_map(|t| t["name"].as_str()).collect();
    assert!(names.contains(&"legion_list_leads"));
    assert!(names.contains(&"legion_create_issue"));
    assert!(names.contains(&"legion_health_check"));

    // Every tool carries an object schema the client can validate against.
    for tool in tools {
        assert_eq!(tool["inputSchema"]["type"], "object");
    }
}

#[tokio::test]
async fn unknown_method_yields_json_rpc_error() {
    let response = app(offline_config())
        .oneshot(rpc_request(json!({
            "jsonrpc": "2.0",
            "id": 3,
            "method": "resources/list"
        })))
        .await
        .unwrap();

    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], -32601);
}

#[tokio::test]
async fn tools_call_without_name_is_invalid_params() {
    let response = app(offline_config())
        .oneshot(rpc_request(json!({
            "jsonrpc": "2.0",
            "id": 4,
            "method": "tools/call",
            "params": { "arguments": {} }
        })))
        .await
        .unwrap();

    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], -32602);
}

#[tokio::test]
async fn tools_call_unknown_tool_returns_error_envelope() {
    let response = app(offline_config())
        .oneshot(rpc_request(json!({
            "jsonrpc": "2.0",
            "id": 5,
            "method": "tools/call",
            "params": { "name": "legion_mystery", "arguments": {} }
        })))
        .await
        .unwrap();

    let body = body_json(response).await;
    assert_eq!(body["result"]["isError"], true);

    // The content text is the serialized envelope.
    let text = body["result"]["content"][0]["text"].as_str().unwrap();
    let envelope: Value = serde_json::from_str(text).unwrap();
    assert_eq!(envelope["ok"], false);
    assert_eq!(envelope["error"]["kind"], "UnknownTool");
}

#[tokio::test]
async fn tools_call_validation_failure_stays_in_envelope() {
    let response = app(offline_config())
        .oneshot(rpc_request(json!({
            "jsonrpc": "2.0",
            "id": 6,
            "method": "tools/call",
            "params": { "name": "legion_create_issue", "arguments": { "title": "no body" } }
        })))
        .await
        .unwrap();

    let body = body_json(response).await;
    assert_eq!(body["result"]["isError"], true);
    let text = body["result"]["content"][0]["text"].as_str().unwrap();
    let envelope: Value = serde_json::from_str(text).unwrap();
    assert_eq!(envelope["error"]["kind"], "ValidationError");
    assert!(envelope["error"]["message"].as_str().unwrap().contains("body"));
}

#[tokio::test]
async fn notification_is_acknowledged_silently() {
    let response = app(offline_config())
        .oneshot(rpc_request(json!({
            "jsonrpc": "2.0",
            "method": "notifications/initialized"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body, json!({}));
}

#[tokio::test]
async fn ping_answers_empty_result() {
    let response = app(offline_config())
        .oneshot(rpc_request(json!({
            "jsonrpc": "2.0",
            "id": 7,
            "method": "ping"
        })))
        .await
        .unwrap();

    let body = body_json(response).await;
    assert_eq!(body["result"], json!({}));
}

// ── Inbound auth ────────────────────────────────────────────────────────────

#[tokio::test]
async fn mcp_requires_bearer_when_secret_configured() {
    let config = Config {
        auth_secret: Some("s3cret".to_string()),
        ..offline_config()
    };

    let response = app(config)
        .oneshot(rpc_request(json!({ "jsonrpc": "2.0", "id": 1, "method": "ping" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn mcp_accepts_matching_bearer() {
    let config = Config {
        auth_secret: Some("s3cret".to_string()),
        ..offline_config()
    };

    let request = Request::builder()
        .method("POST")
        .uri("/mcp")
        .header("content-type", "application/json")
        .header("authorization", "Bearer s3cret")
        .body(Body::from(
            json!({ "jsonrpc": "2.0", "id": 1, "method": "ping" }).to_string(),
        ))
        .unwrap();

    let response = app(config).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn health_stays_public_with_secret_configured() {
    let config = Config {
        auth_secret: Some("s3cret".to_string()),
        ..offline_config()
    };

    let response = app(config)
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
