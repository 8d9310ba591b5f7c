pub mod auth;
pub mod config;
pub mod error;
pub mod gateway;
pub mod handlers;
pub mod mcp;
pub mod state;
pub mod tools;
pub mod upstream;

use axum::routing::{get, post};
use axum::Router;

use state::AppState;

/// Build the application router with the given state.
/// Extracted from `main()` so integration tests can construct the app
/// without binding to a network port.
pub fn create_router(state: AppState) -> Router {
    // Only the MCP endpoint sits behind the auth middleware; health and
    // readiness stay public.
    let mcp_routes = Router::new()
        .route("/mcp", post(mcp::server::mcp_handler))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ));

    Router::new()
        // Health
        .route("/api/health", get(handlers::health))
        .route("/api/health/ready", get(handlers::readiness))
        // MCP transport
        .merge(mcp_routes)
        // Shared state
        .with_state(state)
}
