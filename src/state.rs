// Jaskier Shared Pattern -- state
//! Application state: immutable configuration, the shared HTTP client, and
//! the tool registry. Everything here is either `Arc` or internally pooled,
//! so concurrent invocations share nothing mutable.

use std::sync::Arc;
use std::time::Instant;

use reqwest::Client;

use crate::config::Config;
use crate::gateway::ToolRegistry;
use crate::upstream::UpstreamClient;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub upstream: UpstreamClient,
    pub registry: Arc<ToolRegistry>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let config = Arc::new(config);

        let client = Client::builder()
            .pool_max_idle_per_host(10)
            .connect_timeout(std::time::Duration::from_secs(5))
            .build()
            .expect("Failed to build HTTP client");

        tracing::info!(
            base_url = %config.base_url,
            crm_auth = config.has_crm_auth(),
            github_auth = config.has_github_auth(),
            "AppState initialised"
        );

        Self {
            upstream: UpstreamClient::new(client, config.clone()),
            registry: Arc::new(crate::tools::registry()),
            config,
            start_time: Instant::now(),
        }
    }
}
