//! Authenticated HTTP calls to the LEGION platform and the GitHub REST API.
//!
//! One attempt per call, one fixed deadline, no retries. Transport failures
//! map to the typed errors in `error.rs`; callers surface them unchanged in
//! the tool envelope.
//!
//! Credential spaces are never mixed: LEGION calls carry
//! `Authorization: Bearer <auth_token>`, GitHub calls carry
//! `Authorization: token <github_token>`.

use std::sync::Arc;

use reqwest::{Client, RequestBuilder};
use serde_json::Value;

use crate::config::Config;
use crate::error::ToolError;

/// Performs outbound calls on behalf of tool handlers. Cheap to clone —
/// `reqwest::Client` is an `Arc` around a connection pool.
#[derive(Clone)]
pub struct UpstreamClient {
    client: Client,
    config: Arc<Config>,
}

impl UpstreamClient {
    pub fn new(client: Client, config: Arc<Config>) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // ── LEGION platform (tRPC-style endpoints) ──────────────────────────

    /// GET `{base}/api/trpc/{endpoint}`, input JSON-encoded in the `input`
    /// query parameter.
    pub async fn crm_query(&self, endpoint: &str, input: Option<&Value>) -> Result<Value, ToolError> {
        let token = self.crm_token()?;
        let url = format!("{}/api/trpc/{}", self.config.base_url, endpoint);

        let mut req = self.client.get(&url).bearer_auth(token);
        if let Some(input) = input {
            req = req.query(&[("input", input.to_string())]);
        }
        self.send(req).await
    }

    /// POST `{base}/api/trpc/{endpoint}` with a JSON body.
    pub async fn crm_mutation(&self, endpoint: &str, input: &Value) -> Result<Value, ToolError> {
        let token = self.crm_token()?;
        let url = format!("{}/api/trpc/{}", self.config.base_url, endpoint);

        self.send(self.client.post(&url).bearer_auth(token).json(input))
            .await
    }

    /// Unauthenticated GET against a platform path. Used by the health-check
    /// tool only — the status endpoint does not require a login.
    pub async fn crm_probe(&self, path: &str) -> Result<(u16, Value), ToolError> {
        let url = format!("{}{}", self.config.base_url, path);
        let response = self
            .client
            .get(&url)
            .timeout(self.config.timeout)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status().as_u16();
        let body = response.json::<Value>().await.unwrap_or(Value::Null);
        Ok((status, body))
    }

    // ── GitHub REST API (scoped to the configured repository) ───────────

    /// GET `{api}/repos/{repo}{path}`.
    pub async fn github_get(&self, path: &str) -> Result<Value, ToolError> {
        let (token, repo) = self.github_credentials()?;
        let url = format!("{}/repos/{}{}", self.config.github_api_url, repo, path);

        self.send(self.github_headers(self.client.get(&url), &token))
            .await
    }

    /// POST `{api}/repos/{repo}{path}` with a JSON body.
    pub async fn github_post(&self, path: &str, body: &Value) -> Result<Value, ToolError> {
        let (token, repo) = self.github_credentials()?;
        let url = format!("{}/repos/{}{}", self.config.github_api_url, repo, path);

        self.send(self.github_headers(self.client.post(&url), &token).json(body))
            .await
    }

    fn github_headers(&self, req: RequestBuilder, token: &str) -> RequestBuilder {
        req.header("Authorization", format!("token {}", token))
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", concat!("legion-mcp/", env!("CARGO_PKG_VERSION")))
    }

    // ── Credential checks (fail before any request is built) ────────────

    fn crm_token(&self) -> Result<String, ToolError> {
        self.config
            .auth_token
            .clone()
            .ok_or_else(|| ToolError::AuthMissing("LEGION_AUTH_TOKEN not configured".to_string()))
    }

    fn github_credentials(&self) -> Result<(String, String), ToolError> {
        let token = self
            .config
            .github_token
            .clone()
            .ok_or_else(|| ToolError::AuthMissing("GITHUB_TOKEN not configured".to_string()))?;
        let repo = self
            .config
            .github_repo
            .clone()
            .ok_or_else(|| ToolError::AuthMissing("GITHUB_REPO not configured".to_string()))?;
        Ok((token, repo))
    }

    // ── Transport ───────────────────────────────────────────────────────

    /// Single attempt: apply the fixed deadline, send, map failures, parse.
    async fn send(&self, req: RequestBuilder) -> Result<Value, ToolError> {
        let response = req
            .timeout(self.config.timeout)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ToolError::upstream(status.as_u16(), &body));
        }

        response.json::<Value>().await.map_err(|e| {
            ToolError::upstream(status.as_u16(), &format!("response was not valid JSON: {}", e))
        })
    }

    fn map_transport_error(&self, e: reqwest::Error) -> ToolError {
        if e.is_timeout() {
            ToolError::Timeout(self.config.timeout.as_secs())
        } else {
            // Connect failures, DNS errors, resets.
            ToolError::Network(e.to_string())
        }
    }
}
