// Jaskier Shared Pattern -- config
//! Process configuration loaded once at startup from the environment.
//!
//! `LEGION_BASE_URL` is mandatory — the bridge refuses to start without it.
//! Both tokens are optional: a missing token only degrades the tools that
//! need it (they fail with `AuthMissing` instead of sending an
//! unauthenticated request the platform would reject ambiguously).

use std::time::Duration;

use anyhow::{bail, Context};

/// Default per-request deadline for upstream calls.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Public GitHub REST API root. Overridable via `GITHUB_API_URL`
/// (GitHub Enterprise, stub servers in tests).
const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

/// Immutable credential + endpoint context shared by every tool handler.
/// Built once in `main`, wrapped in `Arc`, never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    /// LEGION platform root, e.g. `https://legion.example.com`.
    pub base_url: String,
    /// JWT from a platform login. None = CRM tools degraded.
    pub auth_token: Option<String>,
    /// GitHub personal/installation token. None = GitHub tools degraded.
    pub github_token: Option<String>,
    /// `owner/name` of the repository the GitHub tools operate on.
    pub github_repo: Option<String>,
    /// GitHub REST API root (no trailing slash).
    pub github_api_url: String,
    /// Single fixed deadline applied to every upstream request.
    pub timeout: Duration,
    /// Optional inbound auth secret. None = dev mode (no auth on /mcp).
    pub auth_secret: Option<String>,
}

impl Config {
    /// Load configuration from the environment. Call `dotenvy::dotenv()` first.
    ///
    /// Fails (and the process refuses to serve) when `LEGION_BASE_URL` is
    /// absent or not a valid URL.
    pub fn from_env() -> anyhow::Result<Self> {
        let base_url = match std::env::var("LEGION_BASE_URL") {
            Ok(v) if !v.trim().is_empty() => v,
            _ => bail!("LEGION_BASE_URL required"),
        };
        url::Url::parse(&base_url)
            .with_context(|| format!("LEGION_BASE_URL is not a valid URL: '{}'", base_url))?;

        let timeout_secs = std::env::var("UPSTREAM_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(Self {
            base_url: trim_trailing_slash(&base_url),
            auth_token: non_empty_var("LEGION_AUTH_TOKEN"),
            github_token: non_empty_var("GITHUB_TOKEN"),
            github_repo: non_empty_var("GITHUB_REPO"),
            github_api_url: non_empty_var("GITHUB_API_URL")
                .map(|u| trim_trailing_slash(&u))
                .unwrap_or_else(|| DEFAULT_GITHUB_API_URL.to_string()),
            timeout: Duration::from_secs(timeout_secs.max(1)),
            auth_secret: non_empty_var("AUTH_SECRET"),
        })
    }

    pub fn has_crm_auth(&self) -> bool {
        self.auth_token.is_some()
    }

    pub fn has_github_auth(&self) -> bool {
        self.github_token.is_some() && self.github_repo.is_some()
    }
}

/// Read an env var, treating unset and empty the same way.
fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn trim_trailing_slash(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}
