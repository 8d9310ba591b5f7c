//! Deployment and issue tools backed by the GitHub REST API, scoped to the
//! one configured repository.
//!
//! GitHub list payloads are verbose; each tool here has a normalizer that
//! keeps only the fields an operator acts on.

use futures_util::future::BoxFuture;
use serde_json::{json, Value};

use crate::error::ToolError;
use crate::gateway::{CredentialKind, ToolDescriptor, ToolEntry};
use crate::upstream::UpstreamClient;

use super::clamped_limit;

/// Issues fetched per listing call.
const ISSUES_PER_PAGE: u64 = 20;

pub fn entries() -> Vec<ToolEntry> {
    vec![
        ToolEntry::new(
            ToolDescriptor {
                name: "legion_recent_deploys",
                description: "Get recent commits (deployments) on the configured repository.",
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "count": { "type": "integer", "description": "Commits to return", "default": 5 }
                    },
                    "required": []
                }),
            },
            CredentialKind::GitHub,
            recent_deploys,
        ),
        ToolEntry::new(
            ToolDescriptor {
                name: "legion_list_issues",
                description: "List issues/bug reports on the configured repository. State: open, closed, all.",
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "state": { "type": "string", "description": "Issue state filter", "default": "open" }
                    },
                    "required": []
                }),
            },
            CredentialKind::GitHub,
            list_issues,
        ),
        ToolEntry::new(
            ToolDescriptor {
                name: "legion_create_issue",
                description: "Create an issue/bug report on the configured repository.",
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "title": { "type": "string", "description": "Issue title" },
                        "body": { "type": "string", "description": "Issue body (markdown)" },
                        "labels": { "type": "array", "description": "Label names to apply" }
                    },
                    "required": ["title", "body"]
                }),
            },
            CredentialKind::GitHub,
            create_issue,
        ),
    ]
}

fn recent_deploys(up: &UpstreamClient, args: Value) -> BoxFuture<'_, Result<Value, ToolError>> {
    Box::pin(async move {
        let count = clamped_limit(&args, "count", 5);
        let response = up.github_get(&format!("/commits?per_page={}", count)).await?;
        Ok(normalize_commits(response))
    })
}

fn list_issues(up: &UpstreamClient, args: Value) -> BoxFuture<'_, Result<Value, ToolError>> {
    Box::pin(async move {
        let state = args["state"].as_str().unwrap_or("open");
        if !matches!(state, "open" | "closed" | "all") {
            return Err(ToolError::Validation(format!(
                "Argument 'state' must be one of open, closed, all (got '{}')",
                state
            )));
        }

        let response = up
            .github_get(&format!("/issues?state={}&per_page={}", state, ISSUES_PER_PAGE))
            .await?;
        Ok(normalize_issues(response))
    })
}

fn create_issue(up: &UpstreamClient, args: Value) -> BoxFuture<'_, Result<Value, ToolError>> {
    Box::pin(async move {
        let mut body = json!({
            "title": args["title"].as_str().unwrap_or_default(),
            "body": args["body"].as_str().unwrap_or_default(),
        });
        if let Some(labels) = args.get("labels").filter(|l| l.is_array()) {
            body["labels"] = labels.clone();
        }

        let created = up.github_post("/issues", &body).await?;
        Ok(json!({
            "number": created.get("number").cloned().unwrap_or(Value::Null),
            "url": created.get("html_url").cloned().unwrap_or(Value::Null),
            "title": created.get("title").cloned().unwrap_or(Value::Null),
        }))
    })
}

/// Commit-list normalizer. Input: GitHub `GET /commits` array. Output: one
/// record per commit with short sha, first message line, author, date.
/// Non-array payloads (e.g. an error object) pass through untouched.
fn normalize_commits(response: Value) -> Value {
    let Value::Array(commits) = response else {
        return response;
    };
    Value::Array(
        commits
            .iter()
            .map(|c| {
                let sha = c["sha"].as_str().unwrap_or_default();
                let message = c.pointer("/commit/message").and_then(|m| m.as_str()).unwrap_or_default();
                json!({
                    "sha": sha.chars().take(7).collect::<String>(),
                    "message": message.lines().next().unwrap_or(""),
                    "author": c.pointer("/commit/author/name").cloned().unwrap_or(Value::Null),
                    "date": c.pointer("/commit/author/date").cloned().unwrap_or(Value::Null),
                })
            })
            .collect(),
    )
}

/// Issue-list normalizer. Input: GitHub `GET /issues` array. Output: number,
/// title, state, label names, created_at per issue.
fn normalize_issues(response: Value) -> Value {
    let Value::Array(issues) = response else {
        return response;
    };
    Value::Array(
        issues
            .iter()
            .map(|i| {
                let labels: Vec<Value> = i["labels"]
                    .as_array()
                    .map(|ls| ls.iter().filter_map(|l| l.get("name").cloned()).collect())
                    .unwrap_or_default();
                json!({
                    "number": i.get("number").cloned().unwrap_or(Value::Null),
                    "title": i.get("title").cloned().unwrap_or(Value::Null),
                    "state": i.get("state").cloned().unwrap_or(Value::Null),
                    "labels": labels,
                    "created_at": i.get("created_at").cloned().unwrap_or(Value::Null),
                })
            })
            .collect(),
    )
}
