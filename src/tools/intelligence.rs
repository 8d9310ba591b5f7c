//! Call-intelligence and boardroom tools.
//!
//! Analysis results come back structured (BANT score, sentiment, objections,
//! coaching tips) and are passed through unchanged — the platform owns those
//! shapes, not the bridge.

use futures_util::future::BoxFuture;
use serde_json::{json, Value};

use crate::error::ToolError;
use crate::gateway::{CredentialKind, ToolDescriptor, ToolEntry};
use crate::upstream::UpstreamClient;

use super::{cap_list, clamped_limit};

pub fn entries() -> Vec<ToolEntry> {
    vec![
        ToolEntry::new(
            ToolDescriptor {
                name: "legion_analyze_call",
                description: "Analyze a sales call transcript. Returns BANT score, sentiment, objections, coaching tips.",
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "transcript": { "type": "string", "description": "Full call transcript text" },
                        "title": { "type": "string", "description": "Label for the analysis", "default": "Call Analysis" }
                    },
                    "required": ["transcript"]
                }),
            },
            CredentialKind::Crm,
            analyze_call,
        ),
        ToolEntry::new(
            ToolDescriptor {
                name: "legion_call_stats",
                description: "Get call-intelligence statistics: total calls, avg score, avg sentiment, avg BANT.",
                input_schema: json!({ "type": "object", "properties": {}, "required": [] }),
            },
            CredentialKind::Crm,
            call_stats,
        ),
        ToolEntry::new(
            ToolDescriptor {
                name: "legion_list_calls",
                description: "List analyzed calls with their scores and status.",
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "limit": { "type": "integer", "description": "Max calls to return", "default": 20 }
                    },
                    "required": []
                }),
            },
            CredentialKind::Crm,
            list_calls,
        ),
        ToolEntry::new(
            ToolDescriptor {
                name: "legion_boardroom_debate",
                description: "Start a Boardroom debate where the platform's AI agents discuss a sales strategy topic.",
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "topic": { "type": "string", "description": "Debate topic" },
                        "context": { "type": "string", "description": "Extra context for the agents", "default": "" }
                    },
                    "required": ["topic"]
                }),
            },
            CredentialKind::Crm,
            boardroom_debate,
        ),
    ]
}

fn analyze_call(up: &UpstreamClient, args: Value) -> BoxFuture<'_, Result<Value, ToolError>> {
    Box::pin(async move {
        let input = json!({
            "transcript": args["transcript"].as_str().unwrap_or_default(),
            "title": args["title"].as_str().unwrap_or("Call Analysis"),
        });
        up.crm_mutation("callIntelligence.analyzeText", &input).await
    })
}

fn call_stats(up: &UpstreamClient, _args: Value) -> BoxFuture<'_, Result<Value, ToolError>> {
    Box::pin(async move { up.crm_query("callIntelligence.stats", None).await })
}

fn list_calls(up: &UpstreamClient, args: Value) -> BoxFuture<'_, Result<Value, ToolError>> {
    Box::pin(async move {
        let input = json!({ "limit": clamped_limit(&args, "limit", 20) });
        up.crm_query("callIntelligence.list", Some(&input))
            .await
            .map(cap_list)
    })
}

fn boardroom_debate(up: &UpstreamClient, args: Value) -> BoxFuture<'_, Result<Value, ToolError>> {
    Box::pin(async move {
        let input = json!({
            "topic": args["topic"].as_str().unwrap_or_default(),
            "context": args["context"].as_str().unwrap_or(""),
        });
        up.crm_mutation("boardroom.startDebate", &input).await
    })
}
