//! Leads, pipeline, and dashboard tools — the LEGION CRM surface.

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
                name: "legion_list_leads",
                description: "List leads in the LEGION CRM. Returns lead name, email, status, score, and source.",
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "limit": { "type": "integer", "description": "Max leads to return", "default": 20 },
                        "offset": { "type": "integer", "description": "Leads to skip (pagination)", "default": 0 }
                    },
                    "required": []
                }),
            },
            CredentialKind::Crm,
            list_leads,
        ),
        ToolEntry::new(
            ToolDescriptor {
                name: "legion_create_lead",
                description: "Create a new lead in the LEGION CRM.",
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "name": { "type": "string", "description": "Lead name" },
                        "email": { "type": "string", "description": "Lead email" },
                        "company": { "type": "string", "default": "" },
                        "phone": { "type": "string", "default": "" },
                        "source": { "type": "string", "description": "Acquisition source", "default": "manual" },
                        "notes": { "type": "string", "default": "" }
                    },
                    "required": ["name", "email"]
                }),
            },
            CredentialKind::Crm,
            create_lead,
        ),
        ToolEntry::new(
            ToolDescriptor {
                name: "legion_get_pipeline",
                description: "Get the full sales pipeline with all deals, stages, and values.",
                input_schema: json!({ "type": "object", "properties": {}, "required": [] }),
            },
            CredentialKind::Crm,
            get_pipeline,
        ),
        ToolEntry::new(
            ToolDescriptor {
                name: "legion_dashboard_metrics",
                description: "Get main dashboard metrics: leads, deals, pipeline value, conversion rates, agent activity.",
                input_schema: json!({ "type": "object", "properties": {}, "required": [] }),
            },
            CredentialKind::Crm,
            dashboard_metrics,
        ),
    ]
}

fn list_leads(up: &UpstreamClient, args: Value) -> BoxFuture<'_, Result<Value, ToolError>> {
    Box::pin(async move {
        let input = json!({
            "limit": clamped_limit(&args, "limit", 20),
            "offset": args["offset"].as_u64().unwrap_or(0),
        });
        up.crm_query("leads.list", Some(&input)).await.map(cap_list)
    })
}

fn create_lead(up: &UpstreamClient, args: Value) -> BoxFuture<'_, Result<Value, ToolError>> {
    Box::pin(async move {
        let lead = json!({
            "name": args["name"].as_str().unwrap_or_default(),
            "email": args["email"].as_str().unwrap_or_default(),
            "company": args["company"].as_str().unwrap_or(""),
            "phone": args["phone"].as_str().unwrap_or(""),
            "source": args["source"].as_str().unwrap_or("manual"),
            "notes": args["notes"].as_str().unwrap_or(""),
        });

        let response = up.crm_mutation("leads.create", &lead).await?;
        Ok(normalize_created_lead(&response, lead))
    })
}

fn get_pipeline(up: &UpstreamClient, _args: Value) -> BoxFuture<'_, Result<Value, ToolError>> {
    Box::pin(async move { up.crm_query("crm.deals.list", None).await })
}

fn dashboard_metrics(up: &UpstreamClient, _args: Value) -> BoxFuture<'_, Result<Value, ToolError>> {
    Box::pin(async move { up.crm_query("sprint4.dashboardStats", None).await })
}

/// Created-lead normalizer: identifier from the platform response plus an
/// echo of what was submitted. Input: tRPC mutation response (id nested
/// under `result.data`, possibly inside a `json` wrapper). Output:
/// `{id, lead}` with `id: null` when the platform returned no identifier.
fn normalize_created_lead(response: &Value, submitted: Value) -> Value {
    json!({
        "id": extract_trpc_id(response).cloned().unwrap_or(Value::Null),
        "lead": submitted,
    })
}

/// Probe the usual tRPC envelope nestings for a created-entity id.
fn extract_trpc_id(response: &Value) -> Option<&Value> {
    ["/result/data/json/id", "/result/data/id", "/id"]
        .iter()
        .find_map(|p| response.pointer(p))
        .filter(|v| !v.is_null())
}
