// Jaskier Shared Pattern -- mcp
//! MCP (Model Context Protocol) transport binding.
//!
//! **Server** (`mcp_handler`): exposes the LEGION tool registry as an MCP
//! endpoint that clients can call via JSON-RPC 2.0 over HTTP.
//!
//! The dispatch gateway itself is transport-agnostic — this module only
//! bridges `tools/list` and `tools/call` onto `ToolRegistry::invoke`.
//!
//! Protocol: JSON-RPC 2.0 over HTTP (lightweight, no stdio transport needed).
//! Spec: <https://spec.modelcontextprotocol.io/2024-11-05/>

pub mod server;
