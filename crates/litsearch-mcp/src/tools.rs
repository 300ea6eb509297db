//! MCP tool definitions and handlers

use crate::protocol::*;
use anyhow::Result;
use litsearch_core::{api, ApiResponse, ProviderResolver};
use serde_json::Value;
use std::sync::Arc;

pub fn analyze_confidence_tool_definition() -> ToolDefinition {
    ToolDefinition {
        name: "analyze_confidence".to_string(),
        description: "Score how well each extracted field is supported by the source text"
            .to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "sourceText": {
                    "type": "string",
                    "description": "Full text the fields were extracted from"
                },
                "extractedFields": {
                    "type": "array",
                    "description": "Fields to score",
                    "items": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string" },
                            "name": { "type": "string" },
                            "type": { "type": "string" },
                            "value": {},
                            "confidence": {
                                "type": "number",
                                "description": "Prior confidence from the extractor (0-1)"
                            },
                            "citations": { "type": "array" }
                        },
                        "required": ["id", "name", "type", "value"]
                    }
                },
                "provider": {
                    "type": "string",
                    "description": "Provider override (openai, openrouter)"
                },
                "model": {
                    "type": "string",
                    "description": "Model override"
                }
            },
            "required": ["sourceText", "extractedFields"]
        }),
    }
}

pub fn generate_query_tool_definition() -> ToolDefinition {
    ToolDefinition {
        name: "generate_query".to_string(),
        description: "Generate a Boolean literature search query, or refine an existing one"
            .to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "description": {
                    "type": "string",
                    "description": "Research description, or feedback when refining"
                },
                "existingQuery": {
                    "type": "string",
                    "description": "Query to refine"
                },
                "action": {
                    "type": "string",
                    "enum": ["generate", "refine"],
                    "default": "generate"
                },
                "provider": {
                    "type": "string",
                    "description": "Provider override (openai, openrouter)"
                },
                "model": {
                    "type": "string",
                    "description": "Model override"
                }
            },
            "required": ["description"]
        }),
    }
}

pub fn summarize_query_tool_definition() -> ToolDefinition {
    ToolDefinition {
        name: "summarize_query".to_string(),
        description: "Summarize a Boolean query into a title of at most five words".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Boolean search query"
                },
                "provider": {
                    "type": "string",
                    "description": "Provider override (openai, openrouter)"
                },
                "model": {
                    "type": "string",
                    "description": "Model override"
                }
            },
            "required": ["query"]
        }),
    }
}

pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        analyze_confidence_tool_definition(),
        generate_query_tool_definition(),
        summarize_query_tool_definition(),
    ]
}

pub async fn handle_analyze_confidence(
    resolver: &Arc<ProviderResolver>,
    args: Value,
) -> ToolResult {
    envelope_result(api::analyze_confidence(resolver, args).await)
}

pub async fn handle_generate_query(resolver: &Arc<ProviderResolver>, args: Value) -> ToolResult {
    envelope_result(api::generate_query(resolver, args).await)
}

pub async fn handle_summarize_query(resolver: &Arc<ProviderResolver>, args: Value) -> ToolResult {
    envelope_result(api::summarize_query(resolver, args).await)
}

/// Dispatch a tool call by name
pub async fn call_tool(
    resolver: &Arc<ProviderResolver>,
    name: &str,
    args: Value,
) -> Result<ToolResult> {
    let result = match name {
        "analyze_confidence" => handle_analyze_confidence(resolver, args).await,
        "generate_query" => handle_generate_query(resolver, args).await,
        "summarize_query" => handle_summarize_query(resolver, args).await,
        _ => anyhow::bail!("Unknown tool: {}", name),
    };
    Ok(result)
}

fn envelope_result(response: ApiResponse) -> ToolResult {
    let text = serde_json::to_string_pretty(&response.body).unwrap_or_default();
    ToolResult {
        content: vec![Content::Text { text }],
        is_error: (!response.is_success()).then_some(true),
        structured_content: Some(response.body),
    }
}
