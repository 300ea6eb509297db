//! Boolean query command

use crate::app::{OutputFormat, QueryArgs};
use crate::output::emit;
use anyhow::Result;
use litsearch_core::{api, ProviderResolver};
use serde_json::{json, Value};
use std::sync::Arc;

pub async fn run(
    args: QueryArgs,
    resolver: &Arc<ProviderResolver>,
    format: OutputFormat,
) -> Result<()> {
    let action = if args.refine { "refine" } else { "generate" };

    let request = json!({
        "description": args.description.join(" "),
        "existingQuery": args.existing_query,
        "action": action,
        "provider": args.model.provider,
        "model": args.model.model,
    });

    let response = api::generate_query(resolver, request).await;
    emit(response, format, |body: &Value| {
        format!("{}\n", body["query"].as_str().unwrap_or_default())
    })
}
