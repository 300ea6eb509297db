//! Query title command

use crate::app::{OutputFormat, SummarizeArgs};
use crate::output::emit;
use anyhow::Result;
use litsearch_core::{api, ProviderResolver};
use serde_json::{json, Value};
use std::sync::Arc;

pub async fn run(
    args: SummarizeArgs,
    resolver: &Arc<ProviderResolver>,
    format: OutputFormat,
) -> Result<()> {
    let request = json!({
        "query": args.query.join(" "),
        "provider": args.model.provider,
        "model": args.model.model,
    });

    let response = api::summarize_query(resolver, request).await;
    emit(response, format, |body: &Value| {
        format!("{}\n", body["summary"].as_str().unwrap_or_default())
    })
}
