//! Confidence analysis command

use crate::app::{AnalyzeArgs, OutputFormat};
use crate::output::emit;
use anyhow::Result;
use litsearch_core::{api, LitSearchError, ProviderResolver};
use serde_json::{json, Value};
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

pub async fn run(
    args: AnalyzeArgs,
    resolver: &Arc<ProviderResolver>,
    format: OutputFormat,
) -> Result<()> {
    let source_text = read_source(&args.source)?;
    let extracted_fields = read_fields(&args.fields)?;

    let request = json!({
        "sourceText": source_text,
        "extractedFields": extracted_fields,
        "provider": args.model.provider,
        "model": args.model.model,
    });

    let response = api::analyze_confidence(resolver, request).await;
    emit(response, format, render_report)
}

fn read_source(path: &Path) -> std::result::Result<String, LitSearchError> {
    let read = if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text).map(|_| text)
    } else {
        std::fs::read_to_string(path)
    };

    read.map_err(|e| {
        LitSearchError::InvalidInput(format!("cannot read source {}: {}", path.display(), e))
    })
}

fn read_fields(path: &Path) -> std::result::Result<Value, LitSearchError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        LitSearchError::InvalidInput(format!("cannot read fields {}: {}", path.display(), e))
    })?;
    serde_json::from_str(&content).map_err(|e| {
        LitSearchError::InvalidInput(format!("fields file {} is not JSON: {}", path.display(), e))
    })
}

fn render_report(body: &Value) -> String {
    let analysis = &body["analysis"];
    let mut output = String::new();

    for score in analysis["fieldScores"].as_array().into_iter().flatten() {
        let pct = (score["confidence"].as_f64().unwrap_or(0.0) * 100.0).round() as u32;
        output.push_str(&format!(
            "{:>3}% {} [{}]\n",
            pct,
            score["fieldId"].as_str().unwrap_or("?"),
            score["evidenceStrength"].as_str().unwrap_or("none"),
        ));
        if let Some(reasoning) = score["reasoning"].as_str() {
            output.push_str(&format!("     {}\n", reasoning));
        }
        for issue in score["issues"].as_array().into_iter().flatten() {
            if let Some(issue) = issue.as_str() {
                output.push_str(&format!("     ! {}\n", issue));
            }
        }
    }

    let overall = (analysis["overallConfidence"].as_f64().unwrap_or(0.0) * 100.0).round() as u32;
    output.push_str(&format!("\nOverall: {}%\n", overall));

    let recommendations: Vec<&str> = analysis["recommendations"]
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
        .collect();
    if !recommendations.is_empty() {
        output.push_str("\nRecommendations:\n");
        for rec in recommendations {
            output.push_str(&format!("  - {}\n", rec));
        }
    }

    output
}
