//! Confidence analysis of extracted fields against their source text
//!
//! Fails closed: there is no deterministic substitute for "what does the
//! evidence say", so any model or validation failure fails the whole
//! analysis and no partial result is ever returned.

use crate::error::{LitSearchError, Result};
use crate::llm::{CompletionOptions, ProviderResolver, ResultSchema, SchemaField, SchemaType};
use crate::prompts::confidence_analysis_prompt;
use crate::types::{
    AnalysisReport, AnalysisRequest, ConfidenceAnalysisResult, EvidenceStrength, ExtractedField,
};
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;

/// Low temperature keeps repeated scoring of identical input stable
pub const ANALYSIS_TEMPERATURE: f32 = 0.1;

/// Declared shape of a confidence analysis result
pub fn confidence_result_schema() -> ResultSchema {
    let field_score = SchemaType::Object(vec![
        SchemaField::required("fieldId", SchemaType::String)
            .describe("Field ID exactly as given in the prompt"),
        SchemaField::required("confidence", SchemaType::number_in(0.0, 1.0)),
        SchemaField::required("reasoning", SchemaType::String),
        SchemaField::required("evidenceStrength", SchemaType::Enum(EvidenceStrength::VALUES)),
        SchemaField::optional("issues", SchemaType::array(SchemaType::String)),
    ]);

    ResultSchema::object(
        "confidence_analysis",
        vec![
            SchemaField::required("fieldScores", SchemaType::array(field_score)),
            SchemaField::required("overallConfidence", SchemaType::number_in(0.0, 1.0)),
            SchemaField::required("recommendations", SchemaType::array(SchemaType::String)),
        ],
    )
}

/// Scores extracted fields with a schema-constrained model call
pub struct ConfidenceAnalyzer {
    resolver: Arc<ProviderResolver>,
}

impl ConfidenceAnalyzer {
    pub fn new(resolver: Arc<ProviderResolver>) -> Self {
        Self { resolver }
    }

    /// Analyze confidence of every extracted field
    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisReport> {
        validate_input(&request.source_text, &request.extracted_fields)?;

        let selection = self.resolver.select(
            &self.resolver.config().defaults.analysis,
            request.provider.as_deref(),
            request.model.as_deref(),
        )?;
        let handle = self.resolver.resolve(&selection)?;

        let prompt = confidence_analysis_prompt(&request.source_text, &request.extracted_fields);
        let options = CompletionOptions::default().with_temperature(ANALYSIS_TEMPERATURE);

        tracing::info!(
            "Analyzing {} fields with {} ({})",
            request.extracted_fields.len(),
            selection.model,
            selection.provider
        );

        let analysis: ConfidenceAnalysisResult = handle
            .complete_structured(prompt, &options, &confidence_result_schema())
            .await?;

        check_field_coverage(&request.extracted_fields, &analysis)?;

        Ok(AnalysisReport {
            analysis,
            timestamp: Utc::now(),
        })
    }
}

fn validate_input(source_text: &str, fields: &[ExtractedField]) -> Result<()> {
    if source_text.trim().is_empty() {
        return Err(LitSearchError::InvalidInput(
            "sourceText is required".to_string(),
        ));
    }
    if fields.is_empty() {
        return Err(LitSearchError::InvalidInput(
            "extractedFields must contain at least one field".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for field in fields {
        if field.id.trim().is_empty() {
            return Err(LitSearchError::InvalidInput(format!(
                "extracted field '{}' has an empty id",
                field.name
            )));
        }
        if !seen.insert(field.id.as_str()) {
            return Err(LitSearchError::InvalidInput(format!(
                "duplicate extracted field id '{}'",
                field.id
            )));
        }
    }
    Ok(())
}

/// Exactly one score per input field, none for unknown ids
fn check_field_coverage(
    fields: &[ExtractedField],
    analysis: &ConfidenceAnalysisResult,
) -> Result<()> {
    let expected: HashSet<&str> = fields.iter().map(|f| f.id.as_str()).collect();
    let mut scored = HashSet::new();

    for score in &analysis.field_scores {
        if !expected.contains(score.field_id.as_str()) {
            return Err(LitSearchError::Validation(format!(
                "score references unknown field id '{}'",
                score.field_id
            )));
        }
        if !scored.insert(score.field_id.as_str()) {
            return Err(LitSearchError::Validation(format!(
                "field id '{}' scored more than once",
                score.field_id
            )));
        }
    }

    let mut missing: Vec<&str> = expected.difference(&scored).copied().collect();
    if !missing.is_empty() {
        missing.sort_unstable();
        return Err(LitSearchError::Validation(format!(
            "no score for field ids: {}",
            missing.join(", ")
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldConfidenceScore;
    use serde_json::json;

    fn field(id: &str) -> ExtractedField {
        ExtractedField {
            id: id.to_string(),
            name: "age".to_string(),
            field_type: "number".to_string(),
            value: json!(45),
            confidence: None,
            citations: None,
        }
    }

    fn score(id: &str) -> FieldConfidenceScore {
        FieldConfidenceScore {
            field_id: id.to_string(),
            confidence: 0.9,
            reasoning: "Stated directly".to_string(),
            evidence_strength: EvidenceStrength::Strong,
            issues: None,
        }
    }

    fn result(ids: &[&str]) -> ConfidenceAnalysisResult {
        ConfidenceAnalysisResult {
            field_scores: ids.iter().map(|id| score(id)).collect(),
            overall_confidence: 0.9,
            recommendations: vec![],
        }
    }

    #[test]
    fn test_validate_input() {
        assert!(validate_input("text", &[field("f1")]).is_ok());
        assert!(matches!(
            validate_input("  ", &[field("f1")]),
            Err(LitSearchError::InvalidInput(_))
        ));
        assert!(matches!(
            validate_input("text", &[]),
            Err(LitSearchError::InvalidInput(_))
        ));
        assert!(matches!(
            validate_input("text", &[field("")]),
            Err(LitSearchError::InvalidInput(_))
        ));
        assert!(matches!(
            validate_input("text", &[field("f1"), field("f1")]),
            Err(LitSearchError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_field_coverage() {
        let fields = vec![field("f1"), field("f2")];
        assert!(check_field_coverage(&fields, &result(&["f2", "f1"])).is_ok());

        let missing = check_field_coverage(&fields, &result(&["f1"])).unwrap_err();
        assert!(missing.to_string().contains("no score for field ids: f2"));

        let unknown = check_field_coverage(&fields, &result(&["f1", "f2", "f3"])).unwrap_err();
        assert!(unknown.to_string().contains("unknown field id 'f3'"));

        let duplicate = check_field_coverage(&fields, &result(&["f1", "f1", "f2"])).unwrap_err();
        assert!(duplicate.to_string().contains("more than once"));
    }

    #[test]
    fn test_schema_accepts_model_output() {
        let output = json!({
            "fieldScores": [{
                "fieldId": "f1",
                "confidence": 0.95,
                "reasoning": "The text states the age as 45 years.",
                "evidenceStrength": "strong",
                "issues": []
            }],
            "overallConfidence": 0.95,
            "recommendations": ["None needed"]
        });
        assert!(confidence_result_schema().validate(&output).is_ok());
        let parsed: ConfidenceAnalysisResult = serde_json::from_value(output).unwrap();
        assert_eq!(parsed.field_scores[0].evidence_strength, EvidenceStrength::Strong);
    }

    #[test]
    fn test_schema_rejects_out_of_range_overall() {
        let output = json!({
            "fieldScores": [],
            "overallConfidence": 1.2,
            "recommendations": []
        });
        let err = confidence_result_schema().validate(&output).unwrap_err();
        assert!(err.to_string().contains("$.overallConfidence"));
    }
}
