//! Request and result types
//!
//! Everything here is built per request and dropped with the response.
//! Wire names are camelCase.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Field previously extracted from a paper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedField {
    /// Caller-supplied id; scores reference it
    pub id: String,

    pub name: String,

    #[serde(rename = "type")]
    pub field_type: String,

    pub value: Value,

    /// Prior confidence from the extraction step (0.0 - 1.0)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,

    /// Opaque references into the source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citations: Option<Vec<Value>>,
}

/// How directly the source text supports a value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvidenceStrength {
    Strong,
    Moderate,
    Weak,
    None,
}

impl EvidenceStrength {
    pub const VALUES: &'static [&'static str] = &["strong", "moderate", "weak", "none"];
}

/// Confidence verdict for one extracted field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldConfidenceScore {
    pub field_id: String,
    pub confidence: f64,
    pub reasoning: String,
    pub evidence_strength: EvidenceStrength,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issues: Option<Vec<String>>,
}

/// Model verdict across all fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfidenceAnalysisResult {
    /// One entry per input field; order may differ from the input
    pub field_scores: Vec<FieldConfidenceScore>,
    pub overall_confidence: f64,
    pub recommendations: Vec<String>,
}

/// Successful confidence analysis with its generation time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub analysis: ConfidenceAnalysisResult,
    pub timestamp: DateTime<Utc>,
}

/// Confidence analysis request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    #[serde(default)]
    pub source_text: String,
    #[serde(default)]
    pub extracted_fields: Vec<ExtractedField>,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

/// Requested query operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryAction {
    Generate,
    Refine,
}

/// Boolean query generation/refinement request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BooleanQueryRequest {
    /// Research description (generate) or feedback on the existing query (refine)
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub existing_query: Option<String>,
    #[serde(default)]
    pub action: Option<QueryAction>,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

impl BooleanQueryRequest {
    pub fn generate(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Default::default()
        }
    }

    pub fn refine(existing_query: impl Into<String>, feedback: impl Into<String>) -> Self {
        Self {
            description: feedback.into(),
            existing_query: Some(existing_query.into()),
            action: Some(QueryAction::Refine),
            ..Default::default()
        }
    }
}

/// Query summarization request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRequest {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

/// Where a summary came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummarySource {
    Model,
    Fallback,
}

/// Short title for a query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuerySummary {
    pub summary: String,
    pub source: SummarySource,
}
