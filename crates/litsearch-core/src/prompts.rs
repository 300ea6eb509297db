//! Prompt builders
//!
//! Pure functions: same input, byte-identical prompt. No I/O.

use crate::types::ExtractedField;
use serde_json::Value;

/// Shared instructions for query generation and refinement
const BOOLEAN_QUERY_RULES: &str = r#"You are an expert research librarian who writes Boolean search queries for academic literature databases.

Rules for the query:
1. Use only the Boolean operators AND, OR and NOT, always in uppercase.
2. Put multi-word concepts in double quotes as exact phrases, e.g. "machine learning".
3. Group synonyms and alternative terms in parentheses joined by OR, e.g. ("heart attack" OR "myocardial infarction").
4. Do not use field prefixes or filters such as author:, year:, title: or journal:.
5. Maximize recall for the core concepts without adding terms that only bring noise.
6. Use NOT to exclude domains that are known to produce false positives."#;

/// Build the confidence analysis prompt
pub fn confidence_analysis_prompt(source_text: &str, fields: &[ExtractedField]) -> String {
    let field_blocks: Vec<String> = fields
        .iter()
        .map(|field| {
            let prior = field
                .confidence
                .map(|c| c.to_string())
                .unwrap_or_else(|| "N/A".to_string());
            let citations = field
                .citations
                .as_ref()
                .map(|c| Value::Array(c.clone()).to_string())
                .unwrap_or_else(|| "None".to_string());

            format!(
                "Field ID: {}\nName: {}\nType: {}\nExtracted value: {}\nPrior confidence: {}\nCitations: {}",
                field.id, field.name, field.field_type, field.value, prior, citations
            )
        })
        .collect();

    format!(
        r#"You are verifying data extracted from a research paper. Score how well each extracted value is supported by the source text.

SOURCE TEXT:
"""
{}
"""

EXTRACTED FIELDS:

{}

Confidence scale:
- 1.0: exact, unambiguous match in the text
- 0.8-0.9: strong evidence, minor interpretation needed
- 0.6-0.7: moderate evidence, some inference required
- 0.4-0.5: weak evidence, significant interpretation
- 0.2-0.3: very weak evidence, mostly inferred
- 0.0-0.1: no evidence, or the text contradicts the value

For each field:
1. Verify the extracted value against the source text.
2. Assess the evidence strength: strong, moderate, weak or none.
3. List any issues (ambiguity, unit mismatch, partial match, contradiction).
4. Justify the confidence score in one or two sentences.

Use the exact Field ID as fieldId and return one score per field.
Then give one overall confidence score for the whole extraction and concrete recommendations for improving it."#,
        source_text,
        field_blocks.join("\n\n")
    )
}

/// Build the prompt for a fresh query from a research description
pub fn query_generation_prompt(description: &str) -> String {
    format!(
        r#"{}

Research description:
{}

Write one Boolean search query that captures this research topic.

Output only the query, on a single line, with no explanation."#,
        BOOLEAN_QUERY_RULES, description
    )
}

/// Build the prompt for refining an existing query with user feedback
pub fn query_refinement_prompt(existing_query: &str, feedback: &str) -> String {
    format!(
        r#"{}

Current query:
{}

User feedback:
{}

Refine the current query to incorporate the feedback while preserving its core concept.

Output only the query, on a single line, with no explanation."#,
        BOOLEAN_QUERY_RULES, existing_query, feedback
    )
}

/// Build the prompt that compresses a query into a short title
pub fn summarization_prompt(query: &str) -> String {
    format!(
        r#"Summarize this Boolean search query as a short title of at most 5 words. Ignore the Boolean operators (AND, OR, NOT), quotes and parentheses; describe the topic.

Query: {}

Output only the title, with no quotes and no trailing period."#,
        query
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn field(id: &str, confidence: Option<f64>, citations: Option<Vec<Value>>) -> ExtractedField {
        ExtractedField {
            id: id.to_string(),
            name: "sample_size".to_string(),
            field_type: "number".to_string(),
            value: json!(120),
            confidence,
            citations,
        }
    }

    #[test]
    fn test_confidence_prompt_embeds_fields() {
        let fields = vec![
            field("f1", Some(0.75), Some(vec![json!({"page": 3})])),
            field("f2", None, None),
        ];
        let prompt = confidence_analysis_prompt("We enrolled 120 participants.", &fields);

        assert!(prompt.contains("We enrolled 120 participants."));
        assert!(prompt.contains("Field ID: f1"));
        assert!(prompt.contains("Extracted value: 120"));
        assert!(prompt.contains("Prior confidence: 0.75"));
        assert!(prompt.contains(r#"Citations: [{"page":3}]"#));
        assert!(prompt.contains("Field ID: f2"));
        assert!(prompt.contains("Prior confidence: N/A"));
        assert!(prompt.contains("Citations: None"));
        assert!(prompt.contains("1.0: exact, unambiguous match"));
        assert!(prompt.contains("0.0-0.1: no evidence"));
    }

    #[test]
    fn test_confidence_prompt_serializes_string_values_as_json() {
        let mut f = field("f1", None, None);
        f.value = json!("Randomized \"double-blind\" trial");
        let prompt = confidence_analysis_prompt("text", &[f]);
        assert!(prompt.contains(r#"Extracted value: "Randomized \"double-blind\" trial""#));
    }

    #[test]
    fn test_prompts_are_deterministic() {
        let fields = vec![field("f1", Some(0.5), None)];
        assert_eq!(
            confidence_analysis_prompt("abc", &fields),
            confidence_analysis_prompt("abc", &fields)
        );
        assert_eq!(query_generation_prompt("x"), query_generation_prompt("x"));
        assert_eq!(summarization_prompt("a AND b"), summarization_prompt("a AND b"));
    }

    #[test]
    fn test_generation_prompt() {
        let prompt = query_generation_prompt("CRISPR gene editing in cancer therapy");
        assert!(prompt.contains("CRISPR gene editing in cancer therapy"));
        assert!(prompt.contains("Do not use field prefixes"));
        assert!(prompt.trim_end().ends_with("with no explanation."));
        assert!(!prompt.contains("Current query"));
    }

    #[test]
    fn test_refinement_prompt() {
        let prompt = query_refinement_prompt("cancer AND therapy", "exclude animal studies");
        assert!(prompt.contains("Current query:\ncancer AND therapy"));
        assert!(prompt.contains("User feedback:\nexclude animal studies"));
        assert!(prompt.contains("preserving its core concept"));
        assert!(prompt.contains("Output only the query"));
    }

    #[test]
    fn test_summarization_prompt() {
        let prompt = summarization_prompt("cancer AND immunotherapy");
        assert!(prompt.contains("Query: cancer AND immunotherapy"));
        assert!(prompt.contains("at most 5 words"));
        assert!(prompt.contains("Output only the title"));
    }
}
