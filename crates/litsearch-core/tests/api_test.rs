mod common;

use common::{stub_resolver, StubClient, ALL_KEYS};
use litsearch_core::api::{self, GENERATION_FAILED, SUMMARY_FAILED};
use serde_json::json;

#[tokio::test]
async fn test_analyze_envelope_success() {
    let client = StubClient::replying(
        r#"Here you go:
{"fieldScores": [{"fieldId": "f1", "confidence": 0.4, "reasoning": "Age only implied.", "evidenceStrength": "weak", "issues": ["indirect"]}],
 "overallConfidence": 0.4, "recommendations": ["Verify the age field"]}"#,
    );
    let (resolver, _) = stub_resolver(client, ALL_KEYS);

    let response = api::analyze_confidence(
        &resolver,
        json!({
            "sourceText": "Participants were middle-aged.",
            "extractedFields": [{"id": "f1", "name": "age", "type": "number", "value": 45}]
        }),
    )
    .await;

    assert_eq!(response.status, 200);
    let analysis = &response.body["analysis"];
    assert_eq!(analysis["fieldScores"][0]["fieldId"], "f1");
    assert_eq!(analysis["fieldScores"][0]["evidenceStrength"], "weak");
    assert_eq!(analysis["recommendations"][0], "Verify the age field");
    assert!(response.body["timestamp"].is_string());
}

#[tokio::test]
async fn test_generate_envelope_hides_provider_detail() {
    let client = StubClient::failing();
    let (resolver, _) = stub_resolver(client, ALL_KEYS);

    let response = api::generate_query(&resolver, json!({"description": "sleep and memory"})).await;
    assert_eq!(response.status, 500);
    assert_eq!(response.body, json!({ "error": GENERATION_FAILED }));
}

#[tokio::test]
async fn test_generate_envelope_unknown_action_is_400() {
    let client = StubClient::replying("unused");
    let (resolver, _) = stub_resolver(client.clone(), ALL_KEYS);

    let response = api::generate_query(
        &resolver,
        json!({"description": "sleep", "action": "rewrite"}),
    )
    .await;
    assert_eq!(response.status, 400);
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn test_summarize_envelope_fallback_is_200() {
    let client = StubClient::failing();
    let (resolver, _) = stub_resolver(client, ALL_KEYS);

    let response =
        api::summarize_query(&resolver, json!({"query": "microbiome AND depression"})).await;
    assert_eq!(response.status, 200);
    assert_eq!(response.body, json!({ "summary": "microbiome depression" }));
    assert_ne!(response.body["summary"], SUMMARY_FAILED);
}

#[tokio::test]
async fn test_summarize_envelope_missing_key_is_500() {
    let client = StubClient::replying("unused");
    let (resolver, _) = stub_resolver(client, &[]);

    let response = api::summarize_query(&resolver, json!({"query": "microbiome"})).await;
    assert_eq!(response.status, 500);
    assert!(response.body["error"]
        .as_str()
        .unwrap()
        .contains("OPENAI_API_KEY"));
}
