use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use review_analyzer::core::ai::key_points::{EXTRACTION_FAILED_PLACEHOLDER, MISSING_KEY_PLACEHOLDER};
use review_analyzer::core::ai::{
    build_client, GeminiProvider, HttpClientConfig, KeyPointAnalyzer, KeyPointExtractor, ProviderConfig,
};
use review_analyzer::infrastructure::ReviewError;

const GENERATE_PATH: &str = "/v1beta/models/gemini-test:generateContent";

fn create_extractor(server: &MockServer, api_key: Option<&str>) -> KeyPointExtractor {
    let client = build_client(&HttpClientConfig::default()).unwrap();
    let config = ProviderConfig {
        model: "gemini-test".to_string(),
        api_key: api_key.map(str::to_string),
        api_url: format!("{}/v1beta", server.uri()),
        timeout_secs: 5,
        ..Default::default()
    };
    KeyPointExtractor::new(Arc::new(GeminiProvider::new(client, config)))
}

/// 构造 generateContent 响应
fn gemini_response(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": {
                "parts": [{ "text": text }],
                "role": "model"
            },
            "finishReason": "STOP"
        }]
    })
}

#[tokio::test]
async fn test_extract_parses_fenced_json_array() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("x-goog-api-key", "gemini-test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_response(
            "```json\n[\"Baterai awet\", \"Layar terang\", \"Harga terjangkau\"]\n```",
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let extractor = create_extractor(&mock_server, Some("gemini-test-key"));
    let outcome = extractor
        .extract("Baterai awet, layar terang, harga terjangkau", "Phone X")
        .await;

    assert!(!outcome.is_fallback());
    assert_eq!(
        outcome.into_value(),
        vec!["Baterai awet", "Layar terang", "Harga terjangkau"]
    );
}

#[tokio::test]
async fn test_default_request_sends_prompt_only() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(|request: &Request| {
            let body: serde_json::Value = match serde_json::from_slice(&request.body) {
                Ok(body) => body,
                Err(_) => return false,
            };
            body.get("generationConfig").is_none()
                && body["contents"][0]["parts"][0]["text"]
                    .as_str()
                    .map_or(false, |text| text.contains("Product: \"Blender\""))
        })
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_response(r#"["Quiet motor"]"#)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let extractor = create_extractor(&mock_server, Some("gemini-test-key"));
    let outcome = extractor.extract("Quiet motor and easy to clean", "Blender").await;

    assert!(!outcome.is_fallback());
    assert_eq!(outcome.into_value(), vec!["Quiet motor"]);
}

#[tokio::test]
async fn test_extract_keeps_at_most_five_points() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_response(
            r#"["a", "b", "c", "d", "e", "f"]"#,
        )))
        .mount(&mock_server)
        .await;

    let extractor = create_extractor(&mock_server, Some("gemini-test-key"));
    let points = extractor
        .extract("A long review covering many different aspects", "Laptop")
        .await
        .into_value();

    assert_eq!(points, vec!["a", "b", "c", "d", "e"]);
}

#[tokio::test]
async fn test_extract_falls_back_to_lines() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_response(
            "- Fast shipping\n- Sturdy packaging\n\n* Works as described\n- Friendly seller",
        )))
        .mount(&mock_server)
        .await;

    let extractor = create_extractor(&mock_server, Some("gemini-test-key"));
    let outcome = extractor
        .extract("Fast shipping, sturdy packaging, works as described", "Kettle")
        .await;

    assert!(outcome.is_fallback());
    assert_eq!(
        outcome.into_value(),
        vec!["Fast shipping", "Sturdy packaging", "Works as described"]
    );
}

#[tokio::test]
async fn test_server_error_returns_failure_placeholder() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": { "code": 500, "message": "internal" }
        })))
        .mount(&mock_server)
        .await;

    let extractor = create_extractor(&mock_server, Some("gemini-test-key"));
    let outcome = extractor
        .extract("Decent blender but loud", "Blender")
        .await;

    assert!(matches!(
        outcome.cause(),
        Some(ReviewError::AIService { status: Some(500), .. })
    ));
    assert_eq!(outcome.into_value(), vec![EXTRACTION_FAILED_PLACEHOLDER]);
}

#[tokio::test]
async fn test_empty_candidates_returns_failure_placeholder() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&mock_server)
        .await;

    let extractor = create_extractor(&mock_server, Some("gemini-test-key"));
    let outcome = extractor
        .extract("Decent blender but loud", "Blender")
        .await;

    assert_eq!(outcome.into_value(), vec![EXTRACTION_FAILED_PLACEHOLDER]);
}

#[tokio::test]
async fn test_missing_api_key_skips_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_response("[]")))
        .expect(0)
        .mount(&mock_server)
        .await;

    let extractor = create_extractor(&mock_server, None);
    assert!(!extractor.is_configured());

    let outcome = extractor
        .extract("Decent blender but loud", "Blender")
        .await;

    assert!(matches!(outcome.cause(), Some(ReviewError::Configuration { .. })));
    assert_eq!(outcome.into_value(), vec![MISSING_KEY_PLACEHOLDER]);
}
