use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

use super::outcome::Analysis;
use crate::infrastructure::error::ReviewError;
use crate::models::SentimentResult;

const PROVIDER_NAME: &str = "huggingface";

/// 默认情感分类模型地址
pub const DEFAULT_SENTIMENT_URL: &str =
    "https://router.huggingface.co/hf-inference/models/cardiffnlp/twitter-xlm-roberta-base-sentiment";

/// 情感分类接口
///
/// 实现方不得返回错误：任何失败都以 [`Analysis::Fallback`] 携带中性结果返回。
#[async_trait]
pub trait SentimentAnalyzer: Send + Sync {
    async fn classify(&self, text: &str) -> Analysis<SentimentResult>;
}

/// 情感分类客户端配置
#[derive(Debug, Clone)]
pub struct SentimentConfig {
    pub api_url: String,
    pub api_token: Option<String>,
    pub timeout_secs: u64,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_SENTIMENT_URL.to_string(),
            api_token: None,
            timeout_secs: 60,
        }
    }
}

/// `label` 只在胜出的一项上检查
#[derive(Debug, Deserialize)]
struct Prediction {
    #[serde(default)]
    label: Option<Value>,
    score: f64,
}

/// 解析分类接口返回的预测列表
///
/// 支持 `[{label, score}, ...]` 与 `[[{label, score}, ...]]` 两种形态，取得分最高的一项；
/// 并列时取先出现者。
pub fn parse_predictions(payload: &Value) -> Result<SentimentResult, ReviewError> {
    let outer = payload
        .as_array()
        .filter(|items| !items.is_empty())
        .ok_or_else(|| ReviewError::parsing("Invalid response format from sentiment API", "application/json"))?;

    let predictions = match &outer[0] {
        Value::Array(inner) => inner,
        _ => outer,
    };

    let mut best: Option<Prediction> = None;
    for item in predictions {
        let prediction = Prediction::deserialize(item)?;
        if best.as_ref().map_or(true, |b| prediction.score > b.score) {
            best = Some(prediction);
        }
    }

    let best = best.ok_or_else(|| ReviewError::parsing("Empty prediction list", "application/json"))?;
    let label = match &best.label {
        Some(Value::String(label)) => label.to_lowercase(),
        _ => {
            return Err(ReviewError::parsing(
                "Top prediction has no string label",
                "application/json",
            ))
        }
    };
    Ok(SentimentResult::new(label, round_score(best.score)))
}

/// 保留 4 位小数
fn round_score(score: f64) -> f64 {
    (score * 10_000.0).round() / 10_000.0
}

/// HuggingFace 推理接口情感分类客户端
pub struct SentimentClient {
    client: Client,
    config: SentimentConfig,
}

impl SentimentClient {
    pub fn new(client: Client, config: SentimentConfig) -> Self {
        Self { client, config }
    }

    pub fn is_configured(&self) -> bool {
        self.api_token().is_some()
    }

    fn api_token(&self) -> Option<&str> {
        self.config
            .api_token
            .as_deref()
            .filter(|token| !token.trim().is_empty())
    }

    async fn request(&self, text: &str) -> Result<SentimentResult, ReviewError> {
        let token = self
            .api_token()
            .ok_or_else(|| ReviewError::config("HuggingFace token is not configured"))?;

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(token)
            .json(&serde_json::json!({ "inputs": text }))
            .timeout(Duration::from_secs(self.config.timeout_secs))
            .send()
            .await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Sentiment API returned non-success status");
            return Err(ReviewError::ai_service(
                PROVIDER_NAME,
                format!("HF Error: {}", body),
                Some(status.as_u16()),
            ));
        }

        let payload: Value = response.json().await?;
        parse_predictions(&payload)
    }
}

#[async_trait]
impl SentimentAnalyzer for SentimentClient {
    async fn classify(&self, text: &str) -> Analysis<SentimentResult> {
        let preview: String = text.chars().take(30).collect();
        info!(preview = %preview, "Analyzing sentiment");
        let start_time = Instant::now();

        match self.request(text).await {
            Ok(result) => {
                info!(
                    label = %result.sentiment.to_uppercase(),
                    score = result.score,
                    elapsed_ms = start_time.elapsed().as_millis() as u64,
                    "Sentiment analysis completed"
                );
                Analysis::Completed(result)
            }
            Err(e) => {
                error!(
                    error = %e,
                    category = ?e.category(),
                    retryable = e.is_retryable(),
                    "Sentiment analysis failed, using neutral fallback"
                );
                Analysis::fallback(SentimentResult::neutral(), e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_flat_predictions() {
        let payload = json!([
            {"label": "Positive", "score": 0.9},
            {"label": "Negative", "score": 0.1}
        ]);
        let result = parse_predictions(&payload).unwrap();
        assert_eq!(result, SentimentResult::new("positive", 0.9));
    }

    #[test]
    fn test_parse_nested_predictions() {
        let payload = json!([[
            {"label": "negative", "score": 0.0521},
            {"label": "neutral", "score": 0.1203},
            {"label": "positive", "score": 0.827_654_321}
        ]]);
        let result = parse_predictions(&payload).unwrap();
        assert_eq!(result.sentiment, "positive");
        assert_eq!(result.score, 0.8277);
    }

    #[test]
    fn test_parse_tie_keeps_first() {
        let payload = json!([
            {"label": "NEUTRAL", "score": 0.5},
            {"label": "POSITIVE", "score": 0.5}
        ]);
        assert_eq!(parse_predictions(&payload).unwrap().sentiment, "neutral");
    }

    #[test]
    fn test_parse_malformed_payloads() {
        assert!(parse_predictions(&json!([])).is_err());
        assert!(parse_predictions(&json!([[]])).is_err());
        assert!(parse_predictions(&json!({"error": "Model is loading"})).is_err());
        assert!(parse_predictions(&json!([{"label": "positive"}])).is_err());
        assert!(parse_predictions(&json!(["positive"])).is_err());
        assert!(parse_predictions(&json!([{"label": 1, "score": 0.9}])).is_err());
    }

    #[test]
    fn test_parse_only_top_prediction_needs_label() {
        let payload = json!([
            {"label": "Negative", "score": 0.71},
            {"score": 0.2},
            {"label": null, "score": 0.09}
        ]);
        let result = parse_predictions(&payload).unwrap();
        assert_eq!(result, SentimentResult::new("negative", 0.71));

        let payload = json!([
            {"score": 0.8},
            {"label": "positive", "score": 0.2}
        ]);
        assert!(parse_predictions(&payload).is_err());
    }

    #[test]
    fn test_round_score() {
        assert_eq!(round_score(0.123_456), 0.1235);
        assert_eq!(round_score(1.0), 1.0);
    }

    #[tokio::test]
    async fn test_missing_token_falls_back_without_request() {
        let client = SentimentClient::new(
            Client::new(),
            SentimentConfig {
                // 不可达地址：若发出请求会得到网络错误而不是配置错误
                api_url: "http://127.0.0.1:9/unreachable".to_string(),
                api_token: None,
                timeout_secs: 1,
            },
        );

        assert!(!client.is_configured());
        let outcome = client.classify("This product is great").await;
        assert!(matches!(outcome.cause(), Some(ReviewError::Configuration { .. })));
        assert_eq!(outcome.into_value(), SentimentResult::neutral());
    }
}
