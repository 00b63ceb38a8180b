use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::core::ai::provider::{AIProvider, ProviderConfig};
use crate::infrastructure::error::ReviewError;

const PROVIDER_NAME: &str = "gemini";

/// Google Generative AI 请求
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GeminiGenerationConfig>,
}

#[derive(Serialize)]
struct GeminiContent<'a> {
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

/// Gemini 响应
#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContentResponse>,
}

#[derive(Deserialize)]
struct GeminiContentResponse {
    #[serde(default)]
    parts: Vec<GeminiPartResponse>,
}

#[derive(Deserialize)]
struct GeminiPartResponse {
    text: Option<String>,
}

impl GeminiResponse {
    /// 拼接第一个候选的所有文本片段
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// Gemini (Google) AI 提供商
///
/// model 嵌入 URL 路径，API key 通过 `x-goog-api-key` 头传递。
/// 默认 URL 前缀: https://generativelanguage.googleapis.com/v1beta
pub struct GeminiProvider {
    client: Client,
    config: ProviderConfig,
}

impl GeminiProvider {
    pub fn new(client: Client, config: ProviderConfig) -> Self {
        Self { client, config }
    }

    /// 两个参数都未设置时不发送 generationConfig
    fn generation_config(&self) -> Option<GeminiGenerationConfig> {
        if self.config.temperature.is_none() && self.config.max_output_tokens.is_none() {
            return None;
        }
        Some(GeminiGenerationConfig {
            temperature: self.config.temperature,
            max_output_tokens: self.config.max_output_tokens,
        })
    }

    /// URL 格式: {base_url}/models/{model}:generateContent
    fn build_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.api_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl AIProvider for GeminiProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn is_configured(&self) -> bool {
        self.config.has_api_key()
    }

    async fn generate(&self, prompt: &str) -> Result<String, ReviewError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ReviewError::config("Gemini API key is required"))?;

        let url = self.build_url();
        let request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: prompt }],
            }],
            generation_config: self.generation_config(),
        };

        debug!(model = %self.config.model, "Sending Gemini generateContent request");

        let response = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .header("x-goog-api-key", api_key)
            .json(&request)
            .timeout(Duration::from_secs(self.config.timeout_secs))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ReviewError::ai_service(
                PROVIDER_NAME,
                format!("Gemini request failed: {} - {}", status, text),
                Some(status.as_u16()),
            ));
        }

        let api_response: GeminiResponse = response.json().await?;
        api_response
            .into_text()
            .ok_or_else(|| ReviewError::parsing("Gemini response contained no text", "application/json"))
    }
}
