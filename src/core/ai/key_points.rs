use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

use super::outcome::Analysis;
use super::prompt::PromptBuilder;
use super::provider::AIProvider;
use crate::infrastructure::error::ReviewError;

/// JSON 结果最多保留的要点数
pub const MAX_KEY_POINTS: usize = 5;

/// 按行拆分降级时最多保留的行数
pub const MAX_FALLBACK_LINES: usize = 3;

/// 未配置 API key 时返回的占位文本
pub const MISSING_KEY_PLACEHOLDER: &str = "Analysis unavailable (Missing API Key)";

/// 调用失败时返回的占位文本
pub const EXTRACTION_FAILED_PLACEHOLDER: &str = "Gagal melakukan analisis";

/// 要点提取接口
///
/// 实现方不得返回错误，失败时返回单元素的占位列表。
#[async_trait]
pub trait KeyPointAnalyzer: Send + Sync {
    async fn extract(&self, review_text: &str, product_name: &str) -> Analysis<Vec<String>>;
}

/// 去掉 Markdown 代码块标记
fn strip_code_fences(raw: &str) -> String {
    raw.replace("```json", "").replace("```", "").trim().to_string()
}

fn json_item_to_string(item: Value) -> String {
    match item {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// 解析模型输出
///
/// 严格 JSON 数组优先；不是数组时整段文本作为唯一要点；
/// 无法解析时按行拆分，去掉首尾的 `-`、`*` 与空白。
pub fn parse_key_points(raw: &str) -> Analysis<Vec<String>> {
    let cleaned = strip_code_fences(raw);

    match serde_json::from_str::<Value>(&cleaned) {
        Ok(Value::Array(items)) => Analysis::Completed(
            items
                .into_iter()
                .take(MAX_KEY_POINTS)
                .map(json_item_to_string)
                .collect(),
        ),
        Ok(_) => Analysis::fallback(
            vec![cleaned],
            ReviewError::parsing("Model output is JSON but not an array", "application/json"),
        ),
        Err(e) => {
            let lines = cleaned
                .lines()
                .map(|line| line.trim_matches(|c: char| c == '-' || c == '*' || c.is_whitespace()))
                .filter(|line| !line.is_empty())
                .take(MAX_FALLBACK_LINES)
                .map(str::to_string)
                .collect();
            Analysis::fallback(lines, e.into())
        }
    }
}

/// 基于生成式模型的要点提取器
pub struct KeyPointExtractor {
    provider: Arc<dyn AIProvider>,
    prompt_builder: PromptBuilder,
}

impl KeyPointExtractor {
    pub fn new(provider: Arc<dyn AIProvider>) -> Self {
        Self {
            provider,
            prompt_builder: PromptBuilder::new(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_configured()
    }
}

#[async_trait]
impl KeyPointAnalyzer for KeyPointExtractor {
    async fn extract(&self, review_text: &str, product_name: &str) -> Analysis<Vec<String>> {
        if !self.provider.is_configured() {
            error!(provider = self.provider.name(), "Aborting key point extraction: no API key");
            return Analysis::fallback(
                vec![MISSING_KEY_PLACEHOLDER.to_string()],
                ReviewError::config(format!("{} API key is not configured", self.provider.name())),
            );
        }

        let failed = |e: ReviewError| {
            error!(
                provider = self.provider.name(),
                error = %e,
                category = ?e.category(),
                retryable = e.is_retryable(),
                "Key point extraction failed"
            );
            Analysis::fallback(vec![EXTRACTION_FAILED_PLACEHOLDER.to_string()], e)
        };

        let prompt = match self.prompt_builder.build_key_points_prompt(product_name, review_text) {
            Ok(prompt) => prompt,
            Err(e) => return failed(e),
        };

        info!(provider = self.provider.name(), "Extracting key points");
        let start_time = Instant::now();

        let raw = match self.provider.generate(&prompt).await {
            Ok(raw) => raw,
            Err(e) => return failed(e),
        };

        let outcome = parse_key_points(&raw);
        match outcome.cause() {
            None => info!(
                count = outcome.value().len(),
                elapsed_ms = start_time.elapsed().as_millis() as u64,
                "Key points extracted"
            ),
            Some(cause) => warn!(error = %cause, "Key point JSON parse failed, using text fallback"),
        }
        outcome
    }
}
