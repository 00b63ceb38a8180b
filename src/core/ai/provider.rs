use async_trait::async_trait;

use crate::infrastructure::error::ReviewError;

/// 生成式 AI 提供商配置
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub model: String,
    pub api_key: Option<String>,
    pub api_url: String,
    pub timeout_secs: u64,
    /// 未设置时使用模型默认值
    pub temperature: Option<f32>,
    /// 未设置时不限制；2.5 系列的思考 token 也计入该上限
    pub max_output_tokens: Option<u32>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            model: String::from("gemini-2.5-flash"),
            api_key: None,
            api_url: String::from("https://generativelanguage.googleapis.com/v1beta"),
            timeout_secs: 60,
            temperature: None,
            max_output_tokens: None,
        }
    }
}

impl ProviderConfig {
    /// 空白字符串视为未配置
    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_deref()
            .map(|key| !key.trim().is_empty())
            .unwrap_or(false)
    }
}

/// 生成式 AI 提供商接口
#[async_trait]
pub trait AIProvider: Send + Sync {
    /// 提供商名称，用于日志
    fn name(&self) -> &str;

    /// 是否已配置凭证
    fn is_configured(&self) -> bool;

    /// 生成文本（非流式）
    async fn generate(&self, prompt: &str) -> Result<String, ReviewError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_config_default() {
        let config = ProviderConfig::default();
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.timeout_secs, 60);
        assert!(config.api_key.is_none());
        assert!(!config.has_api_key());
        assert!(config.temperature.is_none());
        assert!(config.max_output_tokens.is_none());
    }

    #[test]
    fn test_blank_api_key_is_not_configured() {
        let config = ProviderConfig {
            api_key: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(!config.has_api_key());

        let config = ProviderConfig {
            api_key: Some("key".to_string()),
            ..Default::default()
        };
        assert!(config.has_api_key());
    }
}
