use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::core::ai::sentiment::DEFAULT_SENTIMENT_URL;
use crate::core::ai::{HttpClientConfig, ProviderConfig, SentimentConfig};
use crate::infrastructure::logging::{LogFormat, LogOutput};
use crate::review::AnalysisMode;
use crate::storage::StorageConfig;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub cors_origins: String,
    pub huggingface_token: Option<String>,
    pub huggingface_url: String,
    pub gemini_api_key: Option<String>,
    pub gemini_url: String,
    pub gemini_model: String,
    pub gemini_temperature: Option<f32>,
    pub gemini_max_output_tokens: Option<u32>,
    pub ai_timeout_secs: u64,
    pub analysis_mode: AnalysisMode,
    pub log_level: String,
    pub log_format: LogFormat,
    pub log_output: LogOutput,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: "0.0.0.0".to_string(),
            port: 6543,
            database_url: "sqlite://reviews.db?mode=rwc".to_string(),
            cors_origins: "*".to_string(),
            huggingface_token: None,
            huggingface_url: DEFAULT_SENTIMENT_URL.to_string(),
            gemini_api_key: None,
            gemini_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            gemini_model: "gemini-2.5-flash".to_string(),
            gemini_temperature: None,
            gemini_max_output_tokens: None,
            ai_timeout_secs: 60,
            analysis_mode: AnalysisMode::Sequential,
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            log_output: LogOutput::Stdout,
        }
    }
}

/// 空字符串视为未设置
fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    pub fn new() -> Self {
        let mut config = Config::default();

        // 加载 .env 文件
        #[cfg(not(test))]
        config.load_from_env_file();
        // 加载环境变量（覆盖默认值）
        config.load_from_env();

        config
    }

    pub fn load_from_env_file(&mut self) {
        // 尝试从用户主目录加载
        if let Ok(home) = env::var("HOME") {
            let user_env_path = PathBuf::from(home).join(".review-analyzer").join(".env");
            if user_env_path.exists() {
                dotenvy::from_path(user_env_path).ok();
            }
        }

        // 尝试从当前目录加载
        dotenvy::dotenv().ok();
    }

    pub fn load_from_env(&mut self) {
        if let Some(host) = non_empty_var("HOST") {
            self.host = host;
        }
        if let Some(port) = non_empty_var("PORT").and_then(|p| p.parse().ok()) {
            self.port = port;
        }
        if let Some(url) = non_empty_var("DATABASE_URL") {
            self.database_url = url;
        }
        if let Some(origins) = non_empty_var("CORS_ORIGINS") {
            self.cors_origins = origins;
        }
        if let Some(token) = non_empty_var("HUGGINGFACE_TOKEN") {
            self.huggingface_token = Some(token);
        }
        if let Some(url) = non_empty_var("HUGGINGFACE_API_URL") {
            self.huggingface_url = url;
        }
        if let Some(key) = non_empty_var("GEMINI_API_KEY") {
            self.gemini_api_key = Some(key);
        }
        if let Some(url) = non_empty_var("GEMINI_API_URL") {
            self.gemini_url = url;
        }
        if let Some(model) = non_empty_var("GEMINI_MODEL") {
            self.gemini_model = model;
        }
        if let Some(temperature) = non_empty_var("GEMINI_TEMPERATURE").and_then(|t| t.parse().ok()) {
            self.gemini_temperature = Some(temperature);
        }
        if let Some(tokens) = non_empty_var("GEMINI_MAX_OUTPUT_TOKENS").and_then(|t| t.parse().ok()) {
            self.gemini_max_output_tokens = Some(tokens);
        }
        if let Some(timeout) = non_empty_var("AI_REQUEST_TIMEOUT_SECS").and_then(|t| t.parse().ok()) {
            self.ai_timeout_secs = timeout;
        }
        if let Some(concurrent) = non_empty_var("ANALYSIS_CONCURRENT") {
            if matches!(concurrent.to_lowercase().as_str(), "1" | "true" | "yes") {
                self.analysis_mode = AnalysisMode::Concurrent;
            }
        }
        if let Some(level) = non_empty_var("LOG_LEVEL") {
            self.log_level = level;
        }
        if let Some(format) = non_empty_var("LOG_FORMAT").and_then(|f| f.parse().ok()) {
            self.log_format = format;
        }
        if let Some(output) = non_empty_var("LOG_OUTPUT").and_then(|o| o.parse().ok()) {
            self.log_output = output;
        }
    }

    pub fn update_from_args(&mut self, args: &crate::cli::args::Args) {
        // 命令行参数优先级最高
        if let Some(host) = &args.host {
            self.host = host.clone();
        }
        if let Some(port) = args.port {
            self.port = port;
        }
        if let Some(url) = &args.database_url {
            self.database_url = url.clone();
        }
        if let Some(level) = &args.log_level {
            self.log_level = level.clone();
        }
        if let Some(format) = args.log_format {
            self.log_format = format;
        }
        if args.concurrent_analysis {
            self.analysis_mode = AnalysisMode::Concurrent;
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.port == 0 {
            anyhow::bail!("PORT must be a non-zero port number");
        }
        if self.database_url.trim().is_empty() {
            anyhow::bail!("DATABASE_URL must not be empty");
        }
        if self.storage_config().storage_type().is_none() {
            anyhow::bail!(
                "Unsupported DATABASE_URL '{}': expected sqlite:, postgres:// or memory://",
                self.database_url
            );
        }
        if self.ai_timeout_secs == 0 {
            anyhow::bail!("AI_REQUEST_TIMEOUT_SECS must be greater than zero");
        }
        if tracing::Level::from_str(&self.log_level).is_err() {
            anyhow::bail!("Unsupported log level: {}", self.log_level);
        }
        // AI 凭证缺失不是致命错误，由客户端降级处理
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn storage_config(&self) -> StorageConfig {
        StorageConfig::new(self.database_url.clone())
    }

    pub fn http_client_config(&self) -> HttpClientConfig {
        HttpClientConfig {
            timeout: std::time::Duration::from_secs(self.ai_timeout_secs),
            ..Default::default()
        }
    }

    pub fn sentiment_config(&self) -> SentimentConfig {
        SentimentConfig {
            api_url: self.huggingface_url.clone(),
            api_token: self.huggingface_token.clone(),
            timeout_secs: self.ai_timeout_secs,
        }
    }

    pub fn gemini_config(&self) -> ProviderConfig {
        ProviderConfig {
            model: self.gemini_model.clone(),
            api_key: self.gemini_api_key.clone(),
            api_url: self.gemini_url.clone(),
            timeout_secs: self.ai_timeout_secs,
            temperature: self.gemini_temperature,
            max_output_tokens: self.gemini_max_output_tokens,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // 环境变量是进程级共享状态
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const VARS: [&str; 16] = [
        "HOST",
        "PORT",
        "DATABASE_URL",
        "CORS_ORIGINS",
        "HUGGINGFACE_TOKEN",
        "HUGGINGFACE_API_URL",
        "GEMINI_API_KEY",
        "GEMINI_API_URL",
        "GEMINI_MODEL",
        "GEMINI_TEMPERATURE",
        "GEMINI_MAX_OUTPUT_TOKENS",
        "AI_REQUEST_TIMEOUT_SECS",
        "ANALYSIS_CONCURRENT",
        "LOG_LEVEL",
        "LOG_FORMAT",
        "LOG_OUTPUT",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_config_defaults() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();

        let config = Config::new();
        assert_eq!(config.bind_address(), "0.0.0.0:6543");
        assert_eq!(config.database_url, "sqlite://reviews.db?mode=rwc");
        assert_eq!(config.cors_origins, "*");
        assert!(config.huggingface_token.is_none());
        assert!(config.gemini_api_key.is_none());
        assert_eq!(config.gemini_model, "gemini-2.5-flash");
        assert_eq!(config.analysis_mode, AnalysisMode::Sequential);
        assert!(config.gemini_config().temperature.is_none());
        assert!(config.gemini_config().max_output_tokens.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_env() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        env::set_var("PORT", "8080");
        env::set_var("DATABASE_URL", "postgresql://localhost/reviews");
        env::set_var("GEMINI_API_KEY", "gemini-key");
        env::set_var("HUGGINGFACE_TOKEN", "hf-token");
        env::set_var("ANALYSIS_CONCURRENT", "true");
        env::set_var("CORS_ORIGINS", "http://localhost:5173");
        env::set_var("LOG_OUTPUT", "stderr");
        env::set_var("GEMINI_MAX_OUTPUT_TOKENS", "8192");

        let config = Config::new();
        assert_eq!(config.port, 8080);
        assert_eq!(config.database_url, "postgresql://localhost/reviews");
        assert_eq!(config.gemini_config().api_key, Some("gemini-key".to_string()));
        assert_eq!(config.sentiment_config().api_token, Some("hf-token".to_string()));
        assert_eq!(config.analysis_mode, AnalysisMode::Concurrent);
        assert_eq!(config.cors_origins, "http://localhost:5173");
        assert_eq!(config.log_output, LogOutput::Stderr);
        assert_eq!(config.gemini_config().max_output_tokens, Some(8192));

        clear_env();
    }

    #[test]
    fn test_blank_credentials_are_ignored() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        env::set_var("GEMINI_API_KEY", "  ");

        let config = Config::new();
        assert!(config.gemini_api_key.is_none());

        clear_env();
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.port = 0;
        assert!(config.validate().is_err());
        config.port = 6543;

        config.database_url = "mysql://localhost/reviews".to_string();
        assert!(config.validate().is_err());
        config.database_url = "memory://".to_string();
        assert!(config.validate().is_ok());

        config.ai_timeout_secs = 0;
        assert!(config.validate().is_err());
        config.ai_timeout_secs = 30;

        config.log_level = "loud".to_string();
        assert!(config.validate().is_err());
    }
}
