use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 评论分析错误类型
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ReviewError {
    #[error("configuration error: {message}")]
    Configuration { message: String },

    #[error("AI service error: {provider} - {message}")]
    AIService {
        provider: String,
        message: String,
        status: Option<u16>,
    },

    #[error("network error: {message}")]
    Network { message: String, url: Option<String> },

    #[error("parsing error: {message}")]
    Parsing { message: String, content_type: String },

    #[error("validation error: {message}")]
    Validation { message: String, field: Option<String> },

    #[error("internal error: {message}")]
    Internal { message: String },
}

impl ReviewError {
    /// 检查错误是否可重试
    ///
    /// 只写入降级日志，调用方不会据此重试。
    pub fn is_retryable(&self) -> bool {
        match self {
            ReviewError::AIService { status, .. } => {
                matches!(status, Some(429) | Some(500..=599) | None)
            }
            ReviewError::Network { .. } => true,
            _ => false,
        }
    }

    /// 获取错误类别
    pub fn category(&self) -> ErrorCategory {
        match self {
            ReviewError::Configuration { .. } => ErrorCategory::Configuration,
            ReviewError::AIService { .. } => ErrorCategory::ExternalService,
            ReviewError::Network { .. } => ErrorCategory::Network,
            ReviewError::Parsing { .. } => ErrorCategory::Data,
            ReviewError::Validation { .. } => ErrorCategory::Validation,
            ReviewError::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// 创建配置错误
    pub fn config(message: impl Into<String>) -> Self {
        ReviewError::Configuration {
            message: message.into(),
        }
    }

    /// 创建 AI 服务错误
    pub fn ai_service(provider: impl Into<String>, message: impl Into<String>, status: Option<u16>) -> Self {
        ReviewError::AIService {
            provider: provider.into(),
            message: message.into(),
            status,
        }
    }

    /// 创建网络错误
    pub fn network(message: impl Into<String>, url: Option<String>) -> Self {
        ReviewError::Network {
            message: message.into(),
            url,
        }
    }

    /// 创建解析错误
    pub fn parsing(message: impl Into<String>, content_type: impl Into<String>) -> Self {
        ReviewError::Parsing {
            message: message.into(),
            content_type: content_type.into(),
        }
    }

    /// 创建验证错误
    pub fn validation(message: impl Into<String>, field: Option<&str>) -> Self {
        ReviewError::Validation {
            message: message.into(),
            field: field.map(str::to_string),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ReviewError::Internal {
            message: message.into(),
        }
    }
}

/// 错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCategory {
    Configuration,
    Network,
    ExternalService,
    Data,
    Validation,
    Internal,
}

impl From<reqwest::Error> for ReviewError {
    fn from(err: reqwest::Error) -> Self {
        let url = err.url().map(|u| {
            // 不把查询参数写进错误信息
            let mut u = u.clone();
            u.set_query(None);
            u.to_string()
        });

        if err.is_decode() {
            ReviewError::parsing(err.to_string(), "application/json")
        } else if err.is_timeout() {
            ReviewError::network(format!("request timed out: {}", err), url)
        } else {
            ReviewError::network(err.to_string(), url)
        }
    }
}

impl From<serde_json::Error> for ReviewError {
    fn from(err: serde_json::Error) -> Self {
        ReviewError::parsing(err.to_string(), "application/json")
    }
}

pub type ReviewResult<T> = std::result::Result<T, ReviewError>;
