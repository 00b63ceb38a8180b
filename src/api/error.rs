//! HTTP 错误映射

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::infrastructure::error::ReviewError;

/// 服务端错误
#[derive(Debug, Error)]
pub enum ServerError {
    /// 请求不合法（调用方的问题）
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 返回给客户端的错误文本
    pub fn message(&self) -> &str {
        match self {
            ServerError::InvalidRequest(msg) => msg,
            ServerError::NotFound(msg) => msg,
            ServerError::InternalError(msg) => msg,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({
            "error": self.message(),
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

impl From<ReviewError> for ServerError {
    fn from(err: ReviewError) -> Self {
        match err {
            ReviewError::Validation { message, .. } => ServerError::InvalidRequest(message),
            other => ServerError::InternalError(other.to_string()),
        }
    }
}

/// 处理函数用 `.context(...)` 给出操作描述，这里保留完整的错误链
impl From<anyhow::Error> for ServerError {
    fn from(err: anyhow::Error) -> Self {
        error!("{:#}", err);
        ServerError::InternalError(format!("{:#}", err))
    }
}
