//! 请求与响应类型

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::models::Review;
use crate::review::ReviewOrchestrator;
use crate::storage::ReviewStore;

/// AI 客户端凭证状态，仅用于健康检查展示
#[derive(Debug, Clone, Copy, Default)]
pub struct AiServiceStatus {
    pub sentiment_configured: bool,
    pub key_points_configured: bool,
}

impl AiServiceStatus {
    pub fn label(&self) -> &'static str {
        if self.sentiment_configured && self.key_points_configured {
            "ready"
        } else {
            "degraded"
        }
    }
}

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<ReviewOrchestrator>,
    pub store: Arc<dyn ReviewStore>,
    pub ai_status: AiServiceStatus,
}

impl AppState {
    pub fn new(orchestrator: Arc<ReviewOrchestrator>, ai_status: AiServiceStatus) -> Self {
        let store = orchestrator.store().clone();
        Self {
            orchestrator,
            store,
            ai_status,
        }
    }
}

/// `POST /api/analyze-review` 请求体
///
/// 字段是否存在由处理函数检查，以便返回统一的错误信息。
#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeReviewPayload {
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub review_text: Option<String>,
}

/// `GET /api/reviews` 查询参数
#[derive(Debug, Default, Deserialize)]
pub struct ListReviewsParams {
    pub limit: Option<String>,
    pub offset: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewListResponse {
    pub reviews: Vec<Review>,
    pub total: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
    pub ai_services: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub message: &'static str,
    pub version: &'static str,
    pub endpoints: BTreeMap<&'static str, &'static str>,
}
