//! HTTP 处理函数

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use anyhow::Context;
use std::collections::BTreeMap;
use tracing::{error, info, warn};

use super::error::ServerError;
use super::extractors::JsonExtractor;
use super::types::*;
use super::validation::{parse_list_query, parse_review_id, validate_review_payload};
use crate::models::Review;

const NOT_FOUND_MESSAGE: &str = "Review not found";

/// 服务信息
pub(super) async fn root() -> Json<ServiceInfo> {
    let endpoints = BTreeMap::from([
        ("health", "GET /api/health"),
        ("analyze", "POST /api/analyze-review"),
        ("list", "GET /api/reviews"),
        ("get", "GET /api/reviews/{id}"),
        ("delete", "DELETE /api/reviews/{id}"),
    ]);

    Json(ServiceInfo {
        message: "Product Review Analyzer API",
        version: env!("CARGO_PKG_VERSION"),
        endpoints,
    })
}

/// 健康检查
pub(super) async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let database_ok = match state.store.health_check().await {
        Ok(ok) => ok,
        Err(e) => {
            error!("Database health check failed: {:#}", e);
            false
        }
    };

    Json(HealthResponse {
        status: if database_ok { "healthy" } else { "degraded" }.to_string(),
        database: if database_ok { "connected" } else { "disconnected" }.to_string(),
        ai_services: state.ai_status.label().to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// 分析并保存评论
pub(super) async fn analyze_review(
    State(state): State<AppState>,
    JsonExtractor(payload): JsonExtractor<AnalyzeReviewPayload>,
) -> Result<(StatusCode, Json<Review>), ServerError> {
    let input = validate_review_payload(payload)?;

    info!(product = %input.product_name, "Analyzing review");
    let review = state
        .orchestrator
        .create_review(&input.product_name, &input.review_text)
        .await
        .context("Failed to analyze review")?;

    Ok((StatusCode::CREATED, Json(review)))
}

/// 分页列出评论
pub(super) async fn list_reviews(
    State(state): State<AppState>,
    Query(params): Query<ListReviewsParams>,
) -> Result<Json<ReviewListResponse>, ServerError> {
    let query = parse_list_query(&params)?;

    let page = state
        .store
        .list(query)
        .await
        .context("Failed to fetch reviews")?;

    Ok(Json(ReviewListResponse {
        reviews: page.reviews,
        total: page.total,
    }))
}

pub(super) async fn get_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Review>, ServerError> {
    let id = parse_review_id(&id)?;

    let review = state
        .store
        .get(id)
        .await
        .context("Failed to fetch review")?;

    review
        .map(Json)
        .ok_or_else(|| ServerError::NotFound(NOT_FOUND_MESSAGE.to_string()))
}

pub(super) async fn delete_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ServerError> {
    let id = parse_review_id(&id)?;

    let deleted = state
        .store
        .delete(id)
        .await
        .context("Failed to delete review")?;

    if !deleted {
        warn!("Delete requested for missing review {}", id);
        return Err(ServerError::NotFound(NOT_FOUND_MESSAGE.to_string()));
    }

    info!("Deleted review {}", id);
    Ok(Json(DeleteResponse {
        success: true,
        message: format!("Review {} deleted successfully", id),
    }))
}
