use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use super::cors::build_cors_layer;
use super::handlers::*;
use super::types::AppState;

/// 创建路由
pub fn create_router(state: AppState, cors_origins: &str) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/api/health", get(health))
        .route("/api/analyze-review", post(analyze_review))
        .route("/api/reviews", get(list_reviews))
        .route("/api/reviews/:id", get(get_review).delete(delete_review))
        .with_state(state)
        .layer(build_cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
}
