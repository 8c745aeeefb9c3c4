use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::services::ServeDir;

use super::handlers::{
    api_stats, api_statistics, api_trends, api_visitor_types, api_visitors, index_page, stats_page,
    AppState,
};

pub fn create_router(state: Arc<AppState>, static_dir: &str) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/stats", get(stats_page))
        .route("/api/visitors", get(api_visitors))
        .route("/api/stats", get(api_stats))
        .route("/api/statistics", get(api_statistics))
        .route("/api/visitor_types", get(api_visitor_types))
        .route("/api/trends", get(api_trends))
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
}
