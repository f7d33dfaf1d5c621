use axum::{Router, routing::get};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use super::errors::handle_panic;
use super::handlers;
use crate::application::services::StatusReporter;

/// 处理器共享状态
#[derive(Clone, Debug)]
pub struct AppState {
    pub reporter: StatusReporter,
}

impl AppState {
    pub fn new(reporter: StatusReporter) -> Self {
        Self { reporter }
    }
}

/// 构建 HTTP 路由
///
/// handler 内的 panic 由 CatchPanicLayer 转换为 500，不会影响其他请求。
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/",
            get(handlers::index).fallback(handlers::method_not_allowed),
        )
        .route(
            "/health",
            get(handlers::health).fallback(handlers::method_not_allowed),
        )
        .fallback(handlers::not_found)
        .with_state(state)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
}
