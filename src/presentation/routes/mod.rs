// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod task;

use crate::presentation::handlers::{batch_handler, stats_handler};
use crate::presentation::state::AppState;
use axum::{
    extract::Extension,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// 创建应用路由
///
/// 处理器通过 `Extension<AppState>` 取得依赖，见 [`app`]。
pub fn routes() -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/v1/version", get(version))
        .route("/v1/scrape/trigger", post(batch_handler::trigger_batch))
        .route("/v1/extraction/stats", get(stats_handler::extraction_stats))
        .merge(task::task_routes())
}

/// 注入共享状态和请求追踪后的完整应用
pub fn app(state: AppState) -> Router {
    routes()
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
}

/// 健康检查端点
pub async fn health_check() -> &'static str {
    "OK"
}

/// 版本信息端点
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
