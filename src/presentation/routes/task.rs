// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::routing::{get, post};
use axum::Router;

use crate::presentation::handlers::task_handler;

/// 创建任务相关路由
pub fn task_routes() -> Router {
    Router::new()
        .route("/v1/tasks", post(task_handler::create_task))
        .route("/v1/tasks/{id}", get(task_handler::get_task))
}
