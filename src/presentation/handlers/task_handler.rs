// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::application::dto::task_message::TaskMessage;
use crate::domain::models::task::ScrapingTask;
use crate::domain::services::task_state::TaskStateTracker;
use crate::presentation::errors::AppError;
use crate::presentation::state::AppState;

/// 创建任务记录并入队
///
/// `task_id` 为空时由服务生成。任务记录先于消息写入，执行器总能查到它。
pub async fn create_task(
    Extension(state): Extension<AppState>,
    Json(mut message): Json<TaskMessage>,
) -> Result<(StatusCode, Json<ScrapingTask>), AppError> {
    message.validate()?;
    if message.task_id.trim().is_empty() {
        message.task_id = Uuid::new_v4().to_string();
    }

    let task = state.tasks.create(&message.to_pending_task(Utc::now())).await?;
    let message_id = state.queue.send(message).await?;

    info!(task_id = %task.task_id, message_id = %message_id, "Task enqueued");
    Ok((StatusCode::CREATED, Json(task)))
}

/// 查询任务
pub async fn get_task(
    Extension(state): Extension<AppState>,
    Path(task_id): Path<String>,
) -> Result<Json<ScrapingTask>, AppError> {
    let tracker = TaskStateTracker::new(state.tasks.clone());
    let task = tracker.resolve(&task_id).await?;
    Ok(Json(task))
}
