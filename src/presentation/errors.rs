// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;
use validator::ValidationErrors;

use crate::domain::repositories::task_repository::RepositoryError;
use crate::domain::services::task_state::TaskStateError;
use crate::queue::task_queue::QueueError;

/// 应用错误类型
///
/// 封装处理器中出现的任意错误，按错误类型映射HTTP状态码
#[derive(Debug)]
pub struct AppError(anyhow::Error);

impl AppError {
    fn status(&self) -> StatusCode {
        if self.0.downcast_ref::<ValidationErrors>().is_some() {
            return StatusCode::BAD_REQUEST;
        }
        if let Some(error) = self.0.downcast_ref::<TaskStateError>() {
            return match error {
                TaskStateError::TaskNotFound(_) => StatusCode::NOT_FOUND,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
        }
        if let Some(error) = self.0.downcast_ref::<QueueError>() {
            return match error {
                QueueError::UnknownReceipt(_) => StatusCode::NOT_FOUND,
            };
        }
        match self.0.downcast_ref::<RepositoryError>() {
            Some(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
            Some(RepositoryError::AlreadyExists(_)) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = self.0.to_string();

        if status.is_server_error() {
            error!(error = %error_message, "Request failed");
        }

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
