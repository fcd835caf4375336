// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use axum::{
    body::Bytes,
    extract::Extension,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{info, warn};

use crate::application::dto::trigger_request::BatchTrigger;
use crate::presentation::state::AppState;

/// 触发一次批量抓取
///
/// 请求体可以为空，此时按手动触发处理全部来源。
/// 响应状态码与响应体直接来自批处理结果信封（200/207/500）。
pub async fn trigger_batch(
    Extension(state): Extension<AppState>,
    body: Bytes,
) -> Response {
    let trigger: BatchTrigger = if body.iter().all(u8::is_ascii_whitespace) {
        BatchTrigger::default()
    } else {
        match serde_json::from_slice(&body) {
            Ok(trigger) => trigger,
            Err(e) => {
                warn!(error = %e, "Rejected batch trigger body");
                let body = Json(json!({ "error": format!("invalid trigger body: {}", e) }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
        }
    };

    info!(trigger_type = %trigger.trigger_type, source_id = ?trigger.source_id, "Batch triggered");
    let response = state.batch.run(&trigger).await;

    let status =
        StatusCode::from_u16(response.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        response.body,
    )
        .into_response()
}
