// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{extract::Extension, Json};
use serde::Serialize;

use crate::engines::stats::ExtractionStatsSnapshot;
use crate::presentation::state::AppState;

#[derive(Debug, Serialize)]
pub struct ExtractionStatsResponse {
    pub engine: &'static str,
    pub available: bool,
    pub stats: ExtractionStatsSnapshot,
}

/// 提取适配器统计与可用性
pub async fn extraction_stats(
    Extension(state): Extension<AppState>,
) -> Json<ExtractionStatsResponse> {
    Json(ExtractionStatsResponse {
        engine: state.engine.name(),
        available: state.engine.is_available().await,
        stats: state.engine.stats(),
    })
}
