// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// 批处理结果汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// 当且仅当没有错误时为 true
    pub success: bool,
    pub message: String,
    /// 工作集大小
    pub total_sources: usize,
    /// 实际处理的已启用来源数量
    pub processed_sources: usize,
    pub total_activities: usize,
    pub processing_time_ms: u64,
    pub errors: Vec<String>,
}

/// 批处理响应信封
///
/// 无错误时 200，有错误时 207，响应体无法序列化时 500。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchScrapeResponse {
    pub status_code: u16,
    pub body: String,
}

impl BatchScrapeResponse {
    pub const OK: u16 = 200;
    pub const MULTI_STATUS: u16 = 207;
    pub const INTERNAL_ERROR: u16 = 500;

    pub fn from_summary(summary: &BatchSummary) -> Self {
        match serde_json::to_string(summary) {
            Ok(body) => Self {
                status_code: if summary.success {
                    Self::OK
                } else {
                    Self::MULTI_STATUS
                },
                body,
            },
            Err(e) => Self::internal_error(&e.to_string()),
        }
    }

    pub fn internal_error(reason: &str) -> Self {
        Self {
            status_code: Self::INTERNAL_ERROR,
            body: serde_json::json!({
                "success": false,
                "message": "Failed to build batch response",
                "error": reason,
            })
            .to_string(),
        }
    }
}
