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

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::models::activity::RawCandidate;
use crate::engines::stats::ExtractionStatsSnapshot;

/// 提取错误类型
///
/// 每个变体都携带出错的URL。
#[derive(Error, Debug, Clone)]
pub enum ExtractionError {
    /// 传输层请求失败
    #[error("Request to extraction service failed for {url}: {message}")]
    Request { url: String, message: String },
    /// 请求超时
    #[error("Extraction timed out for {url}")]
    Timeout { url: String },
    /// 服务返回错误状态
    #[error("Extraction service returned {status} for {url}: {message}")]
    Api {
        url: String,
        status: u16,
        message: String,
    },
    /// 响应无法解析
    #[error("Malformed extraction response for {url}: {reason}")]
    Malformed { url: String, reason: String },
    /// 服务不可用（凭证缺失、鉴权失败或额度耗尽），重试无意义
    #[error("Extraction service unavailable for {url}: {reason}")]
    Unavailable { url: String, reason: String },
}

impl ExtractionError {
    /// 出错的URL
    pub fn url(&self) -> &str {
        match self {
            ExtractionError::Request { url, .. }
            | ExtractionError::Timeout { url }
            | ExtractionError::Api { url, .. }
            | ExtractionError::Malformed { url, .. }
            | ExtractionError::Unavailable { url, .. } => url,
        }
    }

    /// 是否为不可恢复错误
    ///
    /// 任务执行器遇到此类错误时将任务标记为失败。
    pub fn is_fatal(&self) -> bool {
        matches!(self, ExtractionError::Unavailable { .. })
    }

    pub(crate) fn from_reqwest(url: &str, error: reqwest::Error) -> Self {
        if error.is_timeout() {
            ExtractionError::Timeout {
                url: url.to_string(),
            }
        } else if error.is_decode() {
            ExtractionError::Malformed {
                url: url.to_string(),
                reason: error.to_string(),
            }
        } else {
            ExtractionError::Request {
                url: url.to_string(),
                message: error.to_string(),
            }
        }
    }
}

/// 提取引擎特质
///
/// 给定一个URL，返回零个或多个原始候选活动。空结果是成功而不是错误。
#[async_trait]
pub trait ExtractionEngine: Send + Sync {
    /// 从页面提取候选活动
    async fn extract(&self, url: &str) -> Result<Vec<RawCandidate>, ExtractionError>;

    /// 廉价的可用性探测
    async fn is_available(&self) -> bool;

    /// 调用统计快照
    fn stats(&self) -> ExtractionStatsSnapshot;

    /// 引擎名称
    fn name(&self) -> &'static str;
}
