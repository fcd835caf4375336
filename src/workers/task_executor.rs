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

use chrono::Utc;
use metrics::counter;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, instrument, warn};
use validator::Validate;

use crate::application::dto::task_message::TaskMessage;
use crate::domain::models::activity::RawCandidate;
use crate::domain::models::task::TaskStatus;
use crate::domain::repositories::activity_repository::ActivityRepository;
use crate::domain::repositories::task_repository::TaskRepository;
use crate::domain::services::normalizer::ActivityNormalizer;
use crate::domain::services::task_state::{TaskStateError, TaskStateTracker};
use crate::engines::traits::{ExtractionEngine, ExtractionError};

/// 任务执行错误
///
/// 返回错误意味着消息应当被重新投递。
#[derive(Error, Debug)]
pub enum TaskExecutionError {
    /// 任务记录不存在，存储未被修改
    #[error("Task not found: {0}")]
    TaskNotFound(String),
    /// 任务状态读写失败
    #[error("Task state error: {0}")]
    State(TaskStateError),
    /// 不可恢复的提取错误，任务已标记为失败
    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractionError),
}

impl From<TaskStateError> for TaskExecutionError {
    fn from(error: TaskStateError) -> Self {
        match error {
            TaskStateError::TaskNotFound(task_id) => TaskExecutionError::TaskNotFound(task_id),
            other => TaskExecutionError::State(other),
        }
    }
}

/// 单次执行报告
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExecutionReport {
    pub task_id: String,
    pub urls_attempted: usize,
    pub urls_failed: usize,
    pub activities_persisted: usize,
    pub activities_skipped: usize,
}

/// 任务执行器
///
/// 处理单条队列消息：查找任务、驱动一个来源的提取、持久化规范化后的活动并推进任务状态。
/// 活动标识可重复推导，重复投递只会覆盖同一批记录。
pub struct TaskExecutor {
    tracker: TaskStateTracker<dyn TaskRepository>,
    engine: Arc<dyn ExtractionEngine>,
    activities: Arc<dyn ActivityRepository>,
    normalizer: ActivityNormalizer,
}

impl TaskExecutor {
    pub fn new(
        tasks: Arc<dyn TaskRepository>,
        engine: Arc<dyn ExtractionEngine>,
        activities: Arc<dyn ActivityRepository>,
    ) -> Self {
        Self {
            tracker: TaskStateTracker::new(tasks),
            engine,
            activities,
            normalizer: ActivityNormalizer::new(),
        }
    }

    /// 执行一条任务消息
    ///
    /// # 返回值
    ///
    /// * `Ok(ExecutionReport)` - 任务已完成（个别URL失败不影响完成）
    /// * `Err(TaskExecutionError)` - 任务不存在、状态读写失败或提取服务不可用
    #[instrument(
        skip(self, message),
        fields(task_id = %message.task_id, source_id = %message.source_id)
    )]
    pub async fn execute(
        &self,
        message: &TaskMessage,
    ) -> Result<ExecutionReport, TaskExecutionError> {
        let mut task = match self.tracker.resolve(&message.task_id).await {
            Ok(task) => task,
            Err(e) => {
                error!(error = %e, "Unable to resolve task");
                counter!("task_executions_total", "outcome" => "unresolved").increment(1);
                return Err(e.into());
            }
        };

        self.tracker
            .set_status(&mut task, TaskStatus::InProgress, None)
            .await?;

        let urls = if message.target_urls.is_empty() {
            task.target_urls.clone()
        } else {
            message.target_urls.clone()
        };
        let source_name = if message.source_name.is_empty() {
            task.source_name.clone()
        } else {
            message.source_name.clone()
        };

        let mut report = ExecutionReport {
            task_id: task.task_id.clone(),
            ..ExecutionReport::default()
        };

        for url in &urls {
            report.urls_attempted += 1;

            match self.engine.extract(url).await {
                Ok(candidates) => {
                    self.persist(candidates, url, &source_name, &mut report).await;
                }
                Err(e) if e.is_fatal() => {
                    report.urls_failed += 1;
                    error!(url = %url, error = %e, "Extraction service unavailable");

                    if let Err(state_error) = self
                        .tracker
                        .set_status(&mut task, TaskStatus::Failed, Some(e.to_string()))
                        .await
                    {
                        error!(error = %state_error, "Failed to record task failure");
                    }
                    counter!("task_executions_total", "outcome" => "failed").increment(1);
                    return Err(e.into());
                }
                Err(e) => {
                    report.urls_failed += 1;
                    warn!(url = %url, error = %e, "Skipping URL after extraction failure");
                }
            }
        }

        self.tracker
            .set_status(&mut task, TaskStatus::Completed, None)
            .await?;
        counter!("task_executions_total", "outcome" => "completed").increment(1);

        info!(
            urls_attempted = report.urls_attempted,
            urls_failed = report.urls_failed,
            activities_persisted = report.activities_persisted,
            activities_skipped = report.activities_skipped,
            "Task completed"
        );
        Ok(report)
    }

    async fn persist(
        &self,
        candidates: Vec<RawCandidate>,
        url: &str,
        source_name: &str,
        report: &mut ExecutionReport,
    ) {
        let now = Utc::now();

        for candidate in candidates {
            let activity = self.normalizer.normalize(candidate, url, source_name, now);

            if let Err(e) = activity.validate() {
                warn!(url, title = %activity.title, error = %e, "Skipping invalid activity");
                report.activities_skipped += 1;
                continue;
            }

            match self.activities.put(&activity).await {
                Ok(()) => report.activities_persisted += 1,
                Err(e) => {
                    error!(url, pk = %activity.pk, error = %e, "Failed to persist activity");
                    report.activities_skipped += 1;
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "task_executor_test.rs"]
mod tests;
