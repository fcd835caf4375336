// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

use crate::domain::models::task::{DomainError, ScrapingTask, TaskStatus};
use crate::domain::repositories::task_repository::{RepositoryError, TaskRepository};

/// 任务状态错误
#[derive(Error, Debug)]
pub enum TaskStateError {
    /// 任务不存在，对本次执行是致命错误
    #[error("Task not found: {0}")]
    TaskNotFound(String),
    /// 非法状态转换
    #[error(transparent)]
    Domain(#[from] DomainError),
    /// 仓库错误
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// 任务状态跟踪器
///
/// 负责抓取任务记录的查找与状态转换，状态持久化由任务仓库完成。
pub struct TaskStateTracker<R>
where
    R: TaskRepository + ?Sized,
{
    repository: Arc<R>,
}

impl<R> TaskStateTracker<R>
where
    R: TaskRepository + ?Sized,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// 按ID查找任务
    ///
    /// # 返回值
    ///
    /// * `Ok(ScrapingTask)` - 唯一匹配的任务
    /// * `Err(TaskStateError::TaskNotFound)` - 没有匹配
    /// * `Err(TaskStateError::Repository)` - 存储错误，或多条匹配（数据完整性错误）
    pub async fn resolve(&self, task_id: &str) -> Result<ScrapingTask, TaskStateError> {
        match self.repository.find_by_id(task_id).await {
            Ok(Some(task)) => Ok(task),
            Ok(None) => Err(TaskStateError::TaskNotFound(task_id.to_string())),
            Err(RepositoryError::DuplicateKey { key, count }) => {
                error!(task_id = %key, count, "Multiple task records share one id");
                Err(RepositoryError::DuplicateKey { key, count }.into())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// 转换任务状态并持久化
    ///
    /// 转换不合法时任务与存储都保持不变。
    pub async fn set_status(
        &self,
        task: &mut ScrapingTask,
        new_status: TaskStatus,
        error_message: Option<String>,
    ) -> Result<(), TaskStateError> {
        let previous = task.status;
        let mut next = task.clone();
        next.set_status(new_status, error_message, Utc::now())?;

        self.repository.update(&next).await?;
        *task = next;

        info!(
            task_id = %task.task_id,
            from = %previous,
            to = %task.status,
            "Task status updated"
        );
        Ok(())
    }
}
