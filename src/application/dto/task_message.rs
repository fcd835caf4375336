// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::models::source::SourcePriority;
use crate::domain::models::task::{ScrapingTask, TaskStatus};

fn default_task_type() -> String {
    "full_scrape".to_string()
}

/// 队列任务消息
///
/// 至少投递一次，执行器必须容忍重复投递。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct TaskMessage {
    /// 任务ID，通过接口创建任务时可以留空由服务生成
    #[serde(default)]
    pub task_id: String,
    #[validate(length(min = 1))]
    pub source_id: String,
    #[validate(length(min = 1))]
    pub source_name: String,
    #[validate(url)]
    pub base_url: String,
    #[serde(default = "default_task_type")]
    pub task_type: String,
    #[serde(default)]
    pub priority: SourcePriority,
    #[serde(default = "Utc::now")]
    pub scheduled_time: DateTime<Utc>,
    #[serde(default)]
    pub target_urls: Vec<String>,
}

impl From<&ScrapingTask> for TaskMessage {
    fn from(task: &ScrapingTask) -> Self {
        Self {
            task_id: task.task_id.clone(),
            source_id: task.source_id.clone(),
            source_name: task.source_name.clone(),
            base_url: task.base_url.clone(),
            task_type: task.task_type.clone(),
            priority: task.priority,
            scheduled_time: task.scheduled_time,
            target_urls: task.target_urls.clone(),
        }
    }
}

impl TaskMessage {
    /// 构建对应的待处理任务记录
    pub fn to_pending_task(&self, now: DateTime<Utc>) -> ScrapingTask {
        ScrapingTask {
            task_id: self.task_id.clone(),
            source_id: self.source_id.clone(),
            source_name: self.source_name.clone(),
            base_url: self.base_url.clone(),
            task_type: self.task_type.clone(),
            priority: self.priority,
            scheduled_time: self.scheduled_time,
            target_urls: self.target_urls.clone(),
            status: TaskStatus::Pending,
            error_message: None,
            attempt_count: 0,
            created_at: now,
            updated_at: now,
        }
    }
}
