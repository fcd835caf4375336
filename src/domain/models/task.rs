// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::models::source::{Source, SourcePriority};

/// 抓取任务实体
///
/// 表示针对单个来源的一次抓取工作单元。任务记录由调度方在入队前创建，
/// 由任务执行器查找并修改，核心流程从不删除任务（保留用于审计）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapingTask {
    /// 任务唯一标识符
    pub task_id: String,
    /// 来源ID
    pub source_id: String,
    /// 来源名称
    pub source_name: String,
    /// 来源根地址
    pub base_url: String,
    /// 任务类型，例如 full_scrape
    pub task_type: String,
    /// 任务优先级
    pub priority: SourcePriority,
    /// 计划执行时间
    pub scheduled_time: DateTime<Utc>,
    /// 目标URL列表
    pub target_urls: Vec<String>,
    /// 任务状态
    pub status: TaskStatus,
    /// 最近一次失败的错误信息，仅在 Failed 状态下保留
    pub error_message: Option<String>,
    /// 已开始的执行次数
    pub attempt_count: i32,
    /// 创建时间，只写一次
    pub created_at: DateTime<Utc>,
    /// 更新时间，每次修改都会刷新
    pub updated_at: DateTime<Utc>,
}

/// 任务状态枚举
///
/// 单次执行内状态单调推进：
/// Pending → InProgress → Completed/Failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// 等待中，调度方创建任务时的初始状态
    #[default]
    Pending,
    /// 执行中
    InProgress,
    /// 已完成
    Completed,
    /// 已失败
    Failed,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TaskStatus::Pending => write!(f, "pending"),
            TaskStatus::InProgress => write!(f, "in_progress"),
            TaskStatus::Completed => write!(f, "completed"),
            TaskStatus::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for TaskStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TaskStatus::Pending),
            "in_progress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            "failed" => Ok(TaskStatus::Failed),
            _ => Err(()),
        }
    }
}

/// 领域错误类型
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DomainError {
    /// 无效的状态转换
    #[error("Invalid state transition from {from} to {to}")]
    InvalidStateTransition { from: TaskStatus, to: TaskStatus },
}

impl ScrapingTask {
    /// 为来源创建一个新的待处理任务
    pub fn new(source: &Source, task_type: &str, scheduled_time: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            task_id: Uuid::new_v4().to_string(),
            source_id: source.id.clone(),
            source_name: source.name.clone(),
            base_url: source.base_url.clone(),
            task_type: task_type.to_string(),
            priority: source.priority,
            scheduled_time,
            target_urls: source.target_urls.clone(),
            status: TaskStatus::Pending,
            error_message: None,
            attempt_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// 设置任务状态
    ///
    /// 总是刷新 `updated_at`；错误信息只在转入 Failed 时保存，其余情况清空。
    /// 转入 InProgress 表示开启一次新的执行（允许从任意状态开始，用于消息重投递），
    /// 同一次执行内只允许 InProgress → Completed/Failed。
    ///
    /// # 返回值
    ///
    /// * `Ok(())` - 状态已更新
    /// * `Err(DomainError)` - 状态转换不合法，任务保持不变
    pub fn set_status(
        &mut self,
        new_status: TaskStatus,
        error_message: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        match (self.status, new_status) {
            (_, TaskStatus::InProgress) => {
                self.attempt_count += 1;
            }
            (TaskStatus::InProgress, TaskStatus::Completed)
            | (TaskStatus::InProgress, TaskStatus::Failed) => {}
            (from, to) => return Err(DomainError::InvalidStateTransition { from, to }),
        }

        self.status = new_status;
        self.error_message = match new_status {
            TaskStatus::Failed => error_message,
            _ => None,
        };
        self.updated_at = now;
        Ok(())
    }
}
