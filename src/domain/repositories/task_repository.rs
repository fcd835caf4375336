// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::task::ScrapingTask;
use async_trait::async_trait;
use sea_orm::DbErr;
use thiserror::Error;

/// 仓库错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// 数据库错误
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    /// 记录未找到
    #[error("Record not found")]
    NotFound,
    /// 记录已存在
    #[error("Record already exists: {0}")]
    AlreadyExists(String),
    /// 同一键匹配到多条记录（仅扫描型存储可能出现）
    #[error("Data integrity error: {count} records share key {key}")]
    DuplicateKey { key: String, count: usize },
    /// 存储中的字段值无法识别
    #[error("Corrupt record {key}: unrecognized {field} '{value}'")]
    CorruptRecord {
        key: String,
        field: &'static str,
        value: String,
    },
    /// 记录序列化失败
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// 任务仓库特质
///
/// 定义抓取任务的数据访问接口。按ID查找是唯一的查找契约。
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// 创建新任务
    async fn create(&self, task: &ScrapingTask) -> Result<ScrapingTask, RepositoryError>;
    /// 根据ID查找任务
    ///
    /// 没有匹配时返回 `Ok(None)`；扫描型存储匹配到多条时返回
    /// `RepositoryError::DuplicateKey`，不做猜测。
    async fn find_by_id(&self, task_id: &str) -> Result<Option<ScrapingTask>, RepositoryError>;
    /// 更新任务（`created_at` 不会被覆盖）
    async fn update(&self, task: &ScrapingTask) -> Result<ScrapingTask, RepositoryError>;
}
