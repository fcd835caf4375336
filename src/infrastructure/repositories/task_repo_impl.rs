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

use crate::domain::models::task::ScrapingTask;
use crate::domain::repositories::task_repository::{RepositoryError, TaskRepository};
use crate::infrastructure::database::entities::scraping_task as task_entity;
use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, DatabaseConnection, DbErr, EntityTrait, Set, SqlErr,
};
use serde_json::json;
use std::sync::Arc;

/// 任务仓库实现
///
/// 基于SeaORM实现，`task_id` 为主键，按ID查找是一次主键查询。
#[derive(Clone)]
pub struct TaskRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl TaskRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl TryFrom<task_entity::Model> for ScrapingTask {
    type Error = RepositoryError;

    fn try_from(model: task_entity::Model) -> Result<Self, Self::Error> {
        let corrupt = |field: &'static str, value: &str| RepositoryError::CorruptRecord {
            key: model.task_id.clone(),
            field,
            value: value.to_string(),
        };
        let priority = model
            .priority
            .parse()
            .map_err(|_| corrupt("priority", &model.priority))?;
        let status = model
            .status
            .parse()
            .map_err(|_| corrupt("status", &model.status))?;

        Ok(Self {
            target_urls: serde_json::from_value(model.target_urls)?,
            task_id: model.task_id,
            source_id: model.source_id,
            source_name: model.source_name,
            base_url: model.base_url,
            task_type: model.task_type,
            priority,
            scheduled_time: model.scheduled_time,
            status,
            error_message: model.error_message,
            attempt_count: model.attempt_count,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl From<&ScrapingTask> for task_entity::ActiveModel {
    fn from(task: &ScrapingTask) -> Self {
        Self {
            task_id: Set(task.task_id.clone()),
            source_id: Set(task.source_id.clone()),
            source_name: Set(task.source_name.clone()),
            base_url: Set(task.base_url.clone()),
            task_type: Set(task.task_type.clone()),
            priority: Set(task.priority.to_string()),
            scheduled_time: Set(task.scheduled_time),
            target_urls: Set(json!(task.target_urls)),
            status: Set(task.status.to_string()),
            error_message: Set(task.error_message.clone()),
            attempt_count: Set(task.attempt_count),
            created_at: Set(task.created_at),
            updated_at: Set(task.updated_at),
        }
    }
}

fn is_unique_violation(error: &DbErr) -> bool {
    matches!(error, DbErr::RecordNotInserted)
        || matches!(error.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

#[async_trait]
impl TaskRepository for TaskRepositoryImpl {
    async fn create(&self, task: &ScrapingTask) -> Result<ScrapingTask, RepositoryError> {
        let model: task_entity::ActiveModel = task.into();

        // 主键冲突由数据库判定，并发创建同一任务时只有一个能成功
        match model.insert(self.db.as_ref()).await {
            Ok(inserted) => inserted.try_into(),
            Err(e) if is_unique_violation(&e) => {
                Err(RepositoryError::AlreadyExists(task.task_id.clone()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_id(&self, task_id: &str) -> Result<Option<ScrapingTask>, RepositoryError> {
        let model = task_entity::Entity::find_by_id(task_id.to_string())
            .one(self.db.as_ref())
            .await?;

        model.map(TryInto::try_into).transpose()
    }

    async fn update(&self, task: &ScrapingTask) -> Result<ScrapingTask, RepositoryError> {
        let mut model: task_entity::ActiveModel = task.into();
        // created_at 只写一次
        model.created_at = NotSet;

        match model.update(self.db.as_ref()).await {
            Ok(updated) => updated.try_into(),
            Err(DbErr::RecordNotUpdated) => Err(RepositoryError::NotFound),
            Err(e) => Err(e.into()),
        }
    }
}
