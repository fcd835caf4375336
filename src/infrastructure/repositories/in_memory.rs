// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;

use crate::domain::models::activity::NormalizedActivity;
use crate::domain::models::task::ScrapingTask;
use crate::domain::repositories::activity_repository::ActivityRepository;
use crate::domain::repositories::task_repository::{RepositoryError, TaskRepository};

/// 扫描型内存任务仓库
///
/// 模拟只支持全表扫描的后端：按ID查找是对所有行的过滤，
/// 因此可能出现零条或多条匹配。用于本地运行和测试。
#[derive(Default)]
pub struct InMemoryTaskRepository {
    rows: RwLock<Vec<ScrapingTask>>,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 直接追加一行，不做唯一性检查
    pub fn insert_raw(&self, task: ScrapingTask) {
        self.rows.write().push(task);
    }

    /// 当前所有行
    pub fn rows(&self) -> Vec<ScrapingTask> {
        self.rows.read().clone()
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn create(&self, task: &ScrapingTask) -> Result<ScrapingTask, RepositoryError> {
        let mut rows = self.rows.write();
        if rows.iter().any(|row| row.task_id == task.task_id) {
            return Err(RepositoryError::AlreadyExists(task.task_id.clone()));
        }
        rows.push(task.clone());
        Ok(task.clone())
    }

    async fn find_by_id(&self, task_id: &str) -> Result<Option<ScrapingTask>, RepositoryError> {
        let rows = self.rows.read();
        let mut matches = rows.iter().filter(|row| row.task_id == task_id);

        match (matches.next(), matches.next()) {
            (None, _) => Ok(None),
            (Some(task), None) => Ok(Some(task.clone())),
            (Some(_), Some(_)) => Err(RepositoryError::DuplicateKey {
                key: task_id.to_string(),
                count: rows.iter().filter(|row| row.task_id == task_id).count(),
            }),
        }
    }

    async fn update(&self, task: &ScrapingTask) -> Result<ScrapingTask, RepositoryError> {
        let mut rows = self.rows.write();
        let positions: Vec<usize> = rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.task_id == task.task_id)
            .map(|(i, _)| i)
            .collect();

        match positions.as_slice() {
            [] => Err(RepositoryError::NotFound),
            [index] => {
                let mut updated = task.clone();
                updated.created_at = rows[*index].created_at;
                rows[*index] = updated.clone();
                Ok(updated)
            }
            many => Err(RepositoryError::DuplicateKey {
                key: task.task_id.clone(),
                count: many.len(),
            }),
        }
    }
}

/// 内存活动仓库
///
/// 以 (pk, sk) 为键的单键覆盖存储
#[derive(Default)]
pub struct InMemoryActivityRepository {
    items: DashMap<(String, String), NormalizedActivity>,
}

impl InMemoryActivityRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前所有活动
    pub fn all(&self) -> Vec<NormalizedActivity> {
        self.items.iter().map(|entry| entry.value().clone()).collect()
    }
}

#[async_trait]
impl ActivityRepository for InMemoryActivityRepository {
    async fn put(&self, activity: &NormalizedActivity) -> Result<(), RepositoryError> {
        let key = (activity.pk.clone(), activity.sk.clone());
        let mut record = activity.clone();

        self.items
            .entry(key)
            .and_modify(|existing| {
                record.created_at = existing.created_at;
                *existing = record.clone();
            })
            .or_insert_with(|| activity.clone());
        Ok(())
    }

    async fn get(&self, pk: &str, sk: &str) -> Result<Option<NormalizedActivity>, RepositoryError> {
        Ok(self
            .items
            .get(&(pk.to_string(), sk.to_string()))
            .map(|entry| entry.value().clone()))
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        Ok(self.items.len() as u64)
    }
}
