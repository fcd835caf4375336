// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::activity::NormalizedActivity;
use crate::domain::repositories::task_repository::RepositoryError;
use async_trait::async_trait;

/// 活动仓库特质
///
/// 每个逻辑活动存放在一个 (pk, sk) 键对下，写入为单键覆盖（后写者胜出）。
#[async_trait]
pub trait ActivityRepository: Send + Sync {
    /// 写入活动；已存在的记录保留原有 `created_at`
    async fn put(&self, activity: &NormalizedActivity) -> Result<(), RepositoryError>;
    /// 按键读取活动
    async fn get(&self, pk: &str, sk: &str) -> Result<Option<NormalizedActivity>, RepositoryError>;
    /// 统计活动数量
    async fn count(&self) -> Result<u64, RepositoryError>;
}
