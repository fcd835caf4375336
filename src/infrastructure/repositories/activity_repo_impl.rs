// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::activity::NormalizedActivity;
use crate::domain::repositories::activity_repository::ActivityRepository;
use crate::domain::repositories::task_repository::RepositoryError;
use crate::infrastructure::database::entities::activity as activity_entity;
use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait, Set};
use std::sync::Arc;

/// 活动仓库实现
///
/// 以 `(pk, sk)` 复合主键做单键覆盖写入，冲突时更新除 `created_at` 外的所有列。
#[derive(Clone)]
pub struct ActivityRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl ActivityRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

fn to_active_model(
    activity: &NormalizedActivity,
) -> Result<activity_entity::ActiveModel, RepositoryError> {
    Ok(activity_entity::ActiveModel {
        pk: Set(activity.pk.clone()),
        sk: Set(activity.sk.clone()),
        entity_type: Set(activity.entity_type.to_string()),
        entity_id: Set(activity.id.clone()),
        title: Set(activity.title.clone()),
        source_url: Set(activity.provenance.url.clone()),
        domain: Set(activity.provenance.domain.clone()),
        data: Set(serde_json::to_value(activity)?),
        created_at: Set(activity.created_at),
        updated_at: Set(activity.updated_at),
    })
}

fn from_model(model: activity_entity::Model) -> Result<NormalizedActivity, RepositoryError> {
    let mut activity: NormalizedActivity = serde_json::from_value(model.data)?;
    // 列上的 created_at 才是权威值，data 中的副本可能来自后来的覆盖写入
    activity.created_at = model.created_at;
    Ok(activity)
}

#[async_trait]
impl ActivityRepository for ActivityRepositoryImpl {
    async fn put(&self, activity: &NormalizedActivity) -> Result<(), RepositoryError> {
        let model = to_active_model(activity)?;

        activity_entity::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([activity_entity::Column::Pk, activity_entity::Column::Sk])
                    .update_columns([
                        activity_entity::Column::EntityType,
                        activity_entity::Column::EntityId,
                        activity_entity::Column::Title,
                        activity_entity::Column::SourceUrl,
                        activity_entity::Column::Domain,
                        activity_entity::Column::Data,
                        activity_entity::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await?;

        Ok(())
    }

    async fn get(&self, pk: &str, sk: &str) -> Result<Option<NormalizedActivity>, RepositoryError> {
        activity_entity::Entity::find_by_id((pk.to_string(), sk.to_string()))
            .one(self.db.as_ref())
            .await?
            .map(from_model)
            .transpose()
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        Ok(activity_entity::Entity::find()
            .count(self.db.as_ref())
            .await?)
    }
}
