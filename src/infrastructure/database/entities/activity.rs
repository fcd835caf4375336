// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm::entity::prelude::*;

/// 活动记录，`(pk, sk)` 为复合主键，完整记录保存在 `data` 中
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "activities")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub pk: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub sk: String,
    pub entity_type: String,
    pub entity_id: String,
    pub title: String,
    pub source_url: String,
    pub domain: String,
    pub data: Json,
    pub created_at: ChronoDateTimeUtc,
    pub updated_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
