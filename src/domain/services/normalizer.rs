// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use crate::domain::models::activity::{
    EntityType, NormalizedActivity, Provenance, Provider, RawCandidate, ReliabilityTier,
    METADATA_SORT_KEY,
};
use crate::utils::url_utils;

/// 身份字段之间的分隔符（ASCII 单元分隔符），避免字段拼接产生歧义
const IDENTITY_SEPARATOR: &[u8] = &[0x1f];

/// 计算活动的确定性标识
///
/// 纯函数：相同的 (标题, 开始日期, 地点名称) 总是得到相同的标识。
pub fn activity_identity(title: &str, start_date: &str, location_name: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(title.as_bytes());
    hasher.update(IDENTITY_SEPARATOR);
    hasher.update(start_date.as_bytes());
    hasher.update(IDENTITY_SEPARATOR);
    hasher.update(location_name.as_bytes());
    let digest = hasher.finalize();
    hex::encode(&digest[..16])
}

/// 活动规范化器
///
/// 无副作用：不写存储，给定相同输入总是得到相同输出。
#[derive(Debug, Default, Clone, Copy)]
pub struct ActivityNormalizer;

impl ActivityNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// 将原始候选活动规范化为存储记录
    ///
    /// # 参数
    ///
    /// * `candidate` - 提取得到的候选活动
    /// * `source_url` - 候选活动所在页面
    /// * `source_name` - 来源名称，同时作为提供方标识
    /// * `now` - 本次规范化的时间
    pub fn normalize(
        &self,
        candidate: RawCandidate,
        source_url: &str,
        source_name: &str,
        now: DateTime<Utc>,
    ) -> NormalizedActivity {
        let domain = url_utils::domain_of(source_url);

        let id = candidate.id.clone().unwrap_or_else(|| {
            activity_identity(
                &candidate.title,
                &candidate.schedule.start_date,
                &candidate.location.name,
            )
        });
        let entity_type = EntityType::from_tag(candidate.activity_type.as_deref());

        NormalizedActivity {
            pk: NormalizedActivity::partition_key(entity_type, &id),
            sk: METADATA_SORT_KEY.to_string(),
            id,
            entity_type,
            title: candidate.title,
            description: candidate.description,
            category: candidate.category,
            subcategory: candidate.subcategory,
            age_groups: candidate.age_groups,
            schedule: candidate.schedule,
            location: candidate.location,
            pricing: candidate.pricing,
            registration_url: candidate.registration_url,
            provenance: Provenance {
                url: source_url.to_string(),
                domain,
                scraped_at: now,
                last_checked: now,
                reliability: ReliabilityTier::Medium,
            },
            provider: Provider::new(source_name),
            created_at: candidate.created_at.unwrap_or(now),
            updated_at: now,
        }
    }
}
