// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use validator::Validate;

/// 所有属性都落在同一个分区/排序键对下，排序键固定为该标记
pub const METADATA_SORT_KEY: &str = "METADATA";

/// 显式 `null` 与缺失字段一样取默认值
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// 宽松解析年龄：接受整数、小数和数字字符串，超出范围或无法识别时为 `None`
fn lenient_age<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let age = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(age
        .filter(|a| a.is_finite() && (0.0..=f64::from(u8::MAX)).contains(a))
        .map(|a| a.round() as u8))
}

/// 原始候选活动
///
/// 由提取适配器针对单个URL返回的临时记录，在规范化之前没有身份标识。
/// 当一条已规范化的记录被重新规范化时，它会携带 `id` 和 `created_at`。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawCandidate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub category: String,
    pub subcategory: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub age_groups: Vec<AgeGroup>,
    #[serde(deserialize_with = "null_as_default")]
    pub schedule: Schedule,
    #[serde(deserialize_with = "null_as_default")]
    pub location: Location,
    #[serde(deserialize_with = "null_as_default")]
    pub pricing: Pricing,
    pub registration_url: Option<String>,
    /// 原始类型标签：event/venue/program/class/camp/attraction
    #[serde(rename = "type")]
    pub activity_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// 适龄分组
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AgeGroup {
    #[serde(deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(deserialize_with = "lenient_age")]
    pub min_age: Option<u8>,
    #[serde(deserialize_with = "lenient_age")]
    pub max_age: Option<u8>,
}

/// 活动时间安排
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Schedule {
    #[serde(deserialize_with = "null_as_default")]
    pub start_date: String,
    pub start_time: Option<String>,
    pub end_date: Option<String>,
    pub end_time: Option<String>,
}

/// 活动地点
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Location {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub address: String,
    #[serde(deserialize_with = "null_as_default")]
    pub city: String,
}

/// 价格信息
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Pricing {
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub pricing_type: String,
    pub description: Option<String>,
}

/// 实体类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    #[default]
    Event,
    Venue,
    Program,
    Attraction,
}

impl EntityType {
    /// 从原始类型标签映射实体类型，无法识别的标签（包括空值）映射为 `Event`
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag.map(|t| t.trim().to_ascii_lowercase()).as_deref() {
            Some("venue") => EntityType::Venue,
            Some("program") | Some("class") | Some("camp") => EntityType::Program,
            Some("attraction") => EntityType::Attraction,
            _ => EntityType::Event,
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EntityType::Event => write!(f, "event"),
            EntityType::Venue => write!(f, "venue"),
            EntityType::Program => write!(f, "program"),
            EntityType::Attraction => write!(f, "attraction"),
        }
    }
}

/// 来源可信度等级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReliabilityTier {
    High,
    #[default]
    Medium,
    Low,
}

/// 来源溯源信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Provenance {
    /// 来源页面URL
    #[validate(length(min = 1))]
    pub url: String,
    /// 来源域名
    #[validate(length(min = 1))]
    pub domain: String,
    /// 首次抓取时间
    pub scraped_at: DateTime<Utc>,
    /// 最近检查时间
    pub last_checked: DateTime<Utc>,
    pub reliability: ReliabilityTier,
}

/// 提供方
///
/// `display_name` 仅用于展示，不参与身份计算。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    pub id: String,
    pub display_name: String,
}

impl Provider {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            display_name: id.replace('-', " "),
        }
    }
}

/// 规范化后的活动
///
/// 持久化到存储中的规范记录。`created_at` 只写一次，`updated_at` 每次写入都会刷新。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedActivity {
    /// 由 (标题, 开始日期, 地点名称) 派生的确定性标识
    #[validate(length(min = 1))]
    pub id: String,
    pub entity_type: EntityType,
    /// 分区键：`{entity_type}#{id}`
    pub pk: String,
    /// 排序键：固定为 `METADATA`
    pub sk: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub subcategory: Option<String>,
    pub age_groups: Vec<AgeGroup>,
    pub schedule: Schedule,
    pub location: Location,
    pub pricing: Pricing,
    pub registration_url: Option<String>,
    #[validate(nested)]
    pub provenance: Provenance,
    pub provider: Provider,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NormalizedActivity {
    /// 构建存储分区键
    pub fn partition_key(entity_type: EntityType, id: &str) -> String {
        format!("{}#{}", entity_type, id)
    }

    /// 转换回候选记录，保留身份标识和创建时间，便于重新规范化
    pub fn into_candidate(self) -> RawCandidate {
        RawCandidate {
            id: Some(self.id),
            title: self.title,
            description: self.description,
            category: self.category,
            subcategory: self.subcategory,
            age_groups: self.age_groups,
            schedule: self.schedule,
            location: self.location,
            pricing: self.pricing,
            registration_url: self.registration_url,
            activity_type: Some(self.entity_type.to_string()),
            created_at: Some(self.created_at),
        }
    }
}
