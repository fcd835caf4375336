// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 批处理触发方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TriggerType {
    /// 定时触发
    Scheduled,
    /// 手动触发
    #[default]
    Manual,
    /// 按需触发
    OnDemand,
}

impl fmt::Display for TriggerType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TriggerType::Scheduled => write!(f, "scheduled"),
            TriggerType::Manual => write!(f, "manual"),
            TriggerType::OnDemand => write!(f, "on-demand"),
        }
    }
}

/// 批处理触发请求
///
/// 指定 `source_id` 时只处理该来源，否则处理所有已启用来源。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchTrigger {
    #[serde(default)]
    pub trigger_type: TriggerType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
}

impl BatchTrigger {
    pub fn new(trigger_type: TriggerType, source_id: Option<String>) -> Self {
        Self {
            trigger_type,
            source_id,
        }
    }
}
