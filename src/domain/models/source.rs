// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 抓取来源
///
/// 一个被抓取的网站及其目标页面列表。来源在部署/配置阶段创建，
/// 运行期间只读，流水线永远不会修改它。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// 稳定的来源标识
    pub id: String,
    /// 来源名称
    pub name: String,
    /// 站点根地址
    pub base_url: String,
    /// 需要抓取的页面，按顺序处理
    #[serde(default)]
    pub target_urls: Vec<String>,
    /// 是否启用，禁用的来源永远不会被处理
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// 优先级
    #[serde(default)]
    pub priority: SourcePriority,
    /// 分类
    #[serde(default)]
    pub category: String,
}

fn default_enabled() -> bool {
    true
}

/// 来源优先级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SourcePriority {
    High,
    #[default]
    Medium,
    Low,
}

impl fmt::Display for SourcePriority {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SourcePriority::High => write!(f, "high"),
            SourcePriority::Medium => write!(f, "medium"),
            SourcePriority::Low => write!(f, "low"),
        }
    }
}

impl FromStr for SourcePriority {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "high" => Ok(SourcePriority::High),
            "medium" => Ok(SourcePriority::Medium),
            "low" => Ok(SourcePriority::Low),
            _ => Err(()),
        }
    }
}
