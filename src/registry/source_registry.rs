// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::domain::models::source::Source;

/// 来源目录错误类型
#[derive(Error, Debug)]
pub enum RegistryError {
    /// 目录文件读取失败
    #[error("Failed to read source catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 目录文件解析失败
    #[error("Failed to parse source catalog: {0}")]
    Parse(#[from] serde_yaml::Error),
    /// 来源ID重复
    #[error("Duplicate source id: {0}")]
    DuplicateSource(String),
}

/// 来源目录
///
/// 保持文件中的顺序，运行期间不可变。
#[derive(Debug, Clone, Default)]
pub struct SourceRegistry {
    sources: Vec<Source>,
}

impl SourceRegistry {
    /// 从来源列表构建目录，ID 重复时报错
    pub fn new(sources: Vec<Source>) -> Result<Self, RegistryError> {
        let mut seen = HashSet::new();
        for source in &sources {
            if !seen.insert(source.id.as_str()) {
                return Err(RegistryError::DuplicateSource(source.id.clone()));
            }
        }
        Ok(Self { sources })
    }

    /// 从 YAML 文本加载
    pub fn from_yaml_str(content: &str) -> Result<Self, RegistryError> {
        let sources: Vec<Source> = serde_yaml::from_str(content)?;
        Self::new(sources)
    }

    /// 从 YAML 文件加载
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let registry = Self::from_yaml_str(&content)?;
        info!(
            path = %path.display(),
            total = registry.sources.len(),
            enabled = registry.enabled().count(),
            "Source catalog loaded"
        );
        Ok(registry)
    }

    /// 所有来源，按目录顺序
    pub fn all(&self) -> &[Source] {
        &self.sources
    }

    /// 按ID查找来源
    pub fn get(&self, id: &str) -> Option<&Source> {
        self.sources.iter().find(|source| source.id == id)
    }

    /// 已启用的来源，按目录顺序
    pub fn enabled(&self) -> impl Iterator<Item = &Source> {
        self.sources.iter().filter(|source| source.enabled)
    }

    /// 解析批处理的工作集
    ///
    /// 指定ID时最多返回一个来源（未知ID返回空集，不报错，且不过滤禁用状态）；
    /// 未指定时返回所有已启用来源。
    pub fn resolve(&self, source_id: Option<&str>) -> Vec<Source> {
        match source_id {
            Some(id) => self.get(id).cloned().into_iter().collect(),
            None => self.enabled().cloned().collect(),
        }
    }
}
