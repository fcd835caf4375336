// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use activityrs::domain::models::activity::{Location, RawCandidate, Schedule};
use activityrs::domain::models::source::{Source, SourcePriority};
use activityrs::domain::repositories::storage_repository::{StorageError, StorageRepository};
use activityrs::engines::stats::ExtractionStatsSnapshot;
use activityrs::engines::traits::{ExtractionEngine, ExtractionError};
use activityrs::infrastructure::storage::InMemoryStorage;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};

/// 按URL返回预设结果的提取引擎，并记录调用过的URL
#[derive(Default)]
pub struct ScriptedEngine {
    responses: Mutex<HashMap<String, Result<Vec<RawCandidate>, ExtractionError>>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, url: &str, result: Result<Vec<RawCandidate>, ExtractionError>) -> Self {
        self.responses.lock().insert(url.to_string(), result);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl ExtractionEngine for ScriptedEngine {
    async fn extract(&self, url: &str) -> Result<Vec<RawCandidate>, ExtractionError> {
        self.calls.lock().push(url.to_string());
        self.responses
            .lock()
            .get(url)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn is_available(&self) -> bool {
        true
    }

    fn stats(&self) -> ExtractionStatsSnapshot {
        ExtractionStatsSnapshot {
            total_requests: self.calls.lock().len() as u64,
            ..ExtractionStatsSnapshot::default()
        }
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

/// 指定键写入失败的内存存储
pub struct FlakyStorage {
    inner: InMemoryStorage,
    failing_keys: HashSet<String>,
    fail_prefix: Option<String>,
}

impl FlakyStorage {
    pub fn failing_key(key: &str) -> Self {
        Self {
            inner: InMemoryStorage::new(),
            failing_keys: HashSet::from([key.to_string()]),
            fail_prefix: None,
        }
    }

    pub fn failing_prefix(prefix: &str) -> Self {
        Self {
            inner: InMemoryStorage::new(),
            failing_keys: HashSet::new(),
            fail_prefix: Some(prefix.to_string()),
        }
    }

    pub fn keys(&self) -> Vec<String> {
        self.inner.keys()
    }
}

#[async_trait]
impl StorageRepository for FlakyStorage {
    async fn save(&self, key: &str, data: &[u8]) -> Result<(), StorageError> {
        let by_prefix = self
            .fail_prefix
            .as_deref()
            .is_some_and(|prefix| key.starts_with(prefix));
        if by_prefix || self.failing_keys.contains(key) {
            return Err(StorageError::Other(format!("write to {} rejected", key)));
        }
        self.inner.save(key, data).await
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        self.inner.get(key).await
    }

    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        self.inner.exists(key).await
    }
}

pub fn candidate(title: &str, start_date: &str, location: &str, tag: &str) -> RawCandidate {
    RawCandidate {
        title: title.to_string(),
        description: format!("{} for families", title),
        category: "family".to_string(),
        schedule: Schedule {
            start_date: start_date.to_string(),
            ..Schedule::default()
        },
        location: Location {
            name: location.to_string(),
            city: "Seattle".to_string(),
            ..Location::default()
        },
        activity_type: Some(tag.to_string()),
        ..RawCandidate::default()
    }
}

pub fn source(id: &str, urls: &[&str], enabled: bool) -> Source {
    Source {
        id: id.to_string(),
        name: id.to_string(),
        base_url: format!("https://{}.example", id),
        target_urls: urls.iter().map(|url| url.to_string()).collect(),
        enabled,
        priority: SourcePriority::Medium,
        category: "museum".to_string(),
    }
}

pub fn timeout(url: &str) -> ExtractionError {
    ExtractionError::Timeout {
        url: url.to_string(),
    }
}

/// 迁移后的 SQLite 内存数据库
///
/// 内存库每个连接各自独立，连接池固定为一个连接。
pub async fn sqlite_db() -> std::sync::Arc<sea_orm::DatabaseConnection> {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database};

    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    std::sync::Arc::new(db)
}
