// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::primitives::ByteStream;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::config::settings::StorageSettings;
use crate::domain::repositories::storage_repository::{StorageError, StorageRepository};

/// 根据键的扩展名推断内容类型
fn content_type_for(key: &str) -> &'static str {
    match Path::new(key).extension().and_then(|ext| ext.to_str()) {
        Some("json") => "application/json",
        Some("txt") => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

/// S3 对象存储实现
pub struct S3Storage {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3Storage {
    /// 使用显式凭证创建
    pub fn new(
        region: String,
        bucket: String,
        access_key: String,
        secret_key: String,
        endpoint: Option<String>,
    ) -> Self {
        let credentials =
            aws_sdk_s3::config::Credentials::new(access_key, secret_key, None, None, "static");

        let mut config_builder = aws_sdk_s3::config::Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(aws_sdk_s3::config::Region::new(region))
            .credentials_provider(credentials);

        if let Some(ep) = endpoint {
            config_builder = config_builder.endpoint_url(ep).force_path_style(true);
        }

        let client = aws_sdk_s3::Client::from_conf(config_builder.build());

        Self { client, bucket }
    }

    /// 使用默认凭证链（环境变量、配置文件、实例角色）创建
    pub async fn from_env(region: String, bucket: String, endpoint: Option<String>) -> Self {
        let shared = aws_config::defaults(BehaviorVersion::latest())
            .region(aws_sdk_s3::config::Region::new(region))
            .load()
            .await;

        let mut config_builder = aws_sdk_s3::config::Builder::from(&shared);
        if let Some(ep) = endpoint {
            config_builder = config_builder.endpoint_url(ep).force_path_style(true);
        }

        Self {
            client: aws_sdk_s3::Client::from_conf(config_builder.build()),
            bucket,
        }
    }
}

#[async_trait]
impl StorageRepository for S3Storage {
    async fn save(&self, key: &str, data: &[u8]) -> Result<(), StorageError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type_for(key))
            .body(ByteStream::from(data.to_vec()))
            .send()
            .await
            .map_err(|e| StorageError::Other(e.into_service_error().to_string()))?;

        debug!(bucket = %self.bucket, key, bytes = data.len(), "Object written");
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(output) => {
                let data = output
                    .body
                    .collect()
                    .await
                    .map_err(|e| StorageError::Other(e.to_string()))?
                    .into_bytes();
                Ok(Some(data.to_vec()))
            }
            Err(e) => {
                let service_error = e.into_service_error();
                if service_error.is_no_such_key() {
                    Ok(None)
                } else {
                    Err(StorageError::Other(service_error.to_string()))
                }
            }
        }
    }

    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(e) => {
                let service_error = e.into_service_error();
                if service_error.is_not_found() {
                    Ok(false)
                } else {
                    Err(StorageError::Other(service_error.to_string()))
                }
            }
        }
    }
}

/// 本地文件系统存储实现
///
/// 键中的 `/` 映射为子目录。
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn full_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        if key.split('/').any(|segment| segment == "..") {
            return Err(StorageError::Other(format!("Invalid storage key: {}", key)));
        }
        Ok(self.base_path.join(key))
    }
}

#[async_trait]
impl StorageRepository for LocalStorage {
    async fn save(&self, key: &str, data: &[u8]) -> Result<(), StorageError> {
        let full_path = self.full_path(key)?;

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        // 临时文件写完后改名，快照整体可见
        let tmp_path = full_path.with_extension("tmp");
        let mut file = fs::File::create(&tmp_path).await?;
        file.write_all(data).await?;
        file.flush().await?;
        drop(file);
        fs::rename(&tmp_path, &full_path).await?;

        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let full_path = self.full_path(key)?;

        match fs::read(&full_path).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        let full_path = self.full_path(key)?;
        Ok(fs::try_exists(&full_path).await?)
    }
}

/// 内存存储实现，用于本地运行和测试
#[derive(Default)]
pub struct InMemoryStorage {
    objects: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// 按字典序列出所有键
    pub fn keys(&self) -> Vec<String> {
        self.objects.read().keys().cloned().collect()
    }
}

#[async_trait]
impl StorageRepository for InMemoryStorage {
    async fn save(&self, key: &str, data: &[u8]) -> Result<(), StorageError> {
        self.objects.write().insert(key.to_string(), data.to_vec());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.objects.read().get(key).cloned())
    }

    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.objects.read().contains_key(key))
    }
}

/// 存储工厂函数
///
/// 支持 `local`、`s3` 与 `memory` 三种类型。S3 未配置访问密钥时使用默认凭证链。
pub async fn create_storage_repository(
    settings: &StorageSettings,
) -> Result<Arc<dyn StorageRepository>, StorageError> {
    match settings.storage_type.as_str() {
        "local" => {
            let base_path = settings
                .local_path
                .clone()
                .unwrap_or_else(|| "./storage".to_string());
            Ok(Arc::new(LocalStorage::new(base_path)))
        }
        "s3" => {
            let bucket = settings
                .s3_bucket
                .clone()
                .ok_or_else(|| StorageError::Other("storage.s3_bucket is required".to_string()))?;
            let region = settings
                .s3_region
                .clone()
                .unwrap_or_else(|| "us-east-1".to_string());

            let storage = match (&settings.s3_access_key, &settings.s3_secret_key) {
                (Some(access_key), Some(secret_key)) => S3Storage::new(
                    region,
                    bucket,
                    access_key.clone(),
                    secret_key.clone(),
                    settings.s3_endpoint.clone(),
                ),
                _ => S3Storage::from_env(region, bucket, settings.s3_endpoint.clone()).await,
            };
            Ok(Arc::new(storage))
        }
        "memory" => Ok(Arc::new(InMemoryStorage::new())),
        other => Err(StorageError::Other(format!(
            "Unsupported storage type: {}",
            other
        ))),
    }
}
