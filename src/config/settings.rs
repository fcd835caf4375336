// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

/// 应用程序配置设置
///
/// 包含服务器、数据库、存储、提取服务、来源目录、队列、调度和快照等配置项。
/// 进程启动时读取一次。
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 服务器配置
    pub server: ServerSettings,
    /// 数据库配置
    pub database: DatabaseSettings,
    /// 存储配置
    pub storage: StorageSettings,
    /// 提取服务配置
    pub extraction: ExtractionSettings,
    /// 来源目录配置
    pub sources: SourcesSettings,
    /// 消息队列配置
    pub queue: QueueSettings,
    /// 定时批处理配置
    #[serde(default)]
    pub schedule: ScheduleSettings,
    /// 快照发布配置
    pub snapshot: SnapshotSettings,
    /// 指标配置
    pub metrics: MetricsSettings,
    /// 日志配置
    pub logging: LoggingSettings,
}

/// 数据库配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// 数据库连接URL
    pub url: String,
    /// 最大连接数
    pub max_connections: Option<u32>,
    /// 最小连接数
    pub min_connections: Option<u32>,
    /// 连接超时时间（秒）
    pub connect_timeout: Option<u64>,
    /// 空闲连接超时时间（秒）
    pub idle_timeout: Option<u64>,
}

/// 服务器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
}

/// 存储配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// 存储类型 (local, s3, memory)
    pub storage_type: String,
    /// 本地存储路径 (当 type=local 时使用)
    pub local_path: Option<String>,
    /// S3 区域
    pub s3_region: Option<String>,
    /// S3 存储桶名称
    pub s3_bucket: Option<String>,
    /// S3 访问密钥
    pub s3_access_key: Option<String>,
    /// S3 密钥
    pub s3_secret_key: Option<String>,
    /// S3 端点 (可选，用于 MinIO 等兼容服务)
    pub s3_endpoint: Option<String>,
}

/// 提取服务配置
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionSettings {
    /// API密钥，缺失时提取服务视为不可用
    pub api_key: Option<String>,
    /// 服务根地址
    pub base_url: String,
    /// 单次请求超时（秒）
    pub timeout_secs: u64,
}

/// 来源目录配置
#[derive(Debug, Clone, Deserialize)]
pub struct SourcesSettings {
    /// YAML 目录文件路径
    pub path: String,
}

/// 消息队列配置
#[derive(Debug, Clone, Deserialize)]
pub struct QueueSettings {
    /// 队列消费者数量
    pub workers: usize,
    /// 进入死信前允许的最大接收次数
    pub max_receive_count: u32,
    /// 空队列轮询间隔（毫秒）
    pub poll_interval_ms: u64,
    /// 每次接收的最大消息数
    pub batch_size: usize,
}

/// 定时批处理配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduleSettings {
    /// 批处理间隔（秒），未设置时不启动定时器
    pub batch_interval_secs: Option<u64>,
}

/// 快照发布配置
#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotSettings {
    /// 最新快照的键，每次运行覆盖
    pub latest_key: String,
    /// 时间戳备份的键前缀
    pub backup_prefix: String,
}

impl Default for SnapshotSettings {
    fn default() -> Self {
        Self {
            latest_key: "activities/latest.json".to_string(),
            backup_prefix: "activities/backups".to_string(),
        }
    }
}

/// 指标配置
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsSettings {
    pub enabled: bool,
    /// Prometheus 导出器监听地址
    pub listen_addr: String,
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// 输出格式：text 或 json
    pub format: String,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 加载顺序：内置默认值 → `config/default.*` → `config/{APP_ENVIRONMENT}.*`
    /// → `ACTIVITYRS__` 前缀的环境变量
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Self::with_defaults(Config::builder())?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix("ACTIVITYRS")
                    .prefix_separator("__")
                    .separator("__"),
            );

        builder.build()?.try_deserialize()
    }

    /// 只使用内置默认值，用于测试
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::with_defaults(Config::builder())?
            .build()?
            .try_deserialize()
    }

    fn with_defaults(
        builder: ConfigBuilder<DefaultState>,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        builder
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            // Default DB pool settings
            .set_default("database.url", "sqlite::memory:")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 1)?
            .set_default("database.connect_timeout", 10)?
            .set_default("database.idle_timeout", 300)?
            // Default Storage settings
            .set_default("storage.storage_type", "local")?
            .set_default("storage.local_path", "./storage")?
            // Default extraction settings
            .set_default("extraction.base_url", "https://api.firecrawl.dev")?
            .set_default("extraction.timeout_secs", 60)?
            .set_default("sources.path", "config/sources.yaml")?
            .set_default("queue.workers", 2)?
            .set_default("queue.max_receive_count", 3)?
            .set_default("queue.poll_interval_ms", 1000)?
            .set_default("queue.batch_size", 1)?
            .set_default("snapshot.latest_key", "activities/latest.json")?
            .set_default("snapshot.backup_prefix", "activities/backups")?
            .set_default("metrics.enabled", false)?
            .set_default("metrics.listen_addr", "0.0.0.0:9000")?
            .set_default("logging.format", "text")
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
