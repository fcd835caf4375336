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

use crate::{
    application::dto::{
        batch_response::{BatchScrapeResponse, BatchSummary},
        trigger_request::{BatchTrigger, TriggerType},
    },
    config::settings::SnapshotSettings,
    domain::{
        models::{activity::NormalizedActivity, source::Source},
        repositories::storage_repository::StorageRepository,
        services::normalizer::ActivityNormalizer,
    },
    engines::traits::ExtractionEngine,
    registry::source_registry::SourceRegistry,
    utils::url_utils,
};
use chrono::{DateTime, Utc};
use metrics::counter;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, instrument, warn};
use validator::Validate;

/// 发布到对象存储的活动快照
#[derive(Debug, Serialize)]
struct ActivitySnapshot<'a> {
    generated_at: DateTime<Utc>,
    trigger_type: TriggerType,
    total_activities: usize,
    activities: &'a [NormalizedActivity],
}

fn record_batch_run(trigger_type: TriggerType, outcome: &'static str) {
    counter!(
        "batch_runs_total",
        "trigger" => trigger_type.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

/// 批量抓取用例
///
/// 按目录顺序逐个处理来源与URL，单个URL失败只记录错误并继续，
/// 最后发布快照并汇总结果。来源与URL之间是顺序处理的。
pub struct BatchScrapeUseCase {
    registry: Arc<SourceRegistry>,
    engine: Arc<dyn ExtractionEngine>,
    storage: Arc<dyn StorageRepository>,
    normalizer: ActivityNormalizer,
    snapshot: SnapshotSettings,
}

impl BatchScrapeUseCase {
    pub fn new(
        registry: Arc<SourceRegistry>,
        engine: Arc<dyn ExtractionEngine>,
        storage: Arc<dyn StorageRepository>,
        snapshot: SnapshotSettings,
    ) -> Self {
        Self {
            registry,
            engine,
            storage,
            normalizer: ActivityNormalizer::new(),
            snapshot,
        }
    }

    /// 执行批处理并构建响应信封
    pub async fn run(&self, trigger: &BatchTrigger) -> BatchScrapeResponse {
        let summary = self.execute(trigger).await;
        BatchScrapeResponse::from_summary(&summary)
    }

    /// 执行批处理
    ///
    /// 该方法不会失败：所有错误都收集到汇总的 `errors` 中。
    #[instrument(
        skip(self, trigger),
        fields(trigger_type = %trigger.trigger_type, source_id = ?trigger.source_id)
    )]
    pub async fn execute(&self, trigger: &BatchTrigger) -> BatchSummary {
        let started = Instant::now();
        let working_set = self.registry.resolve(trigger.source_id.as_deref());

        if working_set.is_empty() {
            info!("No sources to process");
            record_batch_run(trigger.trigger_type, "empty");
            return BatchSummary {
                success: true,
                message: "No sources to process".to_string(),
                total_sources: 0,
                processed_sources: 0,
                total_activities: 0,
                processing_time_ms: started.elapsed().as_millis() as u64,
                errors: Vec::new(),
            };
        }

        let mut activities = Vec::new();
        let mut errors = Vec::new();
        let mut processed_sources = 0;

        for source in &working_set {
            if !source.enabled {
                info!(source = %source.id, "Skipping disabled source");
                continue;
            }
            processed_sources += 1;
            self.process_source(source, &mut activities, &mut errors).await;
        }

        if !activities.is_empty() {
            self.publish_snapshots(trigger.trigger_type, &activities, &mut errors)
                .await;
        }

        let success = errors.is_empty();
        let message = if success {
            format!(
                "Processed {} activities from {} sources",
                activities.len(),
                processed_sources
            )
        } else {
            format!(
                "Processed {} activities from {} sources with {} errors",
                activities.len(),
                processed_sources,
                errors.len()
            )
        };

        let outcome = if success { "success" } else { "partial" };
        record_batch_run(trigger.trigger_type, outcome);
        info!(
            total_sources = working_set.len(),
            processed_sources,
            total_activities = activities.len(),
            errors = errors.len(),
            "Batch run finished"
        );

        BatchSummary {
            success,
            message,
            total_sources: working_set.len(),
            processed_sources,
            total_activities: activities.len(),
            processing_time_ms: started.elapsed().as_millis() as u64,
            errors,
        }
    }

    async fn process_source(
        &self,
        source: &Source,
        activities: &mut Vec<NormalizedActivity>,
        errors: &mut Vec<String>,
    ) {
        info!(source = %source.id, urls = source.target_urls.len(), "Processing source");

        for url in &source.target_urls {
            let candidates = match self.engine.extract(url).await {
                Ok(candidates) => candidates,
                Err(e) => {
                    let message = format!("Error processing {} from {}: {}", url, source.name, e);
                    error!("{}", message);
                    errors.push(message);
                    continue;
                }
            };

            let now = Utc::now();
            for candidate in candidates {
                let activity = self.normalizer.normalize(candidate, url, &source.name, now);
                if let Err(e) = activity.validate() {
                    warn!(
                        url = %url,
                        title = %activity.title,
                        error = %e,
                        "Skipping invalid activity"
                    );
                    continue;
                }
                activities.push(activity);
            }
        }
    }

    /// 发布最新快照和带时间戳的备份
    ///
    /// 最新快照失败计入错误列表；备份失败只记录警告。
    async fn publish_snapshots(
        &self,
        trigger_type: TriggerType,
        activities: &[NormalizedActivity],
        errors: &mut Vec<String>,
    ) {
        let generated_at = Utc::now();
        let snapshot = ActivitySnapshot {
            generated_at,
            trigger_type,
            total_activities: activities.len(),
            activities,
        };

        let body = match serde_json::to_vec_pretty(&snapshot) {
            Ok(body) => body,
            Err(e) => {
                let message = format!("Error serializing activity snapshot: {}", e);
                error!("{}", message);
                errors.push(message);
                return;
            }
        };

        match self.storage.save(&self.snapshot.latest_key, &body).await {
            Ok(()) => info!(key = %self.snapshot.latest_key, "Latest snapshot published"),
            Err(e) => {
                let message = format!(
                    "Error saving snapshot to {}: {}",
                    self.snapshot.latest_key, e
                );
                error!("{}", message);
                errors.push(message);
            }
        }

        let backup_key = format!(
            "{}/{}.json",
            self.snapshot.backup_prefix.trim_end_matches('/'),
            url_utils::key_timestamp(generated_at)
        );
        match self.storage.save(&backup_key, &body).await {
            Ok(()) => info!(key = %backup_key, "Backup snapshot published"),
            Err(e) => warn!(key = %backup_key, error = %e, "Failed to publish backup snapshot"),
        }
    }
}
