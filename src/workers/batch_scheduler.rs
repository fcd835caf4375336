// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{info, warn};

use crate::application::dto::batch_response::BatchSummary;
use crate::application::dto::trigger_request::{BatchTrigger, TriggerType};
use crate::application::use_cases::batch_scrape::BatchScrapeUseCase;
use crate::utils::errors::WorkerError;
use crate::workers::worker::Worker;

/// 定时批处理调度器
///
/// 按固定间隔以 `scheduled` 触发类型运行批量抓取。首次运行在一个完整间隔之后。
pub struct BatchScheduler {
    use_case: Arc<BatchScrapeUseCase>,
    period: Duration,
}

impl BatchScheduler {
    pub fn new(use_case: Arc<BatchScrapeUseCase>, period: Duration) -> Self {
        Self { use_case, period }
    }

    /// 运行一次定时批处理
    pub async fn tick(&self) -> BatchSummary {
        let trigger = BatchTrigger::new(TriggerType::Scheduled, None);
        let summary = self.use_case.execute(&trigger).await;

        if summary.success {
            info!(message = %summary.message, "Scheduled batch finished");
        } else {
            warn!(
                message = %summary.message,
                errors = summary.errors.len(),
                "Scheduled batch finished with errors"
            );
        }
        summary
    }
}

#[async_trait]
impl Worker for BatchScheduler {
    async fn run(&self) -> Result<(), WorkerError> {
        info!(period_secs = self.period.as_secs(), "Batch scheduler started");

        let mut ticker = interval_at(Instant::now() + self.period, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            self.tick().await;
        }
    }

    fn name(&self) -> &str {
        "batch-scheduler"
    }
}
