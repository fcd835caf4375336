// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics::{counter, histogram};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// 提取调用统计
///
/// 由调用方显式持有并注入引擎（通常包在 `Arc` 中），计数器均为原子操作，
/// 同时镜像到 `metrics` 门面。
#[derive(Debug, Default)]
pub struct ExtractionStats {
    requests: AtomicU64,
    successes: AtomicU64,
    failures: AtomicU64,
    total_latency_ms: AtomicU64,
    credits_used: AtomicU64,
    activities_extracted: AtomicU64,
}

/// 统计快照
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ExtractionStatsSnapshot {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub total_latency_ms: u64,
    pub total_credits_used: u64,
    pub total_activities_extracted: u64,
    pub average_latency_ms: f64,
    /// 成功率（0.0 - 1.0），无请求时为 0
    pub success_rate: f64,
}

impl ExtractionStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一次成功调用
    pub fn record_success(
        &self,
        engine: &'static str,
        latency: Duration,
        credits: u64,
        activities: u64,
    ) {
        let latency_ms = latency.as_millis() as u64;
        self.requests.fetch_add(1, Ordering::Relaxed);
        self.successes.fetch_add(1, Ordering::Relaxed);
        self.total_latency_ms.fetch_add(latency_ms, Ordering::Relaxed);
        self.credits_used.fetch_add(credits, Ordering::Relaxed);
        self.activities_extracted.fetch_add(activities, Ordering::Relaxed);

        counter!("extraction_requests_total", "engine" => engine).increment(1);
        counter!("activities_extracted_total", "engine" => engine).increment(activities);
        histogram!("extraction_latency_ms", "engine" => engine).record(latency_ms as f64);
    }

    /// 记录一次失败调用
    pub fn record_failure(&self, engine: &'static str, latency: Duration) {
        let latency_ms = latency.as_millis() as u64;
        self.requests.fetch_add(1, Ordering::Relaxed);
        self.failures.fetch_add(1, Ordering::Relaxed);
        self.total_latency_ms.fetch_add(latency_ms, Ordering::Relaxed);

        counter!("extraction_requests_total", "engine" => engine).increment(1);
        counter!("extraction_failures_total", "engine" => engine).increment(1);
        histogram!("extraction_latency_ms", "engine" => engine).record(latency_ms as f64);
    }

    pub fn snapshot(&self) -> ExtractionStatsSnapshot {
        let total_requests = self.requests.load(Ordering::Relaxed);
        let successful_requests = self.successes.load(Ordering::Relaxed);
        let total_latency_ms = self.total_latency_ms.load(Ordering::Relaxed);

        let (average_latency_ms, success_rate) = if total_requests == 0 {
            (0.0, 0.0)
        } else {
            (
                total_latency_ms as f64 / total_requests as f64,
                successful_requests as f64 / total_requests as f64,
            )
        };

        ExtractionStatsSnapshot {
            total_requests,
            successful_requests,
            failed_requests: self.failures.load(Ordering::Relaxed),
            total_latency_ms,
            total_credits_used: self.credits_used.load(Ordering::Relaxed),
            total_activities_extracted: self.activities_extracted.load(Ordering::Relaxed),
            average_latency_ms,
            success_rate,
        }
    }
}
