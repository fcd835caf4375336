// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics::{describe_counter, describe_histogram, Unit};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use tracing::{info, warn};

/// 安装 Prometheus 导出器并注册指标描述
///
/// 地址被占用等安装失败只记录警告，服务继续运行。
pub fn init_metrics(listen_addr: SocketAddr) {
    match install(listen_addr) {
        Ok(()) => info!("Metrics exporter listening on {}", listen_addr),
        Err(e) => warn!(
            "Failed to install Prometheus recorder: {}. This might happen if the port is already in use.",
            e
        ),
    }
    describe_metrics();
}

fn install(listen_addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new()
        .with_http_listener(listen_addr)
        .install()
}

fn describe_metrics() {
    describe_counter!(
        "extraction_requests_total",
        Unit::Count,
        "Extraction requests sent, labelled by engine"
    );
    describe_counter!(
        "extraction_failures_total",
        Unit::Count,
        "Extraction requests that failed, labelled by engine"
    );
    describe_histogram!(
        "extraction_latency_ms",
        Unit::Milliseconds,
        "Extraction request latency"
    );
    describe_counter!(
        "activities_extracted_total",
        Unit::Count,
        "Raw activities returned by the extraction service"
    );
    describe_counter!(
        "batch_runs_total",
        Unit::Count,
        "Batch runs, labelled by trigger and outcome"
    );
    describe_counter!(
        "task_executions_total",
        Unit::Count,
        "Queued task executions, labelled by outcome"
    );
}
