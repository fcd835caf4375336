// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::workers::worker::Worker;

/// 工作管理器
///
/// 派生后台工作器并在关闭信号到来时统一中止。
#[derive(Default)]
pub struct WorkerManager {
    handles: Vec<(String, JoinHandle<()>)>,
}

impl WorkerManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// 在独立任务上启动工作器
    pub fn spawn(&mut self, worker: Arc<dyn Worker>) {
        let name = worker.name().to_string();
        info!(worker = %name, "Starting worker");

        let handle = tokio::spawn(async move {
            if let Err(e) = worker.run().await {
                error!(worker = %worker.name(), error = %e, "Worker exited with error");
            }
        });
        self.handles.push((name, handle));
    }

    /// 已启动的工作器数量
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// 中止所有工作器
    pub fn shutdown(&mut self) {
        info!("Shutting down workers...");
        for (name, handle) in self.handles.drain(..) {
            handle.abort();
            info!(worker = %name, "Worker stopped");
        }
        info!("Workers shut down successfully");
    }

    /// 等待关闭信号并关闭工作进程
    pub async fn wait_for_shutdown(&mut self) {
        match signal::ctrl_c().await {
            Ok(()) => info!("Shutdown signal received"),
            Err(err) => error!("Unable to listen for shutdown signal: {}", err),
        }
        self.shutdown();
    }
}
