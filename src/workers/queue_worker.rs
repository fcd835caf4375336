// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::queue::task_queue::{Delivery, MessageQueue};
use crate::utils::errors::WorkerError;
use crate::workers::task_executor::TaskExecutor;
use crate::workers::worker::Worker;

/// 队列消费工作器
///
/// 从消息队列拉取任务消息交给执行器。执行成功后确认消息，
/// 失败时释放消息，由队列按重投递策略决定重试或转入死信。
pub struct QueueWorker {
    name: String,
    queue: Arc<dyn MessageQueue>,
    executor: Arc<TaskExecutor>,
    batch_size: usize,
    poll_interval: Duration,
}

impl QueueWorker {
    pub fn new(
        name: impl Into<String>,
        queue: Arc<dyn MessageQueue>,
        executor: Arc<TaskExecutor>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            name: name.into(),
            queue,
            executor,
            batch_size: 1,
            poll_interval,
        }
    }

    /// 设置每次拉取的最大消息数
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// 拉取一批消息并逐条处理
    ///
    /// # 返回值
    ///
    /// 本次处理的消息数量
    pub async fn run_once(&self) -> Result<usize, WorkerError> {
        let deliveries = self.queue.receive(self.batch_size).await?;
        let count = deliveries.len();

        for delivery in deliveries {
            self.handle(delivery).await?;
        }
        Ok(count)
    }

    async fn handle(&self, delivery: Delivery) -> Result<(), WorkerError> {
        debug!(
            worker = %self.name,
            task_id = %delivery.message.task_id,
            receive_count = delivery.receive_count,
            "Message received"
        );

        match self.executor.execute(&delivery.message).await {
            Ok(report) => {
                self.queue.ack(&delivery.receipt).await?;
                info!(
                    worker = %self.name,
                    task_id = %report.task_id,
                    activities = report.activities_persisted,
                    "Message processed"
                );
            }
            Err(e) => {
                warn!(
                    worker = %self.name,
                    task_id = %delivery.message.task_id,
                    receive_count = delivery.receive_count,
                    error = %e,
                    "Message processing failed, releasing"
                );
                self.queue.release(&delivery.receipt).await?;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl Worker for QueueWorker {
    async fn run(&self) -> Result<(), WorkerError> {
        info!(worker = %self.name, "Queue worker started");

        loop {
            match self.run_once().await {
                Ok(0) => tokio::time::sleep(self.poll_interval).await,
                Ok(_) => {}
                Err(e) => {
                    error!(worker = %self.name, error = %e, "Queue worker iteration failed");
                    tokio::time::sleep(self.poll_interval).await;
                }
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
