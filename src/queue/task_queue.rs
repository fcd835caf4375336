// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::application::dto::task_message::TaskMessage;
use crate::utils::retry_policy::RetryPolicy;

/// 队列错误类型
#[derive(Error, Debug)]
pub enum QueueError {
    /// 回执不存在（已确认、已释放或从未发出）
    #[error("Unknown receipt: {0}")]
    UnknownReceipt(String),
}

/// 一次投递
#[derive(Debug, Clone)]
pub struct Delivery {
    /// 本次投递的回执，用于确认或释放
    pub receipt: String,
    /// 该消息累计被接收的次数（含本次）
    pub receive_count: u32,
    pub message: TaskMessage,
}

/// 消息队列特质
///
/// 至少投递一次：确认前被释放或处理者崩溃的消息会被重新投递。
#[async_trait]
pub trait MessageQueue: Send + Sync {
    /// 发送消息，返回消息ID
    async fn send(&self, message: TaskMessage) -> Result<String, QueueError>;

    /// 接收最多 `max` 条当前可见的消息
    async fn receive(&self, max: usize) -> Result<Vec<Delivery>, QueueError>;

    /// 确认处理成功，消息被永久移除
    async fn ack(&self, receipt: &str) -> Result<(), QueueError>;

    /// 放弃处理，消息在退避后重新可见或转入死信
    async fn release(&self, receipt: &str) -> Result<(), QueueError>;
}

#[derive(Debug, Clone)]
struct QueuedMessage {
    message_id: String,
    message: TaskMessage,
    receive_count: u32,
    visible_at: Instant,
}

#[derive(Debug, Default)]
struct QueueState {
    ready: VecDeque<QueuedMessage>,
    in_flight: HashMap<String, QueuedMessage>,
    dead_letters: Vec<TaskMessage>,
}

/// 内存消息队列
///
/// 先进先出；被释放的消息按 `RetryPolicy` 退避后重新可见，
/// 接收次数达到上限后转入死信列表。
pub struct InMemoryMessageQueue {
    state: Mutex<QueueState>,
    policy: RetryPolicy,
}

impl InMemoryMessageQueue {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            state: Mutex::new(QueueState::default()),
            policy,
        }
    }

    /// 等待投递的消息数量（含尚在退避中的）
    pub fn pending_len(&self) -> usize {
        self.state.lock().ready.len()
    }

    /// 已投递未确认的消息数量
    pub fn in_flight_len(&self) -> usize {
        self.state.lock().in_flight.len()
    }

    /// 死信消息
    pub fn dead_letters(&self) -> Vec<TaskMessage> {
        self.state.lock().dead_letters.clone()
    }
}

#[async_trait]
impl MessageQueue for InMemoryMessageQueue {
    async fn send(&self, message: TaskMessage) -> Result<String, QueueError> {
        let message_id = Uuid::new_v4().to_string();
        debug!(message_id = %message_id, task_id = %message.task_id, "Message enqueued");

        self.state.lock().ready.push_back(QueuedMessage {
            message_id: message_id.clone(),
            message,
            receive_count: 0,
            visible_at: Instant::now(),
        });
        Ok(message_id)
    }

    async fn receive(&self, max: usize) -> Result<Vec<Delivery>, QueueError> {
        let now = Instant::now();
        let mut state = self.state.lock();
        let mut deliveries = Vec::new();
        let mut remaining = VecDeque::with_capacity(state.ready.len());

        while let Some(mut queued) = state.ready.pop_front() {
            if deliveries.len() >= max || queued.visible_at > now {
                remaining.push_back(queued);
                continue;
            }

            queued.receive_count += 1;
            let receipt = Uuid::new_v4().to_string();
            deliveries.push(Delivery {
                receipt: receipt.clone(),
                receive_count: queued.receive_count,
                message: queued.message.clone(),
            });
            state.in_flight.insert(receipt, queued);
        }

        state.ready = remaining;
        Ok(deliveries)
    }

    async fn ack(&self, receipt: &str) -> Result<(), QueueError> {
        self.state
            .lock()
            .in_flight
            .remove(receipt)
            .map(|_| ())
            .ok_or_else(|| QueueError::UnknownReceipt(receipt.to_string()))
    }

    async fn release(&self, receipt: &str) -> Result<(), QueueError> {
        let mut state = self.state.lock();
        let mut queued = state
            .in_flight
            .remove(receipt)
            .ok_or_else(|| QueueError::UnknownReceipt(receipt.to_string()))?;

        if self.policy.should_redeliver(queued.receive_count) {
            let backoff = self.policy.calculate_backoff(queued.receive_count);
            queued.visible_at = Instant::now() + backoff;
            state.ready.push_back(queued);
        } else {
            warn!(
                message_id = %queued.message_id,
                task_id = %queued.message.task_id,
                receive_count = queued.receive_count,
                "Message moved to dead letter list"
            );
            state.dead_letters.push(queued.message);
        }
        Ok(())
    }
}
