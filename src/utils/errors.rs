// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use thiserror::Error;

use crate::queue::task_queue::QueueError;

/// Worker错误类型
#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("队列错误: {0}")]
    Queue(#[from] QueueError),
}
