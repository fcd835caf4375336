// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工作器模块
///
/// 提供队列消费、定时批处理和工作器生命周期管理
pub mod batch_scheduler;
pub mod manager;
pub mod queue_worker;
pub mod task_executor;
pub mod worker;

pub use worker::Worker;
