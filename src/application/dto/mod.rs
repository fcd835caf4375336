// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 数据传输对象模块
///
/// 定义批处理触发、批处理响应与队列任务消息
pub mod batch_response;
pub mod task_message;
pub mod trigger_request;
