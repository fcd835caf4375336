// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// HTTP请求处理器模块
///
/// 批处理触发、任务入队与查询、提取统计
pub mod batch_handler;
pub mod stats_handler;
pub mod task_handler;
