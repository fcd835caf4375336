// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 包含的服务：
/// - 规范化服务（normalizer）：把原始候选活动转换为带身份与溯源信息的存储记录
/// - 任务状态服务（task_state）：抓取任务的查找与状态转换
pub mod normalizer;
pub mod task_state;
