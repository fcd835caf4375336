// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了系统的核心业务实体，包括：
/// - 活动（activity）：提取出的原始候选活动与规范化后的活动记录
/// - 来源（source）：被抓取的网站及其目标页面
/// - 任务（task）：针对单个来源的抓取工作单元
pub mod activity;
pub mod source;
pub mod task;
