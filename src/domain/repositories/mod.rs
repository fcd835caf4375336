// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库接口模块
///
/// 该模块定义了领域层的仓库接口，具体实现由基础设施层提供。
///
/// 包含的仓库接口：
/// - 活动仓库（activity_repository）：规范化活动的持久化
/// - 存储仓库（storage_repository）：快照对象的存储
/// - 任务仓库（task_repository）：抓取任务记录的查找与更新
pub mod activity_repository;
pub mod storage_repository;
pub mod task_repository;
