// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 数据库连接与实体
pub mod database;
/// Prometheus 指标导出
pub mod metrics;
/// 仓库实现
pub mod repositories;
/// 快照对象存储
pub mod storage;
