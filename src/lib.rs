// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 批量抓取用例与传输对象
pub mod application;

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 包含活动、来源、任务实体，规范化与任务状态服务，以及仓库接口
pub mod domain;

/// 引擎模块
///
/// 结构化活动提取适配器
pub mod engines;

/// 基础设施模块
///
/// 数据库、对象存储与指标导出
pub mod infrastructure;

/// 表示层模块
///
/// 处理HTTP请求和响应
pub mod presentation;

/// 队列模块
///
/// 至少投递一次的任务消息队列
pub mod queue;

/// 来源目录
pub mod registry;

/// 工具模块
///
/// 提供通用的工具函数和辅助功能
pub mod utils;

/// 工作器模块
///
/// 队列消费、定时批处理与工作器管理
pub mod workers;
