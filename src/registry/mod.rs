// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 来源目录模块
///
/// 进程启动时从 YAML 文件加载一次的只读抓取目标目录
pub mod source_registry;
