// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 提取引擎模块
///
/// 封装外部结构化提取服务：引擎特质、调用统计与 Firecrawl 实现
pub mod firecrawl_engine;
pub mod stats;
pub mod traits;
