// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 包含批处理用例以及与外部交互的数据传输对象
pub mod dto;
pub mod use_cases;
