// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod activity_repo_impl;
pub mod in_memory;
pub mod task_repo_impl;
