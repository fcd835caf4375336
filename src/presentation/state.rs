// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;

use crate::application::use_cases::batch_scrape::BatchScrapeUseCase;
use crate::domain::repositories::task_repository::TaskRepository;
use crate::engines::traits::ExtractionEngine;
use crate::queue::task_queue::MessageQueue;

/// 处理器共享状态，通过 `Extension` 注入
#[derive(Clone)]
pub struct AppState {
    pub batch: Arc<BatchScrapeUseCase>,
    pub tasks: Arc<dyn TaskRepository>,
    pub queue: Arc<dyn MessageQueue>,
    pub engine: Arc<dyn ExtractionEngine>,
}
