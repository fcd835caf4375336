// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use activityrs::application::use_cases::batch_scrape::BatchScrapeUseCase;
use activityrs::config::settings::Settings;
use activityrs::engines::firecrawl_engine::FirecrawlEngine;
use activityrs::engines::stats::ExtractionStats;
use activityrs::engines::traits::ExtractionEngine;
use activityrs::infrastructure::database::connection;
use activityrs::infrastructure::metrics;
use activityrs::infrastructure::repositories::activity_repo_impl::ActivityRepositoryImpl;
use activityrs::infrastructure::repositories::task_repo_impl::TaskRepositoryImpl;
use activityrs::infrastructure::storage::create_storage_repository;
use activityrs::presentation::routes;
use activityrs::presentation::state::AppState;
use activityrs::queue::task_queue::InMemoryMessageQueue;
use activityrs::registry::source_registry::SourceRegistry;
use activityrs::utils::retry_policy::RetryPolicy;
use activityrs::utils::telemetry;
use activityrs::workers::batch_scheduler::BatchScheduler;
use activityrs::workers::manager::WorkerManager;
use activityrs::workers::queue_worker::QueueWorker;
use activityrs::workers::task_executor::TaskExecutor;
use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load configuration
    let settings = Settings::new().context("failed to load configuration")?;

    // 2. Initialize logging and metrics
    telemetry::init_telemetry(&settings.logging.format)?;
    info!("Starting activityrs...");

    if settings.metrics.enabled {
        let listen_addr = &settings.metrics.listen_addr;
        let addr: SocketAddr = listen_addr
            .parse()
            .with_context(|| format!("invalid metrics.listen_addr {}", listen_addr))?;
        metrics::init_metrics(addr);
    }

    // 3. Connect to database
    let db = Arc::new(connection::connect_and_migrate(&settings.database).await?);
    info!("Database connection established");

    let task_repo = Arc::new(TaskRepositoryImpl::new(db.clone()));
    let activity_repo = Arc::new(ActivityRepositoryImpl::new(db.clone()));

    // 4. Storage, registry and extraction engine
    let storage = create_storage_repository(&settings.storage).await?;
    let registry = Arc::new(SourceRegistry::from_yaml_file(&settings.sources.path)?);

    let stats = Arc::new(ExtractionStats::new());
    let engine: Arc<dyn ExtractionEngine> =
        Arc::new(FirecrawlEngine::new(&settings.extraction, stats)?);
    if settings.extraction.api_key.is_none() {
        warn!("extraction.api_key is not set, every extraction will fail");
    }

    let batch = Arc::new(BatchScrapeUseCase::new(
        registry.clone(),
        engine.clone(),
        storage,
        settings.snapshot.clone(),
    ));

    // 5. Start workers
    let queue = Arc::new(InMemoryMessageQueue::new(RetryPolicy::with_max_receive_count(
        settings.queue.max_receive_count,
    )));
    let executor = Arc::new(TaskExecutor::new(
        task_repo.clone(),
        engine.clone(),
        activity_repo.clone(),
    ));

    let mut worker_manager = WorkerManager::new();
    for i in 0..settings.queue.workers {
        let worker = QueueWorker::new(
            format!("queue-worker-{}", i),
            queue.clone(),
            executor.clone(),
            Duration::from_millis(settings.queue.poll_interval_ms),
        )
        .with_batch_size(settings.queue.batch_size);
        worker_manager.spawn(Arc::new(worker));
    }
    if let Some(secs) = settings.schedule.batch_interval_secs {
        worker_manager.spawn(Arc::new(BatchScheduler::new(
            batch.clone(),
            Duration::from_secs(secs),
        )));
    }
    info!(workers = worker_manager.len(), "Workers started");

    // 6. Start HTTP server
    let state = AppState {
        batch,
        tasks: task_repo,
        queue,
        engine,
    };
    let app = routes::app(state);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            worker_manager.wait_for_shutdown().await;
        })
        .await?;

    Ok(())
}
