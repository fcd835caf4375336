// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 任务执行端到端测试
///
/// 消息经内存队列投递给执行器，任务与活动写入 SQLite 仓库
use super::helpers::{candidate, source, sqlite_db, ScriptedEngine};
use activityrs::application::dto::task_message::TaskMessage;
use activityrs::domain::models::task::{ScrapingTask, TaskStatus};
use activityrs::domain::repositories::activity_repository::ActivityRepository;
use activityrs::domain::repositories::task_repository::TaskRepository;
use activityrs::engines::traits::ExtractionError;
use activityrs::infrastructure::repositories::activity_repo_impl::ActivityRepositoryImpl;
use activityrs::infrastructure::repositories::task_repo_impl::TaskRepositoryImpl;
use activityrs::queue::task_queue::{InMemoryMessageQueue, MessageQueue};
use activityrs::utils::retry_policy::RetryPolicy;
use activityrs::workers::queue_worker::QueueWorker;
use activityrs::workers::task_executor::{TaskExecutionError, TaskExecutor};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;

const EVENTS_URL: &str = "https://zoo.example/events";

struct Pipeline {
    tasks: Arc<TaskRepositoryImpl>,
    activities: Arc<ActivityRepositoryImpl>,
    executor: Arc<TaskExecutor>,
}

async fn pipeline(engine: ScriptedEngine) -> Pipeline {
    let db = sqlite_db().await;
    let tasks = Arc::new(TaskRepositoryImpl::new(db.clone()));
    let activities = Arc::new(ActivityRepositoryImpl::new(db));
    let executor = Arc::new(TaskExecutor::new(
        tasks.clone(),
        Arc::new(engine),
        activities.clone(),
    ));
    Pipeline {
        tasks,
        activities,
        executor,
    }
}

fn zoo_task() -> ScrapingTask {
    ScrapingTask::new(&source("zoo", &[EVENTS_URL], true), "full_scrape", Utc::now())
}

#[tokio::test]
async fn test_missing_task_is_fatal_and_store_unchanged() {
    let engine = ScriptedEngine::new().respond(
        EVENTS_URL,
        Ok(vec![candidate("Penguin Walk", "2025-06-01", "Penguin Exhibit", "event")]),
    );
    let pipeline = pipeline(engine).await;
    let stored = zoo_task();
    pipeline.tasks.create(&stored).await.unwrap();

    let mut message = TaskMessage::from(&stored);
    message.task_id = "not-a-task".to_string();
    let err = pipeline.executor.execute(&message).await.unwrap_err();

    assert!(matches!(err, TaskExecutionError::TaskNotFound(_)));
    let unchanged = pipeline.tasks.find_by_id(&stored.task_id).await.unwrap().unwrap();
    assert_eq!(unchanged.status, TaskStatus::Pending);
    assert_eq!(unchanged.attempt_count, 0);
    assert_eq!(pipeline.activities.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_duplicate_delivery_yields_one_activity() {
    let engine = ScriptedEngine::new().respond(
        EVENTS_URL,
        Ok(vec![candidate("Penguin Walk", "2025-06-01", "Penguin Exhibit", "event")]),
    );
    let pipeline = pipeline(engine).await;
    let task = zoo_task();
    pipeline.tasks.create(&task).await.unwrap();
    let message = TaskMessage::from(&task);

    let first = pipeline.executor.execute(&message).await.unwrap();
    let second = pipeline.executor.execute(&message).await.unwrap();

    assert_eq!(first.activities_persisted, 1);
    assert_eq!(second.activities_persisted, 1);
    assert_eq!(pipeline.activities.count().await.unwrap(), 1);

    let stored = pipeline.tasks.find_by_id(&task.task_id).await.unwrap().unwrap();
    assert_eq!(stored.status, TaskStatus::Completed);
    assert_eq!(stored.attempt_count, 2);
}

#[tokio::test]
async fn test_queue_worker_drives_task_to_completion() {
    let engine = ScriptedEngine::new().respond(
        EVENTS_URL,
        Ok(vec![
            candidate("Penguin Walk", "2025-06-01", "Penguin Exhibit", "event"),
            candidate("Zoo Camp", "2025-07-01", "Education Center", "camp"),
        ]),
    );
    let pipeline = pipeline(engine).await;
    let queue = Arc::new(InMemoryMessageQueue::new(RetryPolicy::immediate(3)));
    let worker = QueueWorker::new(
        "integration-worker",
        queue.clone(),
        pipeline.executor.clone(),
        Duration::from_millis(10),
    );

    let task = zoo_task();
    pipeline.tasks.create(&task).await.unwrap();
    queue.send(TaskMessage::from(&task)).await.unwrap();

    assert_eq!(worker.run_once().await.unwrap(), 1);
    assert_eq!(queue.pending_len(), 0);
    assert_eq!(queue.in_flight_len(), 0);
    assert_eq!(pipeline.activities.count().await.unwrap(), 2);
}

#[tokio::test]
async fn test_unavailable_service_fails_task_and_redelivers() {
    let engine = ScriptedEngine::new().respond(
        EVENTS_URL,
        Err(ExtractionError::Unavailable {
            url: EVENTS_URL.to_string(),
            reason: "insufficient credits".to_string(),
        }),
    );
    let pipeline = pipeline(engine).await;
    let queue = Arc::new(InMemoryMessageQueue::new(RetryPolicy::immediate(2)));
    let worker = QueueWorker::new(
        "integration-worker",
        queue.clone(),
        pipeline.executor.clone(),
        Duration::from_millis(10),
    );

    let task = zoo_task();
    pipeline.tasks.create(&task).await.unwrap();
    queue.send(TaskMessage::from(&task)).await.unwrap();

    worker.run_once().await.unwrap();
    let failed = pipeline.tasks.find_by_id(&task.task_id).await.unwrap().unwrap();
    assert_eq!(failed.status, TaskStatus::Failed);
    assert!(failed
        .error_message
        .as_deref()
        .unwrap()
        .contains("insufficient credits"));
    assert_eq!(queue.pending_len(), 1);

    worker.run_once().await.unwrap();
    let failed_again = pipeline.tasks.find_by_id(&task.task_id).await.unwrap().unwrap();
    assert_eq!(failed_again.attempt_count, 2);
    assert_eq!(queue.dead_letters().len(), 1);
}
