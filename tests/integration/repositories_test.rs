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

/// 数据库仓库测试
///
/// 在迁移后的 SQLite 内存库上验证任务与活动仓库
use super::helpers::{candidate, source, sqlite_db};
use activityrs::domain::models::activity::{EntityType, METADATA_SORT_KEY};
use activityrs::domain::models::source::SourcePriority;
use activityrs::domain::models::task::{ScrapingTask, TaskStatus};
use activityrs::domain::repositories::activity_repository::ActivityRepository;
use activityrs::domain::repositories::task_repository::{RepositoryError, TaskRepository};
use activityrs::domain::services::normalizer::ActivityNormalizer;
use activityrs::infrastructure::repositories::activity_repo_impl::ActivityRepositoryImpl;
use activityrs::infrastructure::repositories::task_repo_impl::TaskRepositoryImpl;
use chrono::{Duration, Utc};
use sea_orm::ConnectionTrait;

fn task() -> ScrapingTask {
    let mut source = source(
        "library",
        &["https://library.example/kids", "https://library.example/teens"],
        true,
    );
    source.priority = SourcePriority::High;
    ScrapingTask::new(&source, "full_scrape", Utc::now())
}

#[tokio::test]
async fn test_task_round_trip() {
    let repo = TaskRepositoryImpl::new(sqlite_db().await);
    let task = task();

    repo.create(&task).await.unwrap();
    let found = repo.find_by_id(&task.task_id).await.unwrap().unwrap();

    assert_eq!(found.task_id, task.task_id);
    assert_eq!(found.target_urls, task.target_urls);
    assert_eq!(found.priority, SourcePriority::High);
    assert_eq!(found.status, TaskStatus::Pending);
    assert_eq!(found.attempt_count, 0);
    assert!(repo.find_by_id("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn test_task_create_twice_is_rejected() {
    let repo = TaskRepositoryImpl::new(sqlite_db().await);
    let task = task();

    repo.create(&task).await.unwrap();
    let err = repo.create(&task).await.unwrap_err();

    assert!(matches!(err, RepositoryError::AlreadyExists(_)));
}

#[tokio::test]
async fn test_concurrent_creates_yield_one_conflict() {
    let repo = TaskRepositoryImpl::new(sqlite_db().await);
    let task = task();

    let (first, second) = tokio::join!(repo.create(&task), repo.create(&task));

    let results = [first, second];
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results
        .iter()
        .any(|r| matches!(r, Err(RepositoryError::AlreadyExists(id)) if *id == task.task_id)));
}

#[tokio::test]
async fn test_unrecognized_status_is_reported() {
    let db = sqlite_db().await;
    let repo = TaskRepositoryImpl::new(db.clone());
    let task = task();
    repo.create(&task).await.unwrap();

    db.execute_unprepared(&format!(
        "UPDATE scraping_tasks SET status = 'exploded' WHERE task_id = '{}'",
        task.task_id
    ))
    .await
    .unwrap();

    let err = repo.find_by_id(&task.task_id).await.unwrap_err();
    assert!(matches!(
        err,
        RepositoryError::CorruptRecord { field: "status", ref value, .. } if value == "exploded"
    ));
}

#[tokio::test]
async fn test_task_update_keeps_created_at() {
    let repo = TaskRepositoryImpl::new(sqlite_db().await);
    let task = task();
    repo.create(&task).await.unwrap();

    let mut changed = task.clone();
    changed.created_at = task.created_at + Duration::days(3);
    changed
        .set_status(TaskStatus::InProgress, None, Utc::now())
        .unwrap();
    changed
        .set_status(TaskStatus::Failed, Some("quota".to_string()), Utc::now())
        .unwrap();
    repo.update(&changed).await.unwrap();

    let stored = repo.find_by_id(&task.task_id).await.unwrap().unwrap();
    assert_eq!(stored.status, TaskStatus::Failed);
    assert_eq!(stored.error_message.as_deref(), Some("quota"));
    assert_eq!(stored.attempt_count, 1);
    assert_eq!(
        stored.created_at.timestamp_millis(),
        task.created_at.timestamp_millis()
    );
}

#[tokio::test]
async fn test_task_update_missing_is_not_found() {
    let repo = TaskRepositoryImpl::new(sqlite_db().await);

    let err = repo.update(&task()).await.unwrap_err();

    assert!(matches!(err, RepositoryError::NotFound));
}

#[tokio::test]
async fn test_activity_upsert_is_single_key_overwrite() {
    let repo = ActivityRepositoryImpl::new(sqlite_db().await);
    let normalizer = ActivityNormalizer::new();
    let first_seen = Utc::now() - Duration::hours(2);

    let first = normalizer.normalize(
        candidate("Story Time", "2025-06-01", "Central Library", "class"),
        "https://library.example/kids",
        "library",
        first_seen,
    );
    repo.put(&first).await.unwrap();

    let mut changed = candidate("Story Time", "2025-06-01", "Central Library", "class");
    changed.description = "Now with puppets".to_string();
    let second = normalizer.normalize(changed, "https://library.example/kids", "library", Utc::now());
    assert_eq!(second.pk, first.pk);
    repo.put(&second).await.unwrap();

    assert_eq!(repo.count().await.unwrap(), 1);
    let stored = repo.get(&first.pk, METADATA_SORT_KEY).await.unwrap().unwrap();
    assert_eq!(stored.entity_type, EntityType::Program);
    assert_eq!(stored.description, "Now with puppets");
    assert_eq!(
        stored.created_at.timestamp_millis(),
        first_seen.timestamp_millis()
    );
    assert!(stored.updated_at > stored.created_at);
    assert!(repo.get("event#missing", METADATA_SORT_KEY).await.unwrap().is_none());
}
