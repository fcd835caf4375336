// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 批量抓取端到端测试
///
/// 使用脚本化提取引擎与内存存储驱动完整批处理
use super::helpers::{candidate, source, timeout, FlakyStorage, ScriptedEngine};
use activityrs::application::dto::batch_response::BatchScrapeResponse;
use activityrs::application::dto::trigger_request::{BatchTrigger, TriggerType};
use activityrs::application::use_cases::batch_scrape::BatchScrapeUseCase;
use activityrs::config::settings::SnapshotSettings;
use activityrs::domain::models::activity::RawCandidate;
use activityrs::domain::repositories::storage_repository::StorageRepository;
use activityrs::infrastructure::storage::InMemoryStorage;
use activityrs::registry::source_registry::SourceRegistry;
use serde_json::Value;
use std::sync::Arc;

const MUSEUM_URL: &str = "https://museum.example/events";
const ZOO_URL: &str = "https://zoo.example/events";

fn two_source_registry() -> Arc<SourceRegistry> {
    Arc::new(
        SourceRegistry::new(vec![
            source("museum", &[MUSEUM_URL], true),
            source("zoo", &[ZOO_URL], true),
        ])
        .unwrap(),
    )
}

fn museum_candidates() -> Vec<RawCandidate> {
    vec![
        candidate("Toddler Art", "2025-06-01", "Studio A", "class"),
        candidate("Dino Day", "2025-06-02", "Main Hall", "event"),
        candidate("Museum", "", "Seattle Center", "venue"),
    ]
}

fn zoo_candidates() -> Vec<RawCandidate> {
    vec![
        candidate("Penguin Feeding", "2025-06-03", "Penguin Exhibit", "attraction"),
        candidate("Zoo Camp", "2025-07-01", "Education Center", "camp"),
    ]
}

#[tokio::test]
async fn test_all_sources_succeed() {
    let engine = Arc::new(
        ScriptedEngine::new()
            .respond(MUSEUM_URL, Ok(museum_candidates()))
            .respond(ZOO_URL, Ok(zoo_candidates())),
    );
    let storage = Arc::new(InMemoryStorage::new());
    let use_case = BatchScrapeUseCase::new(
        two_source_registry(),
        engine.clone(),
        storage.clone(),
        SnapshotSettings::default(),
    );

    let response = use_case.run(&BatchTrigger::default()).await;
    assert_eq!(response.status_code, BatchScrapeResponse::OK);

    let body: Value = serde_json::from_str(&response.body).unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["total_sources"], 2);
    assert_eq!(body["processed_sources"], 2);
    assert_eq!(body["total_activities"], 5);
    assert_eq!(body["errors"].as_array().unwrap().len(), 0);
    assert_eq!(body["message"], "Processed 5 activities from 2 sources");
    assert_eq!(engine.calls(), vec![MUSEUM_URL, ZOO_URL]);

    let latest = storage.get("activities/latest.json").await.unwrap().unwrap();
    let snapshot: Value = serde_json::from_slice(&latest).unwrap();
    assert_eq!(snapshot["total_activities"], 5);
    assert_eq!(snapshot["trigger_type"], "manual");
    assert_eq!(snapshot["activities"].as_array().unwrap().len(), 5);
    assert_eq!(snapshot["activities"][0]["provider"]["id"], "museum");

    let backups: Vec<String> = storage
        .keys()
        .into_iter()
        .filter(|key| key.starts_with("activities/backups/"))
        .collect();
    assert_eq!(backups.len(), 1);
    assert!(backups[0].ends_with("Z.json"));
    assert!(!backups[0].contains(':'));
}

#[tokio::test]
async fn test_failed_url_is_isolated() {
    let engine = Arc::new(
        ScriptedEngine::new()
            .respond(MUSEUM_URL, Ok(museum_candidates()))
            .respond(ZOO_URL, Err(timeout(ZOO_URL))),
    );
    let storage = Arc::new(InMemoryStorage::new());
    let use_case = BatchScrapeUseCase::new(
        two_source_registry(),
        engine,
        storage.clone(),
        SnapshotSettings::default(),
    );

    let summary = use_case.execute(&BatchTrigger::default()).await;

    assert!(!summary.success);
    assert_eq!(summary.processed_sources, 2);
    assert_eq!(summary.total_activities, 3);
    assert_eq!(summary.errors.len(), 1);
    assert!(summary.errors[0].contains(ZOO_URL));
    assert!(summary.errors[0].starts_with("Error processing"));
    assert_eq!(
        BatchScrapeResponse::from_summary(&summary).status_code,
        BatchScrapeResponse::MULTI_STATUS
    );
    assert!(storage.exists("activities/latest.json").await.unwrap());
}

#[tokio::test]
async fn test_failure_in_middle_url_keeps_the_rest() {
    let urls = [
        "https://museum.example/a",
        "https://museum.example/b",
        "https://museum.example/c",
    ];
    let engine = Arc::new(
        ScriptedEngine::new()
            .respond(urls[0], Ok(vec![candidate("A", "2025-06-01", "Hall", "event")]))
            .respond(urls[1], Err(timeout(urls[1])))
            .respond(urls[2], Ok(vec![candidate("C", "2025-06-03", "Hall", "event")])),
    );
    let registry = Arc::new(SourceRegistry::new(vec![source("museum", &urls, true)]).unwrap());
    let use_case = BatchScrapeUseCase::new(
        registry,
        engine.clone(),
        Arc::new(InMemoryStorage::new()),
        SnapshotSettings::default(),
    );

    let summary = use_case.execute(&BatchTrigger::default()).await;

    assert_eq!(engine.calls().len(), 3);
    assert_eq!(summary.total_activities, 2);
    assert_eq!(summary.errors.len(), 1);
    assert!(summary.errors[0].contains(urls[1]));
}

#[tokio::test]
async fn test_disabled_source_is_never_processed() {
    let engine = Arc::new(ScriptedEngine::new().respond(MUSEUM_URL, Ok(museum_candidates())));
    let registry = Arc::new(
        SourceRegistry::new(vec![
            source("museum", &[MUSEUM_URL], true),
            source("zoo", &[ZOO_URL], false),
        ])
        .unwrap(),
    );
    let use_case = BatchScrapeUseCase::new(
        registry,
        engine.clone(),
        Arc::new(InMemoryStorage::new()),
        SnapshotSettings::default(),
    );

    let summary = use_case.execute(&BatchTrigger::default()).await;
    assert_eq!(summary.total_sources, 1);
    assert_eq!(summary.processed_sources, 1);
    assert_eq!(summary.total_activities, 3);

    // 显式指定被禁用的来源：在工作集中但不处理
    let targeted = BatchTrigger::new(TriggerType::OnDemand, Some("zoo".to_string()));
    let summary = use_case.execute(&targeted).await;
    assert!(summary.success);
    assert_eq!(summary.total_sources, 1);
    assert_eq!(summary.processed_sources, 0);
    assert_eq!(summary.total_activities, 0);
    assert!(!engine.calls().contains(&ZOO_URL.to_string()));
}

#[tokio::test]
async fn test_unknown_source_has_nothing_to_process() {
    let engine = Arc::new(ScriptedEngine::new());
    let storage = Arc::new(InMemoryStorage::new());
    let use_case = BatchScrapeUseCase::new(
        two_source_registry(),
        engine.clone(),
        storage.clone(),
        SnapshotSettings::default(),
    );

    let trigger = BatchTrigger::new(TriggerType::OnDemand, Some("aquarium".to_string()));
    let response = use_case.run(&trigger).await;

    assert_eq!(response.status_code, BatchScrapeResponse::OK);
    let body: Value = serde_json::from_str(&response.body).unwrap();
    assert_eq!(body["message"], "No sources to process");
    assert_eq!(body["total_sources"], 0);
    assert!(engine.calls().is_empty());
    assert!(storage.keys().is_empty());
}

#[tokio::test]
async fn test_no_snapshot_without_activities() {
    let engine = Arc::new(ScriptedEngine::new());
    let storage = Arc::new(InMemoryStorage::new());
    let use_case = BatchScrapeUseCase::new(
        two_source_registry(),
        engine,
        storage.clone(),
        SnapshotSettings::default(),
    );

    let summary = use_case.execute(&BatchTrigger::default()).await;

    assert!(summary.success);
    assert_eq!(summary.total_activities, 0);
    assert!(storage.keys().is_empty());
}

#[tokio::test]
async fn test_latest_snapshot_failure_is_reported() {
    let engine = Arc::new(ScriptedEngine::new().respond(MUSEUM_URL, Ok(museum_candidates())));
    let storage = Arc::new(FlakyStorage::failing_key("activities/latest.json"));
    let use_case = BatchScrapeUseCase::new(
        two_source_registry(),
        engine,
        storage.clone(),
        SnapshotSettings::default(),
    );

    let summary = use_case.execute(&BatchTrigger::default()).await;

    assert!(!summary.success);
    assert_eq!(summary.errors.len(), 1);
    assert!(summary.errors[0].contains("activities/latest.json"));
    // 备份仍然写入
    assert_eq!(storage.keys().len(), 1);
}

#[tokio::test]
async fn test_backup_snapshot_failure_is_only_a_warning() {
    let engine = Arc::new(ScriptedEngine::new().respond(MUSEUM_URL, Ok(museum_candidates())));
    let storage = Arc::new(FlakyStorage::failing_prefix("activities/backups/"));
    let use_case = BatchScrapeUseCase::new(
        two_source_registry(),
        engine,
        storage.clone(),
        SnapshotSettings::default(),
    );

    let summary = use_case.execute(&BatchTrigger::default()).await;

    assert!(summary.success);
    assert!(summary.errors.is_empty());
    assert_eq!(storage.keys(), vec!["activities/latest.json".to_string()]);
}
