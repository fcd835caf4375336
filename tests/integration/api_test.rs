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

/// HTTP接口测试
use super::helpers::{candidate, source, timeout, ScriptedEngine};
use activityrs::application::use_cases::batch_scrape::BatchScrapeUseCase;
use activityrs::config::settings::SnapshotSettings;
use activityrs::infrastructure::repositories::in_memory::InMemoryTaskRepository;
use activityrs::infrastructure::storage::InMemoryStorage;
use activityrs::presentation::routes;
use activityrs::presentation::state::AppState;
use activityrs::queue::task_queue::InMemoryMessageQueue;
use activityrs::registry::source_registry::SourceRegistry;
use activityrs::utils::retry_policy::RetryPolicy;
use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};
use std::sync::Arc;

const MUSEUM_URL: &str = "https://museum.example/events";
const ZOO_URL: &str = "https://zoo.example/events";

struct TestApp {
    server: TestServer,
    queue: Arc<InMemoryMessageQueue>,
    tasks: Arc<InMemoryTaskRepository>,
}

fn test_app(engine: ScriptedEngine) -> TestApp {
    let registry = Arc::new(
        SourceRegistry::new(vec![
            source("museum", &[MUSEUM_URL], true),
            source("zoo", &[ZOO_URL], true),
        ])
        .unwrap(),
    );
    let engine = Arc::new(engine);
    let queue = Arc::new(InMemoryMessageQueue::new(RetryPolicy::immediate(3)));
    let tasks = Arc::new(InMemoryTaskRepository::new());
    let batch = Arc::new(BatchScrapeUseCase::new(
        registry,
        engine.clone(),
        Arc::new(InMemoryStorage::new()),
        SnapshotSettings::default(),
    ));

    let state = AppState {
        batch,
        tasks: tasks.clone(),
        queue: queue.clone(),
        engine,
    };
    TestApp {
        server: TestServer::new(routes::app(state)).unwrap(),
        queue,
        tasks,
    }
}

fn task_body() -> Value {
    json!({
        "source_id": "zoo",
        "source_name": "zoo",
        "base_url": "https://zoo.example",
        "priority": "high",
        "target_urls": [ZOO_URL]
    })
}

#[tokio::test]
async fn test_health_and_version() {
    let app = test_app(ScriptedEngine::new());

    let health = app.server.get("/health").await;
    health.assert_status_ok();
    health.assert_text("OK");

    let version = app.server.get("/v1/version").await;
    version.assert_text(env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_trigger_batch_success() {
    let app = test_app(
        ScriptedEngine::new()
            .respond(MUSEUM_URL, Ok(vec![candidate("Dino Day", "2025-06-02", "Hall", "event")]))
            .respond(ZOO_URL, Ok(vec![candidate("Zoo Camp", "2025-07-01", "Camp", "camp")])),
    );

    let response = app.server.post("/v1/scrape/trigger").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["total_activities"], 2);
}

#[tokio::test]
async fn test_trigger_batch_partial_failure_is_207() {
    let app = test_app(
        ScriptedEngine::new()
            .respond(MUSEUM_URL, Ok(vec![candidate("Dino Day", "2025-06-02", "Hall", "event")]))
            .respond(ZOO_URL, Err(timeout(ZOO_URL))),
    );

    let response = app
        .server
        .post("/v1/scrape/trigger")
        .json(&json!({ "trigger_type": "manual" }))
        .await;

    response.assert_status(StatusCode::MULTI_STATUS);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["errors"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_trigger_single_source() {
    let app = test_app(
        ScriptedEngine::new()
            .respond(MUSEUM_URL, Ok(vec![candidate("Dino Day", "2025-06-02", "Hall", "event")])),
    );

    let response = app
        .server
        .post("/v1/scrape/trigger")
        .json(&json!({ "trigger_type": "on-demand", "source_id": "museum" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["total_sources"], 1);
    assert_eq!(body["processed_sources"], 1);
}

#[tokio::test]
async fn test_trigger_rejects_malformed_body() {
    let app = test_app(ScriptedEngine::new());

    let response = app
        .server
        .post("/v1/scrape/trigger")
        .text("{not json")
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_create_and_get_task() {
    let app = test_app(ScriptedEngine::new());

    let response = app.server.post("/v1/tasks").json(&task_body()).await;
    response.assert_status(StatusCode::CREATED);

    let created: Value = response.json();
    let task_id = created["task_id"].as_str().unwrap().to_string();
    assert!(!task_id.is_empty());
    assert_eq!(created["status"], "pending");
    assert_eq!(created["priority"], "high");
    assert_eq!(app.queue.pending_len(), 1);
    assert_eq!(app.tasks.rows().len(), 1);

    let fetched = app.server.get(&format!("/v1/tasks/{}", task_id)).await;
    fetched.assert_status_ok();
    let fetched: Value = fetched.json();
    assert_eq!(fetched["task_id"], task_id);
    assert_eq!(fetched["target_urls"][0], ZOO_URL);
}

#[tokio::test]
async fn test_create_task_with_duplicate_id_conflicts() {
    let app = test_app(ScriptedEngine::new());
    let mut body = task_body();
    body["task_id"] = json!("fixed-id");

    app.server
        .post("/v1/tasks")
        .json(&body)
        .await
        .assert_status(StatusCode::CREATED);
    app.server
        .post("/v1/tasks")
        .json(&body)
        .await
        .assert_status(StatusCode::CONFLICT);
    assert_eq!(app.queue.pending_len(), 1);
}

#[tokio::test]
async fn test_create_task_validation() {
    let app = test_app(ScriptedEngine::new());
    let mut body = task_body();
    body["base_url"] = json!("not a url");

    let response = app.server.post("/v1/tasks").json(&body).await;

    response.assert_status_bad_request();
    assert_eq!(app.queue.pending_len(), 0);
    assert!(app.tasks.rows().is_empty());
}

#[tokio::test]
async fn test_get_missing_task_is_404() {
    let app = test_app(ScriptedEngine::new());

    let response = app.server.get("/v1/tasks/unknown").await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn test_extraction_stats() {
    let app = test_app(ScriptedEngine::new());
    app.server.post("/v1/scrape/trigger").await.assert_status_ok();

    let response = app.server.get("/v1/extraction/stats").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["engine"], "scripted");
    assert_eq!(body["available"], true);
    assert_eq!(body["stats"]["total_requests"], 2);
}
