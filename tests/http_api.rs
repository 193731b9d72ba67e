use axum::{routing::post, Json, Router};
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::sync::Arc;

use taskflow_server::{
    app_state::AppState, data_access::data_context::DataContext, description::DescriptionClient, fixtures,
    map_routes, world::World,
};

async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

async fn start(seed: bool, describer: DescriptionClient) -> String {
    let mut world = World::new();
    if seed {
        fixtures::seed(&mut world);
    }
    let state = Arc::new(AppState::new(DataContext::in_memory(world), describer));
    let base = spawn(map_routes(state)).await;
    format!("{base}/api")
}

/// Stands in for the AI function: echoes the title, rejects blank ones.
async fn fake_describer() -> DescriptionClient {
    let router = Router::new().route(
        "/generate",
        post(|Json(body): Json<Value>| async move {
            let title = body["title"].as_str().unwrap_or_default().trim().to_string();
            if title.is_empty() {
                return (
                    axum::http::StatusCode::BAD_REQUEST,
                    Json(json!({ "success": false, "error": "Title is required and must be a non-empty string" })),
                );
            }
            (
                axum::http::StatusCode::OK,
                Json(json!({ "success": true, "description": format!("Complete the work for {title}.") })),
            )
        }),
    );
    DescriptionClient::new(Some(format!("{}/generate", spawn(router).await)))
}

#[tokio::test]
async fn health_reports_revision() {
    let api = start(true, DescriptionClient::disabled()).await;
    let body: Value = reqwest::get(format!("{api}/health/check_status")).await.unwrap().json().await.unwrap();

    assert_eq!(body["status"], "ok");
    // Categories and tasks were seeded in two batches.
    assert_eq!(body["revision"], 2);
}

#[tokio::test]
async fn task_lifecycle() {
    let api = start(false, DescriptionClient::disabled()).await;
    let client = reqwest::Client::new();

    let category: Value = client
        .post(format!("{api}/category/add"))
        .json(&json!({ "name": "Work", "color": "#5B4FE8", "icon": "Briefcase" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(category["Id"], 1);
    assert_eq!(category["taskCount"], 0);

    let created: Value = client
        .post(format!("{api}/task/add"))
        .json(&json!({ "title": "Write report", "priority": "high", "categoryId": 1, "assignedTo": 2 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(created["Id"], 1);
    assert_eq!(created["completed"], false);
    assert_eq!(created["completedAt"], Value::Null);
    assert_eq!(created["categoryId"], 1);

    let category: Value = client.get(format!("{api}/category/get?id=1")).send().await.unwrap().json().await.unwrap();
    assert_eq!(category["taskCount"], 1);

    let done: Value = client
        .put(format!("{api}/task/edit?id=1"))
        .json(&json!({ "completed": true }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(done["completed"], true);
    assert!(done["completedAt"].is_string());

    let category: Value = client.get(format!("{api}/category/get?id=1")).send().await.unwrap().json().await.unwrap();
    assert_eq!(category["taskCount"], 0);

    let response = client.delete(format!("{api}/task/delete?id=1")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let response = client.get(format!("{api}/task/get?id=1")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = client.delete(format!("{api}/task/delete?id=1")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn editing_a_missing_task_is_unprocessable() {
    let api = start(false, DescriptionClient::disabled()).await;
    let response = reqwest::Client::new()
        .put(format!("{api}/task/edit?id=42"))
        .json(&json!({ "title": "Nope" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.text().await.unwrap(), "Record with Id 42 not found");
}

#[tokio::test]
async fn view_filters_and_orders_seeded_tasks() {
    let api = start(true, DescriptionClient::disabled()).await;

    let active: Vec<Value> = reqwest::get(format!("{api}/task/view?status=active&categoryId=1"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let titles: Vec<_> = active.iter().map(|t| t["title"].as_str().unwrap()).collect();
    assert_eq!(titles, vec!["Prepare quarterly report", "Review pull requests"]);

    let found: Vec<Value> = reqwest::get(format!("{api}/task/view?search=GROCER"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["title"], "Buy groceries");
}

#[tokio::test]
async fn filtered_reads_and_summary() {
    let api = start(true, DescriptionClient::disabled()).await;

    let completed: Vec<Value> =
        reqwest::get(format!("{api}/task/by_status?completed=true")).await.unwrap().json().await.unwrap();
    assert_eq!(completed.len(), 2);

    let high: Vec<Value> =
        reqwest::get(format!("{api}/task/by_priority?priority=high")).await.unwrap().json().await.unwrap();
    assert_eq!(high.len(), 2);

    let health: Vec<Value> =
        reqwest::get(format!("{api}/task/by_category?categoryId=4")).await.unwrap().json().await.unwrap();
    assert_eq!(health.len(), 2);

    let summary: Value = reqwest::get(format!("{api}/task/summary")).await.unwrap().json().await.unwrap();
    assert_eq!(summary["total"], 8);
    assert_eq!(summary["completed"], 2);
    assert_eq!(summary["active"], 6);
    assert_eq!(summary["completionPercent"], 25);
    assert_eq!(summary["overdue"], 1);
}

#[tokio::test]
async fn categories_come_back_by_name_with_live_counts() {
    let api = start(true, DescriptionClient::disabled()).await;
    let categories: Vec<Value> = reqwest::get(format!("{api}/category/get_all")).await.unwrap().json().await.unwrap();

    let names: Vec<_> = categories.iter().map(|c| c["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Health", "Learning", "Personal", "Shopping", "Work"]);
    let work = &categories[4];
    assert_eq!(work["taskCount"], 2);
}

#[tokio::test]
async fn users_are_listed() {
    let api = start(false, DescriptionClient::disabled()).await;

    let users: Vec<Value> = reqwest::get(format!("{api}/user/get_all")).await.unwrap().json().await.unwrap();
    assert_eq!(users.len(), 8);

    let response = reqwest::get(format!("{api}/user/get?id=99")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn description_generation() {
    let api = start(false, fake_describer().await).await;
    let client = reqwest::Client::new();

    let body: Value = client
        .post(format!("{api}/task/generate_description"))
        .json(&json!({ "title": "Plan the offsite" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["description"], "Complete the work for Plan the offsite.");

    let response = client
        .post(format!("{api}/task/generate_description"))
        .json(&json!({ "title": "   " }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn description_without_endpoint_is_unavailable() {
    let api = start(false, DescriptionClient::disabled()).await;
    let response = reqwest::Client::new()
        .post(format!("{api}/task/generate_description"))
        .json(&json!({ "title": "Anything" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
