use std::sync::Arc;
use axum::{Router, routing::{get, post, put, delete}};
use crate::{app_state::AppState, task_controller::TaskController};

pub const ROUTER_PATH: &str = "/task";

pub fn get_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route(format!("{}/get", ROUTER_PATH).as_str(), get(TaskController::get))
        .route(format!("{}/get_all", ROUTER_PATH).as_str(), get(TaskController::get_all))
        .route(format!("{}/add", ROUTER_PATH).as_str(), post(TaskController::add))
        .route(format!("{}/edit", ROUTER_PATH).as_str(), put(TaskController::edit))
        .route(format!("{}/delete", ROUTER_PATH).as_str(), delete(TaskController::delete))
        .route(format!("{}/by_category", ROUTER_PATH).as_str(), get(TaskController::by_category))
        .route(format!("{}/by_status", ROUTER_PATH).as_str(), get(TaskController::by_status))
        .route(format!("{}/by_priority", ROUTER_PATH).as_str(), get(TaskController::by_priority))
        .route(format!("{}/view", ROUTER_PATH).as_str(), get(TaskController::view))
        .route(format!("{}/summary", ROUTER_PATH).as_str(), get(TaskController::summary))
        .route(
            format!("{}/generate_description", ROUTER_PATH).as_str(),
            post(TaskController::generate_description),
        )
        .with_state(app_state)
}
