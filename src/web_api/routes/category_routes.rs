use std::sync::Arc;
use axum::{Router, routing::{get, post, put, delete}};
use crate::{app_state::AppState, category_controller::CategoryController};

pub const ROUTER_PATH: &str = "/category";

pub fn get_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route(format!("{}/get", ROUTER_PATH).as_str(), get(CategoryController::get))
        .route(format!("{}/get_all", ROUTER_PATH).as_str(), get(CategoryController::get_all))
        .route(format!("{}/add", ROUTER_PATH).as_str(), post(CategoryController::add))
        .route(format!("{}/edit", ROUTER_PATH).as_str(), put(CategoryController::edit))
        .route(format!("{}/delete", ROUTER_PATH).as_str(), delete(CategoryController::delete))
        .with_state(app_state)
}
