use std::sync::Arc;
use axum::{Router, routing::get};
use crate::{app_state::AppState, user_controller::UserController};

pub const ROUTER_PATH: &str = "/user";

pub fn get_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route(format!("{}/get", ROUTER_PATH).as_str(), get(UserController::get))
        .route(format!("{}/get_all", ROUTER_PATH).as_str(), get(UserController::get_all))
        .with_state(app_state)
}
