pub mod category_routes;
pub mod health_routes;
pub mod task_routes;
pub mod user_routes;

use axum::Router;

use crate::app_state::SharedState;

pub const API_PATH: &str = "/api";

pub fn map_routes(app_state: SharedState) -> Router {
    let api = Router::new()
        .merge(health_routes::get_router(app_state.clone()))
        .merge(task_routes::get_router(app_state.clone()))
        .merge(category_routes::get_router(app_state.clone()))
        .merge(user_routes::get_router(app_state));

    Router::new().nest(API_PATH, api)
}
