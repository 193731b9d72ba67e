//---------------------------------------
pub mod web_api {
    pub mod routes;
    pub mod controllers;
}

pub use web_api::routes::map_routes;
pub use web_api::controllers::*;
//---------------------------------------

//---------------------------------------
pub mod shared {
    pub mod models;
    pub mod dto;
}

pub use shared::models::*;
pub use shared::dto::*;
//---------------------------------------

//---------------------------------------
pub mod data_access {
    pub mod record_service;
    pub mod mapper;
    pub mod data_context;
    pub mod store_error;
    pub mod task_store;
    pub mod category_store;
    pub mod user_directory;
}
//---------------------------------------

//---------------------------------------
pub mod world;
pub mod persist;
pub mod fixtures;
pub mod description;
pub mod task_view;
//---------------------------------------
