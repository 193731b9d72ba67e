pub mod app_state;
pub mod settings;
pub mod task;
pub mod category;
pub mod user;
pub mod status_filter;
