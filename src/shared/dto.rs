use serde::{Deserialize, Deserializer};

// Requests
pub mod new_task;
pub mod task_update;
pub mod new_category;
pub mod category_update;
pub mod id_query;
pub mod task_filter_query;
pub mod task_view_query;
pub mod generate_description_request;

// Responses
pub mod generate_description_response;
pub mod health_response;

/// Distinguishes an absent field (`None`) from an explicit `null`
/// (`Some(None)`). Pair with `#[serde(default)]`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
