use serde::Deserialize;

use crate::status_filter::StatusFilter;

/// What the task page is currently showing.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskViewQuery {
    #[serde(default)]
    pub status: StatusFilter,
    pub category_id: Option<i64>,
    #[serde(default)]
    pub search: String,
}
