use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::task::TaskPriority;

/// Fields a caller supplies for a new task. `completed`, `createdAt` and
/// `completedAt` are stamped by the store.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub generated_description: Option<String>,
    #[serde(default)]
    pub priority: TaskPriority,
    pub due_date: Option<DateTime<Utc>>,
    pub category_id: Option<i64>,
    pub assigned_to: Option<i64>,
}
