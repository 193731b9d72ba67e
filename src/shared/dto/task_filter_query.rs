use serde::Deserialize;

use crate::task::TaskPriority;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryIdQuery {
    pub category_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct CompletedQuery {
    pub completed: bool,
}

#[derive(Debug, Deserialize)]
pub struct PriorityQuery {
    pub priority: TaskPriority,
}
