use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(rename = "Id")]
    pub id: i64,
    pub name: String,
    pub color: String,
    pub icon: String,
    /// Derived on every read: active tasks referencing this category.
    pub task_count: u32,
}
