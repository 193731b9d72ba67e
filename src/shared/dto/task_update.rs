use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::task::TaskPriority;

/// A partial task update. Absent fields are left alone; an explicit `null`
/// clears a nullable field. `createdAt` cannot be changed.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdate {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "crate::shared::dto::double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::shared::dto::double_option")]
    pub generated_description: Option<Option<String>>,
    pub priority: Option<TaskPriority>,
    #[serde(default, deserialize_with = "crate::shared::dto::double_option")]
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub completed: Option<bool>,
    #[serde(default, deserialize_with = "crate::shared::dto::double_option")]
    pub category_id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "crate::shared::dto::double_option")]
    pub assigned_to: Option<Option<i64>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_and_null_are_different() {
        let update: TaskUpdate =
            serde_json::from_value(json!({ "completed": true, "dueDate": null, "categoryId": 3 })).unwrap();

        assert_eq!(update.completed, Some(true));
        assert_eq!(update.due_date, Some(None));
        assert_eq!(update.category_id, Some(Some(3)));
        assert_eq!(update.description, None);
        assert_eq!(update.title, None);
    }
}
