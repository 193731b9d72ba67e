use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Task priority as stored in `priority_c`.
///
/// Anything the record service hands back that is not one of the three
/// known values reads as `Unknown`, which sorts below `Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
    #[serde(other)]
    Unknown,
}

impl TaskPriority {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
            TaskPriority::Unknown => "unknown",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "low" => TaskPriority::Low,
            "medium" => TaskPriority::Medium,
            "high" => TaskPriority::High,
            _ => TaskPriority::Unknown,
        }
    }

    /// Sort weight: high=3, medium=2, low=1, unknown=0.
    pub fn rank(self) -> u8 {
        match self {
            TaskPriority::High => 3,
            TaskPriority::Medium => 2,
            TaskPriority::Low => 1,
            TaskPriority::Unknown => 0,
        }
    }
}

/// A task as the rest of the application sees it.
///
/// `completed_at` is `Some` exactly when `completed` is true; the task store
/// stamps and clears it whenever an update toggles `completed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(rename = "Id")]
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub generated_description: Option<String>,
    pub priority: TaskPriority,
    pub due_date: Option<DateTime<Utc>>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub category_id: Option<i64>,
    pub assigned_to: Option<i64>,
}
