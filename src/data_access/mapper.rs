//! Field mapping between application objects and storage records.
//!
//! Each table has a field enum pairing the application name with the
//! storage column. Writing a patch emits only the fields it carries;
//! reading a record always produces the full object, with defaults for
//! anything missing. Neither direction can fail.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde_json::Value;

use crate::category::Category;
use crate::data_access::record_service::{Record, ID_FIELD};
use crate::task::{Task, TaskPriority};

// ── Field tables ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskField {
    Title,
    Description,
    GeneratedDescription,
    Priority,
    DueDate,
    Completed,
    CreatedAt,
    CompletedAt,
    CategoryId,
    AssignedTo,
}

impl TaskField {
    pub const ALL: [TaskField; 10] = [
        TaskField::Title,
        TaskField::Description,
        TaskField::GeneratedDescription,
        TaskField::Priority,
        TaskField::DueDate,
        TaskField::Completed,
        TaskField::CreatedAt,
        TaskField::CompletedAt,
        TaskField::CategoryId,
        TaskField::AssignedTo,
    ];

    pub const fn ui_key(self) -> &'static str {
        match self {
            TaskField::Title => "title",
            TaskField::Description => "description",
            TaskField::GeneratedDescription => "generatedDescription",
            TaskField::Priority => "priority",
            TaskField::DueDate => "dueDate",
            TaskField::Completed => "completed",
            TaskField::CreatedAt => "createdAt",
            TaskField::CompletedAt => "completedAt",
            TaskField::CategoryId => "categoryId",
            TaskField::AssignedTo => "assignedTo",
        }
    }

    pub const fn storage_key(self) -> &'static str {
        match self {
            TaskField::Title => "title_c",
            TaskField::Description => "description_c",
            TaskField::GeneratedDescription => "generated_description_c",
            TaskField::Priority => "priority_c",
            TaskField::DueDate => "due_date_c",
            TaskField::Completed => "completed_c",
            TaskField::CreatedAt => "created_at_c",
            TaskField::CompletedAt => "completed_at_c",
            TaskField::CategoryId => "category_id_c",
            // The assignee column was added without the suffix convention.
            TaskField::AssignedTo => "assignedTo",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryField {
    Name,
    Color,
    Icon,
    TaskCount,
}

impl CategoryField {
    pub const ALL: [CategoryField; 4] = [
        CategoryField::Name,
        CategoryField::Color,
        CategoryField::Icon,
        CategoryField::TaskCount,
    ];

    pub const fn ui_key(self) -> &'static str {
        match self {
            CategoryField::Name => "name",
            CategoryField::Color => "color",
            CategoryField::Icon => "icon",
            CategoryField::TaskCount => "taskCount",
        }
    }

    pub const fn storage_key(self) -> &'static str {
        match self {
            CategoryField::Name => "name_c",
            CategoryField::Color => "color_c",
            CategoryField::Icon => "icon_c",
            CategoryField::TaskCount => "task_count_c",
        }
    }
}

/// Column list for fetching every task field.
pub fn task_columns() -> Vec<String> {
    std::iter::once(ID_FIELD)
        .chain(TaskField::ALL.iter().map(|f| f.storage_key()))
        .map(str::to_string)
        .collect()
}

pub fn category_columns() -> Vec<String> {
    std::iter::once(ID_FIELD)
        .chain(CategoryField::ALL.iter().map(|f| f.storage_key()))
        .map(str::to_string)
        .collect()
}

// ── Relations ──────────────────────────────────────────────────

/// A relation column arrives either as the bare identifier or as the
/// expanded lookup object `{ "Id": n, ... }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationRef {
    Plain(i64),
    Wrapped(i64),
}

impl RelationRef {
    pub fn parse(value: &Value) -> Option<RelationRef> {
        match value {
            Value::Object(fields) => fields.get(ID_FIELD).and_then(integer).map(RelationRef::Wrapped),
            other => integer(other).map(RelationRef::Plain),
        }
    }

    pub fn id(self) -> i64 {
        match self {
            RelationRef::Plain(id) | RelationRef::Wrapped(id) => id,
        }
    }
}

/// Identifier of a relation value, whichever shape it came in.
pub fn relation_id(value: &Value) -> Option<i64> {
    RelationRef::parse(value).map(RelationRef::id)
}

// ── Coercions ──────────────────────────────────────────────────

/// Integer from a JSON number or a numeric string.
pub fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Current time at the precision timestamps are stored with.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// RFC 3339, UTC, millisecond precision.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    value
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|at| at.with_timezone(&Utc))
}

fn text(record: &Record, key: &str) -> Option<String> {
    match record.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

fn flag(record: &Record, key: &str) -> bool {
    match record.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s == "true",
        Some(Value::Number(n)) => n.as_i64().is_some_and(|n| n != 0),
        _ => false,
    }
}

fn nullable<T>(value: Option<T>, to_json: impl FnOnce(T) -> Value) -> Value {
    value.map_or(Value::Null, to_json)
}

// ── Tasks ──────────────────────────────────────────────────────

/// A partial task in application terms. `None` means "not present";
/// for nullable fields `Some(None)` is an explicit null.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskFields {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub generated_description: Option<Option<String>>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub completed: Option<bool>,
    pub created_at: Option<DateTime<Utc>>,
    pub completed_at: Option<Option<DateTime<Utc>>>,
    pub category_id: Option<Option<i64>>,
    pub assigned_to: Option<Option<i64>>,
}

impl TaskFields {
    fn storage_value(&self, field: TaskField) -> Option<Value> {
        match field {
            TaskField::Title => self.title.clone().map(Value::String),
            TaskField::Description => self.description.clone().map(|v| nullable(v, Value::String)),
            TaskField::GeneratedDescription => {
                self.generated_description.clone().map(|v| nullable(v, Value::String))
            }
            TaskField::Priority => self.priority.map(|p| Value::String(p.as_str().to_string())),
            TaskField::DueDate => self.due_date.map(|v| nullable(v, |at| Value::String(format_timestamp(at)))),
            TaskField::Completed => self.completed.map(Value::Bool),
            TaskField::CreatedAt => self.created_at.map(|at| Value::String(format_timestamp(at))),
            TaskField::CompletedAt => {
                self.completed_at.map(|v| nullable(v, |at| Value::String(format_timestamp(at))))
            }
            TaskField::CategoryId => self.category_id.map(|v| nullable(v, Value::from)),
            TaskField::AssignedTo => self.assigned_to.map(|v| nullable(v, Value::from)),
        }
    }
}

impl From<&Task> for TaskFields {
    fn from(task: &Task) -> Self {
        TaskFields {
            title: Some(task.title.clone()),
            description: Some(task.description.clone()),
            generated_description: Some(task.generated_description.clone()),
            priority: Some(task.priority),
            due_date: Some(task.due_date),
            completed: Some(task.completed),
            created_at: Some(task.created_at),
            completed_at: Some(task.completed_at),
            category_id: Some(task.category_id),
            assigned_to: Some(task.assigned_to),
        }
    }
}

pub fn task_to_storage(fields: &TaskFields) -> Record {
    let mut record = Record::new();
    for field in TaskField::ALL {
        if let Some(value) = fields.storage_value(field) {
            tracing::trace!(field = field.ui_key(), column = field.storage_key(), "mapped task field");
            record.insert(field.storage_key().to_string(), value);
        }
    }
    record
}

pub fn task_from_storage(record: &Record) -> Task {
    let get = |field: TaskField| record.get(field.storage_key()).unwrap_or(&Value::Null);

    Task {
        id: record.get(ID_FIELD).and_then(integer).unwrap_or_default(),
        title: text(record, TaskField::Title.storage_key()).unwrap_or_default(),
        description: text(record, TaskField::Description.storage_key()),
        generated_description: text(record, TaskField::GeneratedDescription.storage_key()),
        priority: get(TaskField::Priority)
            .as_str()
            .map_or(TaskPriority::Unknown, TaskPriority::parse),
        due_date: parse_timestamp(get(TaskField::DueDate)),
        completed: flag(record, TaskField::Completed.storage_key()),
        created_at: parse_timestamp(get(TaskField::CreatedAt)).unwrap_or_default(),
        completed_at: parse_timestamp(get(TaskField::CompletedAt)),
        category_id: relation_id(get(TaskField::CategoryId)),
        assigned_to: relation_id(get(TaskField::AssignedTo)),
    }
}

// ── Categories ─────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryFields {
    pub name: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub task_count: Option<u32>,
}

impl CategoryFields {
    fn storage_value(&self, field: CategoryField) -> Option<Value> {
        match field {
            CategoryField::Name => self.name.clone().map(Value::String),
            CategoryField::Color => self.color.clone().map(Value::String),
            CategoryField::Icon => self.icon.clone().map(Value::String),
            CategoryField::TaskCount => self.task_count.map(Value::from),
        }
    }
}

pub fn category_to_storage(fields: &CategoryFields) -> Record {
    let mut record = Record::new();
    for field in CategoryField::ALL {
        if let Some(value) = fields.storage_value(field) {
            tracing::trace!(field = field.ui_key(), column = field.storage_key(), "mapped category field");
            record.insert(field.storage_key().to_string(), value);
        }
    }
    record
}

pub fn category_from_storage(record: &Record) -> Category {
    Category {
        id: record.get(ID_FIELD).and_then(integer).unwrap_or_default(),
        name: text(record, CategoryField::Name.storage_key()).unwrap_or_default(),
        color: text(record, CategoryField::Color.storage_key()).unwrap_or_default(),
        icon: text(record, CategoryField::Icon.storage_key()).unwrap_or_default(),
        task_count: record
            .get(CategoryField::TaskCount.storage_key())
            .and_then(integer)
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;
    use std::collections::HashSet;

    fn at(h: u32, ms: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 14, h, 30, 0).unwrap() + chrono::Duration::milliseconds(ms as i64)
    }

    fn full_task() -> Task {
        Task {
            id: 42,
            title: "Write quarterly report".into(),
            description: Some("Numbers for Q1".into()),
            generated_description: Some("Compile and summarize Q1 results.".into()),
            priority: TaskPriority::High,
            due_date: Some(at(17, 0)),
            completed: true,
            created_at: at(9, 125),
            completed_at: Some(at(16, 999)),
            category_id: Some(3),
            assigned_to: Some(7),
        }
    }

    #[test]
    fn full_task_survives_a_round_trip() {
        let task = full_task();
        let mut record = task_to_storage(&TaskFields::from(&task));
        record.insert(ID_FIELD.into(), json!(42));

        assert_eq!(task_from_storage(&record), task);
    }

    #[test]
    fn only_present_fields_are_written() {
        let fields = TaskFields {
            title: Some("Buy milk".into()),
            completed_at: Some(None),
            category_id: Some(Some(2)),
            ..TaskFields::default()
        };

        let record = task_to_storage(&fields);
        assert_eq!(
            Value::Object(record),
            json!({ "title_c": "Buy milk", "completed_at_c": null, "category_id_c": 2 })
        );
    }

    #[test]
    fn wrapped_and_plain_relations_both_unwrap() {
        let plain: Record = serde_json::from_value(json!({ "Id": 1, "category_id_c": 4 })).unwrap();
        let wrapped: Record =
            serde_json::from_value(json!({ "Id": 1, "category_id_c": { "Id": 4, "Name": "Work" } })).unwrap();
        let text: Record = serde_json::from_value(json!({ "Id": "1", "category_id_c": "4" })).unwrap();

        assert_eq!(task_from_storage(&plain).category_id, Some(4));
        assert_eq!(task_from_storage(&wrapped).category_id, Some(4));
        assert_eq!(task_from_storage(&text).category_id, Some(4));
        assert_eq!(task_from_storage(&text).id, 1);
        assert_eq!(RelationRef::parse(&json!({ "Id": 4 })), Some(RelationRef::Wrapped(4)));
        assert_eq!(RelationRef::parse(&json!(4)), Some(RelationRef::Plain(4)));
        assert_eq!(RelationRef::parse(&Value::Null), None);
    }

    #[test]
    fn sparse_record_reads_with_defaults() {
        let record: Record = serde_json::from_value(json!({ "Id": 9, "priority_c": "urgent" })).unwrap();
        let task = task_from_storage(&record);

        assert_eq!(task.id, 9);
        assert_eq!(task.title, "");
        assert_eq!(task.description, None);
        assert_eq!(task.priority, TaskPriority::Unknown);
        assert!(!task.completed);
        assert_eq!(task.created_at, DateTime::<Utc>::default());
        assert_eq!(task.category_id, None);
    }

    #[test]
    fn category_count_defaults_to_zero() {
        let record: Record =
            serde_json::from_value(json!({ "Id": 2, "name_c": "Home", "color_c": "#10B981", "icon_c": "Home" }))
                .unwrap();
        let category = category_from_storage(&record);

        assert_eq!(category.name, "Home");
        assert_eq!(category.task_count, 0);
    }

    #[test]
    fn category_patch_writes_only_present_fields() {
        let record = category_to_storage(&CategoryFields { color: Some("#F59E0B".into()), ..Default::default() });
        assert_eq!(Value::Object(record), json!({ "color_c": "#F59E0B" }));
    }

    #[test]
    fn field_tables_have_unique_keys() {
        let ui: HashSet<_> = TaskField::ALL.iter().map(|f| f.ui_key()).collect();
        let storage: HashSet<_> = TaskField::ALL.iter().map(|f| f.storage_key()).collect();
        assert_eq!(ui.len(), TaskField::ALL.len());
        assert_eq!(storage.len(), TaskField::ALL.len());
        assert_eq!(task_columns()[0], "Id");
        assert_eq!(category_columns().len(), 5);
    }
}
