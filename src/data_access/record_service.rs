//! Record service boundary.
//!
//! Parameter and response shapes follow the remote record service: tables
//! of flat records keyed by `Id`, queried with field lists, `FieldName` /
//! `Operator` / `Values` predicates and `fieldName` / `sorttype` ordering.
//! Mutations answer with one result per submitted record.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::data_access::mapper::{CategoryField, TaskField};

/// A storage-side record: storage column name to JSON value.
pub type Record = Map<String, Value>;

pub const ID_FIELD: &str = "Id";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Table {
    #[serde(rename = "task_c")]
    Task,
    #[serde(rename = "category_c")]
    Category,
}

impl Table {
    pub const ALL: [Table; 2] = [Table::Task, Table::Category];

    pub fn name(self) -> &'static str {
        match self {
            Table::Task => "task_c",
            Table::Category => "category_c",
        }
    }

    /// Every column a record of this table may carry, `Id` excluded.
    pub fn columns(self) -> Vec<&'static str> {
        match self {
            Table::Task => TaskField::ALL.iter().map(|f| f.storage_key()).collect(),
            Table::Category => CategoryField::ALL.iter().map(|f| f.storage_key()).collect(),
        }
    }

    /// Relation columns: (column, referenced table, referenced display column).
    pub fn lookups(self) -> &'static [(&'static str, Table, &'static str)] {
        match self {
            Table::Task => &[("category_id_c", Table::Category, "name_c")],
            Table::Category => &[],
        }
    }
}

// ── Parameters ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    EqualTo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Predicate {
    #[serde(rename = "FieldName")]
    pub field_name: String,
    #[serde(rename = "Operator")]
    pub operator: Operator,
    #[serde(rename = "Values")]
    pub values: Vec<Value>,
}

impl Predicate {
    pub fn equal_to(field_name: &str, value: impl Into<Value>) -> Self {
        Predicate {
            field_name: field_name.to_string(),
            operator: Operator::EqualTo,
            values: vec![value.into()],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortType {
    #[serde(rename = "ASC")]
    Asc,
    #[serde(rename = "DESC")]
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    #[serde(rename = "fieldName")]
    pub field_name: String,
    #[serde(rename = "sorttype")]
    pub sort_type: SortType,
}

impl OrderBy {
    pub fn asc(field_name: &str) -> Self {
        OrderBy { field_name: field_name.to_string(), sort_type: SortType::Asc }
    }

    pub fn desc(field_name: &str) -> Self {
        OrderBy { field_name: field_name.to_string(), sort_type: SortType::Desc }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FetchParams {
    /// Columns to return. Empty means all of them.
    #[serde(default)]
    pub fields: Vec<String>,
    #[serde(rename = "where", default)]
    pub predicates: Vec<Predicate>,
    #[serde(rename = "orderBy", default)]
    pub order_by: Vec<OrderBy>,
}

// ── Responses ──────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FetchResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Vec<Record>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<Record>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordResult {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<Record>,
}

impl RecordResult {
    pub fn ok(data: Record) -> Self {
        RecordResult { success: true, message: None, data: Some(data) }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        RecordResult { success: false, message: Some(message.into()), data: None }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MutationResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub results: Option<Vec<RecordResult>>,
}

// ── The service ────────────────────────────────────────────────

/// Failure to reach or use the record service at all. Per-record
/// rejections are reported inside the responses instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    #[error("record service unavailable: {0}")]
    Unavailable(String),

    #[error("record storage failed: {0}")]
    Storage(String),
}

#[async_trait]
pub trait RecordService: Send + Sync {
    async fn fetch_records(&self, table: Table, params: &FetchParams) -> Result<FetchResponse, BackendError>;

    async fn get_record_by_id(&self, table: Table, id: i64, params: &FetchParams) -> Result<RecordResponse, BackendError>;

    async fn create_records(&self, table: Table, records: Vec<Record>) -> Result<MutationResponse, BackendError>;

    /// Each record must carry its `Id`; the remaining columns are merged.
    async fn update_records(&self, table: Table, records: Vec<Record>) -> Result<MutationResponse, BackendError>;

    async fn delete_records(&self, table: Table, ids: &[i64]) -> Result<MutationResponse, BackendError>;
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn params_use_record_service_names() {
        let params = FetchParams {
            fields: vec!["Id".into(), "title_c".into()],
            predicates: vec![Predicate::equal_to("completed_c", false)],
            order_by: vec![OrderBy::desc("created_at_c")],
        };

        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(
            value,
            json!({
                "fields": ["Id", "title_c"],
                "where": [{ "FieldName": "completed_c", "Operator": "EqualTo", "Values": [false] }],
                "orderBy": [{ "fieldName": "created_at_c", "sorttype": "DESC" }]
            })
        );
    }

    #[test]
    fn mutation_response_without_results_parses() {
        let response: MutationResponse =
            serde_json::from_value(json!({ "success": false, "message": "quota exceeded" })).unwrap();
        assert!(!response.success);
        assert_eq!(response.message.as_deref(), Some("quota exceeded"));
        assert!(response.results.is_none());
    }

    #[test]
    fn task_table_columns_cover_mapper_fields() {
        let columns = Table::Task.columns();
        assert_eq!(columns.len(), 10);
        assert!(columns.contains(&"category_id_c"));
        assert!(columns.contains(&"assignedTo"));
        assert_eq!(Table::Category.columns(), vec!["name_c", "color_c", "icon_c", "task_count_c"]);
    }
}
