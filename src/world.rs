use serde_json::Value;
use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::data_access::mapper::{integer, parse_timestamp, relation_id};
use crate::data_access::record_service::{
    FetchParams, Operator, Predicate, Record, RecordResult, SortType, Table, ID_FIELD,
};

// ── Changes ────────────────────────────────────────────────────

/// What a mutation touched. persist.rs writes exactly these rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Upserted { table: Table, id: i64 },
    Removed { table: Table, id: i64 },
}

/// Per-record results of a batch, plus the rows it changed.
#[derive(Debug, Default)]
pub struct Applied {
    pub results: Vec<RecordResult>,
    pub changes: Vec<Change>,
    undo: Undo,
}

/// Enough of the pre-batch state to put the World back with `rollback`.
#[derive(Debug, Default)]
struct Undo {
    revision: u64,
    next_task_id: i64,
    next_category_id: i64,
    /// Row contents before the batch touched them, in touch order.
    prior: Vec<(Table, i64, Option<Record>)>,
}

// ── The World ──────────────────────────────────────────────────

#[derive(Debug)]
struct Rows {
    records: BTreeMap<i64, Record>,
    next_id: i64,
}

impl Rows {
    fn new() -> Self {
        Rows { records: BTreeMap::new(), next_id: 1 }
    }

    fn insert(&mut self, id: i64, record: Record) {
        self.next_id = self.next_id.max(id + 1);
        self.records.insert(id, record);
    }
}

/// The authoritative record tables. Lives in memory; optionally loaded
/// from and flushed to a save file by the data context.
///
/// Built once at startup and shared by handle, so there is no
/// process-wide table state.
#[derive(Debug)]
pub struct World {
    tasks: Rows,
    categories: Rows,
    pub revision: u64,
}

impl World {
    pub fn new() -> Self {
        World { tasks: Rows::new(), categories: Rows::new(), revision: 0 }
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.records.is_empty() && self.categories.records.is_empty()
    }

    pub fn len(&self, table: Table) -> usize {
        self.rows(table).records.len()
    }

    /// Raw stored record, without lookup expansion.
    pub fn record(&self, table: Table, id: i64) -> Option<&Record> {
        self.rows(table).records.get(&id)
    }

    /// Put a record back exactly as it was saved (boot-time load).
    pub fn restore(&mut self, table: Table, id: i64, record: Record) {
        self.rows_mut(table).insert(id, record);
    }

    fn rows(&self, table: Table) -> &Rows {
        match table {
            Table::Task => &self.tasks,
            Table::Category => &self.categories,
        }
    }

    fn rows_mut(&mut self, table: Table) -> &mut Rows {
        match table {
            Table::Task => &mut self.tasks,
            Table::Category => &mut self.categories,
        }
    }

    // ── Reads ──────────────────────────────────────────────────

    pub fn fetch(&self, table: Table, params: &FetchParams) -> Vec<Record> {
        let mut matches: Vec<(i64, &Record)> = self
            .rows(table)
            .records
            .iter()
            .filter(|(_, record)| params.predicates.iter().all(|p| matches_predicate(record, p)))
            .map(|(id, record)| (*id, record))
            .collect();

        // Strings in a column sort as timestamps only if all of them parse.
        let chronological: Vec<bool> = params
            .order_by
            .iter()
            .map(|order| {
                matches.iter().all(|(_, record)| match record.get(&order.field_name) {
                    Some(value @ Value::String(_)) => parse_timestamp(value).is_some(),
                    _ => true,
                })
            })
            .collect();

        matches.sort_by(|(a_id, a), (b_id, b)| {
            params
                .order_by
                .iter()
                .zip(&chronological)
                .map(|(order, &chronological)| {
                    let ordering = compare_values(
                        a.get(&order.field_name).unwrap_or(&Value::Null),
                        b.get(&order.field_name).unwrap_or(&Value::Null),
                        chronological,
                    );
                    match order.sort_type {
                        SortType::Asc => ordering,
                        SortType::Desc => ordering.reverse(),
                    }
                })
                .find(|ordering| ordering.is_ne())
                .unwrap_or_else(|| a_id.cmp(b_id))
        });

        matches
            .into_iter()
            .map(|(id, record)| self.present(table, id, record, &params.fields))
            .collect()
    }

    pub fn get(&self, table: Table, id: i64, params: &FetchParams) -> Option<Record> {
        self.record(table, id)
            .map(|record| self.present(table, id, record, &params.fields))
    }

    /// Outgoing shape: `Id` included, projection applied, relation columns
    /// expanded to `{ Id, Name }` when the referenced row exists.
    fn present(&self, table: Table, id: i64, record: &Record, fields: &[String]) -> Record {
        let mut out = Record::new();
        out.insert(ID_FIELD.to_string(), Value::from(id));
        for (key, value) in record {
            if !fields.is_empty() && !fields.iter().any(|f| f == key) {
                continue;
            }
            out.insert(key.clone(), value.clone());
        }

        for (column, target, display) in table.lookups() {
            let Some(target_id) = out.get(*column).and_then(relation_id) else {
                continue;
            };
            if let Some(target_record) = self.record(*target, target_id) {
                let mut lookup = Record::new();
                lookup.insert(ID_FIELD.to_string(), Value::from(target_id));
                lookup.insert(
                    "Name".to_string(),
                    target_record.get(*display).cloned().unwrap_or(Value::Null),
                );
                out.insert(column.to_string(), Value::Object(lookup));
            }
        }
        out
    }

    // ── Mutations ──────────────────────────────────────────────

    pub fn create(&mut self, table: Table, records: Vec<Record>) -> Applied {
        let mut applied = self.begin();
        for mut record in records {
            record.remove(ID_FIELD);
            if let Err(message) = validate_columns(table, &record) {
                applied.results.push(RecordResult::failed(message));
                continue;
            }
            let rows = self.rows_mut(table);
            let id = rows.next_id;
            rows.insert(id, record);
            applied.undo.prior.push((table, id, None));
            applied.changes.push(Change::Upserted { table, id });
            applied.results.push(self.result_for(table, id));
        }
        self.bump(&applied);
        applied
    }

    pub fn update(&mut self, table: Table, records: Vec<Record>) -> Applied {
        let mut applied = self.begin();
        for mut record in records {
            let Some(id) = record.remove(ID_FIELD).as_ref().and_then(integer) else {
                applied.results.push(RecordResult::failed("Record Id is required for update"));
                continue;
            };
            if let Err(message) = validate_columns(table, &record) {
                applied.results.push(RecordResult::failed(message));
                continue;
            }
            let Some(existing) = self.rows_mut(table).records.get_mut(&id) else {
                applied.results.push(RecordResult::failed(not_found(id)));
                continue;
            };
            applied.undo.prior.push((table, id, Some(existing.clone())));
            existing.extend(record);
            applied.changes.push(Change::Upserted { table, id });
            applied.results.push(self.result_for(table, id));
        }
        self.bump(&applied);
        applied
    }

    pub fn delete(&mut self, table: Table, ids: &[i64]) -> Applied {
        let mut applied = self.begin();
        for &id in ids {
            if let Some(removed) = self.rows_mut(table).records.remove(&id) {
                applied.undo.prior.push((table, id, Some(removed)));
                applied.changes.push(Change::Removed { table, id });
                applied.results.push(RecordResult { success: true, message: None, data: None });
            } else {
                applied.results.push(RecordResult::failed(not_found(id)));
            }
        }
        self.bump(&applied);
        applied
    }

    /// Undo a batch that could not be made durable. Must be given the most
    /// recent batch; rows, id sequences and revision return to their prior
    /// values.
    pub fn rollback(&mut self, applied: Applied) {
        let undo = applied.undo;
        for (table, id, prior) in undo.prior.into_iter().rev() {
            let records = &mut self.rows_mut(table).records;
            match prior {
                Some(record) => {
                    records.insert(id, record);
                }
                None => {
                    records.remove(&id);
                }
            }
        }
        self.tasks.next_id = undo.next_task_id;
        self.categories.next_id = undo.next_category_id;
        self.revision = undo.revision;
    }

    fn begin(&self) -> Applied {
        Applied {
            undo: Undo {
                revision: self.revision,
                next_task_id: self.tasks.next_id,
                next_category_id: self.categories.next_id,
                prior: Vec::new(),
            },
            ..Applied::default()
        }
    }

    fn result_for(&self, table: Table, id: i64) -> RecordResult {
        match self.get(table, id, &FetchParams::default()) {
            Some(record) => RecordResult::ok(record),
            None => RecordResult::failed(not_found(id)),
        }
    }

    fn bump(&mut self, applied: &Applied) {
        if !applied.changes.is_empty() {
            self.revision += 1;
        }
    }
}

impl Default for World {
    fn default() -> Self {
        World::new()
    }
}

// ── Helpers ────────────────────────────────────────────────────

fn not_found(id: i64) -> String {
    format!("Record with Id {id} not found")
}

fn validate_columns(table: Table, record: &Record) -> Result<(), String> {
    let columns = table.columns();
    match record.keys().find(|key| !columns.contains(&key.as_str())) {
        Some(unknown) => Err(format!("Unknown field '{unknown}' on {}", table.name())),
        None => Ok(()),
    }
}

fn matches_predicate(record: &Record, predicate: &Predicate) -> bool {
    let stored = record.get(&predicate.field_name).unwrap_or(&Value::Null);
    match predicate.operator {
        Operator::EqualTo => predicate.values.iter().any(|wanted| values_equal(stored, wanted)),
    }
}

/// Equality with relation objects reduced to their `Id` and numbers
/// compared by value.
fn values_equal(stored: &Value, wanted: &Value) -> bool {
    match (stored, wanted) {
        (Value::Object(_), _) | (_, Value::Object(_)) => {
            relation_id(stored).is_some() && relation_id(stored) == relation_id(wanted)
        }
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        (a, b) => a == b,
    }
}

/// Ordering for `orderBy`. Values of different kinds order null < bool <
/// number < string < array < object. Within a kind: numbers by value,
/// strings chronologically when the whole column holds timestamps and
/// lexically otherwise, relations by `Id`.
fn compare_values(a: &Value, b: &Value, chronological: bool) -> Ordering {
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => x.as_f64().unwrap_or_default().total_cmp(&y.as_f64().unwrap_or_default()),
        },
        (Value::String(x), Value::String(y)) if chronological => {
            match (parse_timestamp(a), parse_timestamp(b)) {
                (Some(x_at), Some(y_at)) => x_at.cmp(&y_at),
                _ => x.cmp(y),
            }
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Object(_), Value::Object(_)) => relation_id(a).cmp(&relation_id(b)),
        _ => kind_rank(a).cmp(&kind_rank(b)),
    }
}

fn kind_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

// ── Tests ──────────────────────────────────────────────────────
