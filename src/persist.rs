//! World ↔ redb persistence.
//!
//! redb is a save file: loaded on boot, flushed on every mutation.
//! Never queried at runtime: World is the runtime truth.

use crate::data_access::record_service::{Record, Table};
use crate::world::{Change, World};
use redb::{Database, ReadableTable, TableDefinition};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

const TASK_ROWS: TableDefinition<i64, &[u8]> = TableDefinition::new("task_c");
const CATEGORY_ROWS: TableDefinition<i64, &[u8]> = TableDefinition::new("category_c");
const META: TableDefinition<&str, &[u8]> = TableDefinition::new("meta");

fn definition(table: Table) -> TableDefinition<'static, i64, &'static [u8]> {
    match table {
        Table::Task => TASK_ROWS,
        Table::Category => CATEGORY_ROWS,
    }
}

/// Where committed batches go. `SaveFile` in production.
pub trait Persist: Send + Sync {
    /// Write the rows a mutation touched, plus the revision. All or nothing.
    fn flush(&self, world: &World, changes: &[Change]) -> Result<(), SaveFileError>;
}

/// Thin handle to the redb file. Cloneable (Arc inside).
#[derive(Clone)]
pub struct SaveFile {
    db: Arc<Database>,
}

impl SaveFile {
    /// Open (or create) the save file at the given path.
    /// Creates tables if they don't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SaveFileError> {
        let db = Database::create(path)?;

        let txn = db.begin_write()?;
        {
            for table in Table::ALL {
                let _ = txn.open_table(definition(table))?;
            }
            let _ = txn.open_table(META)?;
        }
        txn.commit()?;

        Ok(SaveFile { db: Arc::new(db) })
    }

    /// Load the entire World from disk. Called once at boot.
    pub fn load_world(&self) -> Result<World, SaveFileError> {
        let mut world = World::new();
        let txn = self.db.begin_read()?;

        for table in Table::ALL {
            let rows = txn.open_table(definition(table))?;
            for entry in rows.iter()? {
                let (id, value) = entry?;
                let record: Record = serde_json::from_slice(value.value())
                    .map_err(|e| SaveFileError::Decode(e.to_string()))?;
                world.restore(table, id.value(), record);
            }
        }

        let meta = txn.open_table(META)?;
        if let Some(rev_data) = meta.get("revision")? {
            let bytes: [u8; 8] = rev_data
                .value()
                .try_into()
                .map_err(|_| SaveFileError::Decode("revision is not 8 bytes".to_string()))?;
            world.revision = u64::from_le_bytes(bytes);
        }

        Ok(world)
    }

    /// Write the rows a mutation touched, plus the revision, in one
    /// transaction.
    pub fn flush(&self, world: &World, changes: &[Change]) -> Result<(), SaveFileError> {
        let started = Instant::now();
        let txn = self.db.begin_write()?;
        {
            let mut meta = txn.open_table(META)?;
            for change in changes {
                match *change {
                    Change::Upserted { table, id } => {
                        let mut rows = txn.open_table(definition(table))?;
                        match world.record(table, id) {
                            Some(record) => {
                                let bytes = serde_json::to_vec(record)
                                    .map_err(|e| SaveFileError::Encode(e.to_string()))?;
                                rows.insert(id, bytes.as_slice())?;
                            }
                            // Removed again later in the same batch.
                            None => {
                                rows.remove(id)?;
                            }
                        }
                    }
                    Change::Removed { table, id } => {
                        let mut rows = txn.open_table(definition(table))?;
                        rows.remove(id)?;
                    }
                }
            }
            meta.insert("revision", world.revision.to_le_bytes().as_slice())?;
        }
        txn.commit()?;
        tracing::debug!(
            changes = changes.len(),
            revision = world.revision,
            elapsed_us = started.elapsed().as_micros() as u64,
            "flush committed transaction"
        );
        Ok(())
    }
}

impl Persist for SaveFile {
    fn flush(&self, world: &World, changes: &[Change]) -> Result<(), SaveFileError> {
        SaveFile::flush(self, world, changes)
    }
}

// ── Errors ─────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum SaveFileError {
    #[error("redb: {0}")]
    Redb(String),
    #[error("decode: {0}")]
    Decode(String),
    #[error("encode: {0}")]
    Encode(String),
}

// redb 2.x has many error types. Blanket them all into SaveFileError::Redb.
macro_rules! from_redb {
    ($($t:ty),*) => {
        $(impl From<$t> for SaveFileError {
            fn from(e: $t) -> Self { SaveFileError::Redb(e.to_string()) }
        })*
    };
}

from_redb!(
    redb::Error,
    redb::DatabaseError,
    redb::TableError,
    redb::TransactionError,
    redb::StorageError,
    redb::CommitError
);

// ── Tests ──────────────────────────────────────────────────────
