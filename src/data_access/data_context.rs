use async_trait::async_trait;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::data_access::record_service::{
    BackendError, FetchParams, FetchResponse, MutationResponse, Record, RecordResponse, RecordService, Table,
};
use crate::persist::Persist;
use crate::world::{Applied, World};

/// The local record service: the in-memory World, optionally backed by a
/// redb save file that every mutation is flushed to.
pub struct DataContext {
    world: RwLock<World>,
    save_file: Option<Box<dyn Persist>>,
}

impl DataContext {
    /// Mock mode. Nothing survives a restart.
    pub fn in_memory(world: World) -> Self {
        DataContext { world: RwLock::new(world), save_file: None }
    }

    pub fn with_save_file(world: World, save_file: impl Persist + 'static) -> Self {
        DataContext { world: RwLock::new(world), save_file: Some(Box::new(save_file)) }
    }

    pub fn revision(&self) -> Result<u64, BackendError> {
        Ok(self.read()?.revision)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, World>, BackendError> {
        self.world
            .read()
            .map_err(|_| BackendError::Storage("world lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, World>, BackendError> {
        self.world
            .write()
            .map_err(|_| BackendError::Storage("world lock poisoned".to_string()))
    }

    /// Mutate the World, then flush the touched rows while still holding
    /// the write lock so the save file sees batches in order. A batch that
    /// fails to flush is rolled back, so memory never runs ahead of disk.
    fn mutate(&self, apply: impl FnOnce(&mut World) -> Applied) -> Result<MutationResponse, BackendError> {
        let mut world = self.write()?;
        let applied = apply(&mut *world);

        if let Some(save_file) = &self.save_file {
            if !applied.changes.is_empty() {
                if let Err(e) = save_file.flush(&world, &applied.changes) {
                    tracing::error!(error = %e, changes = applied.changes.len(), "save file flush failed, rolling back");
                    world.rollback(applied);
                    return Err(BackendError::Storage(e.to_string()));
                }
            }
        }

        Ok(MutationResponse { success: true, message: None, results: Some(applied.results) })
    }
}

#[async_trait]
impl RecordService for DataContext {
    async fn fetch_records(&self, table: Table, params: &FetchParams) -> Result<FetchResponse, BackendError> {
        let data = self.read()?.fetch(table, params);
        Ok(FetchResponse { success: true, message: None, data })
    }

    async fn get_record_by_id(&self, table: Table, id: i64, params: &FetchParams) -> Result<RecordResponse, BackendError> {
        let data = self.read()?.get(table, id, params);
        Ok(RecordResponse { success: true, message: None, data })
    }

    async fn create_records(&self, table: Table, records: Vec<Record>) -> Result<MutationResponse, BackendError> {
        self.mutate(|world| world.create(table, records))
    }

    async fn update_records(&self, table: Table, records: Vec<Record>) -> Result<MutationResponse, BackendError> {
        self.mutate(|world| world.update(table, records))
    }

    async fn delete_records(&self, table: Table, ids: &[i64]) -> Result<MutationResponse, BackendError> {
        self.mutate(|world| world.delete(table, ids))
    }
}
