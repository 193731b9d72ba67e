use std::sync::Arc;

use crate::data_access::{
    category_store::CategoryStore, data_context::DataContext, record_service::RecordService,
    task_store::TaskStore, user_directory::UserDirectory,
};
use crate::description::DescriptionClient;

pub struct AppState {
    pub data_context: Arc<DataContext>,
    pub tasks: TaskStore,
    pub categories: CategoryStore,
    pub users: UserDirectory,
}

impl AppState {
    /// Wire the stores to one data context.
    pub fn new(data_context: DataContext, describer: DescriptionClient) -> Self {
        let data_context = Arc::new(data_context);
        let records: Arc<dyn RecordService> = data_context.clone();
        AppState {
            tasks: TaskStore::new(records.clone(), describer),
            categories: CategoryStore::new(records),
            users: UserDirectory::new(),
            data_context,
        }
    }
}

pub type SharedState = Arc<AppState>;
