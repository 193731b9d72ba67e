use std::sync::Arc;

use crate::data_access::mapper::{self, task_columns, task_from_storage, task_to_storage, TaskField, TaskFields};
use crate::data_access::record_service::{
    FetchParams, OrderBy, Predicate, Record, RecordService, Table, ID_FIELD,
};
use crate::data_access::store_error::{deleted, single_result, StoreError};
use crate::description::DescriptionClient;
use crate::new_task::NewTask;
use crate::task::{Task, TaskPriority};
use crate::task_update::TaskUpdate;

/// Task operations over a record service.
///
/// Reads and `delete` fail soft: errors are logged and an empty value comes
/// back. `create`, `update` and `generate_description` return `StoreError`.
#[derive(Clone)]
pub struct TaskStore {
    records: Arc<dyn RecordService>,
    describer: DescriptionClient,
}

impl TaskStore {
    pub fn new(records: Arc<dyn RecordService>, describer: DescriptionClient) -> Self {
        TaskStore { records, describer }
    }

    /// Every task, newest first.
    pub async fn get_all(&self) -> Vec<Task> {
        self.fetch(Vec::new()).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_by_id(&self, id: i64) -> Option<Task> {
        let params = FetchParams { fields: task_columns(), ..FetchParams::default() };
        match self.records.get_record_by_id(Table::Task, id, &params).await {
            Ok(response) if response.success => response.data.as_ref().map(task_from_storage),
            Ok(response) => {
                tracing::error!(message = ?response.message, "fetching task failed");
                None
            }
            Err(e) => {
                tracing::error!(error = %e, "fetching task failed");
                None
            }
        }
    }

    pub async fn get_by_category(&self, category_id: i64) -> Vec<Task> {
        self.fetch(vec![Predicate::equal_to(TaskField::CategoryId.storage_key(), category_id)])
            .await
    }

    pub async fn get_by_status(&self, completed: bool) -> Vec<Task> {
        self.fetch(vec![Predicate::equal_to(TaskField::Completed.storage_key(), completed)])
            .await
    }

    pub async fn get_by_priority(&self, priority: TaskPriority) -> Vec<Task> {
        self.fetch(vec![Predicate::equal_to(TaskField::Priority.storage_key(), priority.as_str())])
            .await
    }

    #[tracing::instrument(skip(self))]
    async fn fetch(&self, predicates: Vec<Predicate>) -> Vec<Task> {
        let params = FetchParams {
            fields: task_columns(),
            predicates,
            order_by: vec![OrderBy::desc(TaskField::CreatedAt.storage_key())],
        };
        match self.records.fetch_records(Table::Task, &params).await {
            Ok(response) if response.success => response.data.iter().map(task_from_storage).collect(),
            Ok(response) => {
                tracing::error!(message = ?response.message, "fetching tasks failed");
                Vec::new()
            }
            Err(e) => {
                tracing::error!(error = %e, "fetching tasks failed");
                Vec::new()
            }
        }
    }

    /// Stores a new task as incomplete, created now. The title is not
    /// checked here.
    #[tracing::instrument(skip(self, new), fields(title = %new.title))]
    pub async fn create(&self, new: NewTask) -> Result<Task, StoreError> {
        let fields = TaskFields {
            title: Some(new.title),
            description: new.description.map(Some),
            generated_description: new.generated_description.map(Some),
            priority: Some(new.priority),
            due_date: new.due_date.map(Some),
            completed: Some(false),
            created_at: Some(mapper::now()),
            completed_at: Some(None),
            category_id: new.category_id.map(Some),
            assigned_to: new.assigned_to.map(Some),
        };

        let response = self.records.create_records(Table::Task, vec![task_to_storage(&fields)]).await?;
        let task = task_from_storage(&single_result(response, "create", "task")?);
        tracing::info!(id = task.id, "task created");
        Ok(task)
    }

    /// Applies the fields present in `update`. Toggling `completed` stamps
    /// or clears `completedAt`.
    #[tracing::instrument(skip(self, update))]
    pub async fn update(&self, id: i64, update: TaskUpdate) -> Result<Task, StoreError> {
        let completed_at = match update.completed {
            Some(true) => Some(Some(mapper::now())),
            Some(false) => Some(None),
            None => None,
        };
        let fields = TaskFields {
            title: update.title,
            description: update.description,
            generated_description: update.generated_description,
            priority: update.priority,
            due_date: update.due_date,
            completed: update.completed,
            created_at: None,
            completed_at,
            category_id: update.category_id,
            assigned_to: update.assigned_to,
        };

        let mut record = Record::new();
        record.insert(ID_FIELD.to_string(), id.into());
        record.extend(task_to_storage(&fields));

        let response = self.records.update_records(Table::Task, vec![record]).await?;
        Ok(task_from_storage(&single_result(response, "update", "task")?))
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> bool {
        match self.records.delete_records(Table::Task, &[id]).await {
            Ok(response) => deleted(&response, "task"),
            Err(e) => {
                tracing::error!(error = %e, "deleting task failed");
                false
            }
        }
    }

    /// Callers guard against an empty title.
    #[tracing::instrument(skip(self))]
    pub async fn generate_description(&self, title: &str) -> Result<String, StoreError> {
        self.describer.generate(title).await.map_err(|e| {
            tracing::error!(error = %e, "generating description failed");
            StoreError::from(e)
        })
    }
}
