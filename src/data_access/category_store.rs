use std::collections::HashMap;
use std::sync::Arc;

use crate::category::Category;
use crate::category_update::CategoryUpdate;
use crate::data_access::mapper::{
    category_columns, category_from_storage, category_to_storage, relation_id, CategoryField, CategoryFields,
    TaskField,
};
use crate::data_access::record_service::{FetchParams, OrderBy, Predicate, Record, RecordService, Table, ID_FIELD};
use crate::data_access::store_error::{deleted, single_result, StoreError};
use crate::new_category::NewCategory;

/// Category operations. `task_count` is never trusted from storage: every
/// read recounts the active tasks that reference the category.
#[derive(Clone)]
pub struct CategoryStore {
    records: Arc<dyn RecordService>,
}

impl CategoryStore {
    pub fn new(records: Arc<dyn RecordService>) -> Self {
        CategoryStore { records }
    }

    /// Every category by name, counted from a single fetch of active tasks.
    #[tracing::instrument(skip(self))]
    pub async fn get_all(&self) -> Vec<Category> {
        let params = FetchParams {
            fields: category_columns(),
            order_by: vec![OrderBy::asc(CategoryField::Name.storage_key())],
            ..FetchParams::default()
        };
        let mut categories: Vec<Category> = match self.records.fetch_records(Table::Category, &params).await {
            Ok(response) if response.success => response.data.iter().map(category_from_storage).collect(),
            Ok(response) => {
                tracing::error!(message = ?response.message, "fetching categories failed");
                return Vec::new();
            }
            Err(e) => {
                tracing::error!(error = %e, "fetching categories failed");
                return Vec::new();
            }
        };

        let counts = self.active_counts(Vec::new()).await;
        for category in &mut categories {
            category.task_count = counts.get(&category.id).copied().unwrap_or(0);
        }
        categories
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_by_id(&self, id: i64) -> Option<Category> {
        let params = FetchParams { fields: category_columns(), ..FetchParams::default() };
        let record = match self.records.get_record_by_id(Table::Category, id, &params).await {
            Ok(response) if response.success => response.data?,
            Ok(response) => {
                tracing::error!(message = ?response.message, "fetching category failed");
                return None;
            }
            Err(e) => {
                tracing::error!(error = %e, "fetching category failed");
                return None;
            }
        };
        Some(self.recounted(category_from_storage(&record)).await)
    }

    /// Stored with a task count of zero.
    #[tracing::instrument(skip(self, new), fields(name = %new.name))]
    pub async fn create(&self, new: NewCategory) -> Result<Category, StoreError> {
        let fields = CategoryFields {
            name: Some(new.name),
            color: Some(new.color),
            icon: Some(new.icon),
            task_count: Some(0),
        };
        let response = self
            .records
            .create_records(Table::Category, vec![category_to_storage(&fields)])
            .await?;
        let category = category_from_storage(&single_result(response, "create", "category")?);
        tracing::info!(id = category.id, "category created");
        Ok(category)
    }

    #[tracing::instrument(skip(self, update))]
    pub async fn update(&self, id: i64, update: CategoryUpdate) -> Result<Category, StoreError> {
        let fields = CategoryFields { name: update.name, color: update.color, icon: update.icon, task_count: None };

        let mut record = Record::new();
        record.insert(ID_FIELD.to_string(), id.into());
        record.extend(category_to_storage(&fields));

        let response = self.records.update_records(Table::Category, vec![record]).await?;
        let category = category_from_storage(&single_result(response, "update", "category")?);
        Ok(self.recounted(category).await)
    }

    /// Tasks that reference the category are left in place.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> bool {
        match self.records.delete_records(Table::Category, &[id]).await {
            Ok(response) => deleted(&response, "category"),
            Err(e) => {
                tracing::error!(error = %e, "deleting category failed");
                false
            }
        }
    }

    async fn recounted(&self, mut category: Category) -> Category {
        let predicate = Predicate::equal_to(TaskField::CategoryId.storage_key(), category.id);
        category.task_count = self
            .active_counts(vec![predicate])
            .await
            .get(&category.id)
            .copied()
            .unwrap_or(0);
        category
    }

    /// Active (not completed) task count per category id. A failed fetch
    /// counts as zero everywhere.
    async fn active_counts(&self, mut predicates: Vec<Predicate>) -> HashMap<i64, u32> {
        predicates.push(Predicate::equal_to(TaskField::Completed.storage_key(), false));
        let params = FetchParams {
            fields: vec![ID_FIELD.to_string(), TaskField::CategoryId.storage_key().to_string()],
            predicates,
            order_by: Vec::new(),
        };

        let mut counts = HashMap::new();
        match self.records.fetch_records(Table::Task, &params).await {
            Ok(response) if response.success => {
                for record in &response.data {
                    if let Some(category_id) = record.get(TaskField::CategoryId.storage_key()).and_then(relation_id) {
                        *counts.entry(category_id).or_insert(0) += 1;
                    }
                }
            }
            Ok(response) => tracing::error!(message = ?response.message, "counting tasks failed"),
            Err(e) => tracing::error!(error = %e, "counting tasks failed"),
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_access::data_context::DataContext;
    use crate::data_access::record_service::doubles::{FailingTable, Offline};
    use crate::data_access::record_service::BackendError;
    use crate::data_access::task_store::TaskStore;
    use crate::description::DescriptionClient;
    use crate::new_task::NewTask;
    use crate::task_update::TaskUpdate;
    use crate::world::World;
    use serde_json::json;

    fn stores() -> (CategoryStore, TaskStore) {
        let records: Arc<dyn RecordService> = Arc::new(DataContext::in_memory(World::new()));
        (CategoryStore::new(records.clone()), TaskStore::new(records, DescriptionClient::disabled()))
    }

    fn category(name: &str) -> NewCategory {
        NewCategory { name: name.to_string(), color: "#5B4FE8".into(), icon: "Folder".into() }
    }

    fn task_in(category_id: i64) -> NewTask {
        NewTask { title: "task".into(), category_id: Some(category_id), ..NewTask::default() }
    }

    #[tokio::test]
    async fn create_starts_at_zero() {
        let (categories, _) = stores();
        let created = categories.create(category("Work")).await.unwrap();

        assert_eq!(created.id, 1);
        assert_eq!(created.name, "Work");
        assert_eq!(created.task_count, 0);
    }

    #[tokio::test]
    async fn counts_follow_task_changes() {
        let (categories, tasks) = stores();
        categories.create(category("Work")).await.unwrap();
        categories.create(category("Home")).await.unwrap();

        tasks.create(task_in(1)).await.unwrap();
        tasks.create(task_in(1)).await.unwrap();
        tasks.create(task_in(2)).await.unwrap();
        assert_eq!(categories.get_by_id(1).await.unwrap().task_count, 2);

        tasks.update(1, TaskUpdate { completed: Some(true), ..TaskUpdate::default() }).await.unwrap();
        assert_eq!(categories.get_by_id(1).await.unwrap().task_count, 1);

        tasks.delete(2).await;
        tasks.update(3, TaskUpdate { category_id: Some(Some(1)), ..TaskUpdate::default() }).await.unwrap();

        let all = categories.get_all().await;
        let counts: Vec<_> = all.iter().map(|c| (c.name.as_str(), c.task_count)).collect();
        // Ordered by name.
        assert_eq!(counts, vec![("Home", 0), ("Work", 1)]);
    }

    #[tokio::test]
    async fn update_recounts() {
        let (categories, tasks) = stores();
        categories.create(category("Work")).await.unwrap();
        tasks.create(task_in(1)).await.unwrap();

        let updated = categories
            .update(1, CategoryUpdate { color: Some("#10B981".into()), ..CategoryUpdate::default() })
            .await
            .unwrap();
        assert_eq!(updated.name, "Work");
        assert_eq!(updated.color, "#10B981");
        assert_eq!(updated.task_count, 1);
    }

    #[tokio::test]
    async fn missing_category() {
        let (categories, _) = stores();
        assert!(categories.get_by_id(9).await.is_none());
        assert!(!categories.delete(9).await);

        let err = categories.update(9, CategoryUpdate::default()).await.unwrap_err();
        assert_eq!(err.to_string(), "Record with Id 9 not found");
    }

    #[tokio::test]
    async fn delete_leaves_tasks_behind() {
        let (categories, tasks) = stores();
        categories.create(category("Work")).await.unwrap();
        tasks.create(task_in(1)).await.unwrap();

        assert!(categories.delete(1).await);
        assert_eq!(tasks.get_by_id(1).await.unwrap().category_id, Some(1));
    }

    // ── Failure policy ─────────────────────────────────────────

    #[tokio::test]
    async fn offline_reads_fail_soft() {
        let categories = CategoryStore::new(Arc::new(Offline));

        assert!(categories.get_all().await.is_empty());
        assert!(categories.get_by_id(1).await.is_none());
        assert!(!categories.delete(1).await);
    }

    #[tokio::test]
    async fn offline_writes_fail_hard() {
        let categories = CategoryStore::new(Arc::new(Offline));

        let err = categories.create(category("Work")).await.unwrap_err();
        assert!(matches!(err, StoreError::Backend(BackendError::Unavailable(_))));
        let err = categories.update(1, CategoryUpdate::default()).await.unwrap_err();
        assert!(matches!(err, StoreError::Backend(BackendError::Unavailable(_))));
    }

    #[tokio::test]
    async fn counts_fall_back_to_zero_when_tasks_are_unreachable() {
        let mut world = World::new();
        world.create(Table::Category, vec![category_to_storage(&CategoryFields {
            name: Some("Work".into()),
            task_count: Some(3),
            ..CategoryFields::default()
        })]);
        world.create(Table::Task, vec![serde_json::from_value(json!({
            "title_c": "Counted",
            "completed_c": false,
            "category_id_c": 1
        }))
        .unwrap()]);
        let records = FailingTable { inner: DataContext::in_memory(world), unreachable: Table::Task };
        let categories = CategoryStore::new(Arc::new(records));

        let all = categories.get_all().await;
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "Work");
        assert_eq!(all[0].task_count, 0);
        assert_eq!(categories.get_by_id(1).await.unwrap().task_count, 0);
    }
}
