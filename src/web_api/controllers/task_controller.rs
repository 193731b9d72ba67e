use axum::{Json, extract::{Query, State}, http::StatusCode};

use crate::{
    app_state::SharedState,
    generate_description_request::GenerateDescriptionRequest,
    generate_description_response::GenerateDescriptionResponse,
    id_query::IdQuery,
    new_task::NewTask,
    store_error_response,
    task::Task,
    task_filter_query::{CategoryIdQuery, CompletedQuery, PriorityQuery},
    task_update::TaskUpdate,
    task_view::{self, TaskSummary},
    task_view_query::TaskViewQuery,
};

pub struct TaskController {}

impl TaskController {
    pub async fn get(
        State(state): State<SharedState>,
        Query(query): Query<IdQuery>) -> Result<Json<Task>, (StatusCode, String)> {
        match state.tasks.get_by_id(query.id).await {
            Some(task) => Ok(Json(task)),
            None => Err((StatusCode::NOT_FOUND, "Task not found".to_string()))
        }
    }

    pub async fn get_all(State(state): State<SharedState>) -> Json<Vec<Task>> {
        Json(state.tasks.get_all().await)
    }

    pub async fn add(
        State(state): State<SharedState>,
        Json(body): Json<NewTask>) -> Result<Json<Task>, (StatusCode, String)> {
        state.tasks.create(body).await
            .map(Json)
            .map_err(store_error_response)
    }

    pub async fn edit(
        State(state): State<SharedState>,
        Query(query): Query<IdQuery>,
        Json(body): Json<TaskUpdate>) -> Result<Json<Task>, (StatusCode, String)> {
        state.tasks.update(query.id, body).await
            .map(Json)
            .map_err(store_error_response)
    }

    pub async fn delete(
        State(state): State<SharedState>,
        Query(query): Query<IdQuery>) -> Result<(), (StatusCode, String)> {
        match state.tasks.delete(query.id).await {
            true => Ok(()),
            false => Err((StatusCode::NOT_FOUND, "Task to delete was not found".to_string()))
        }
    }

    pub async fn by_category(
        State(state): State<SharedState>,
        Query(query): Query<CategoryIdQuery>) -> Json<Vec<Task>> {
        Json(state.tasks.get_by_category(query.category_id).await)
    }

    pub async fn by_status(
        State(state): State<SharedState>,
        Query(query): Query<CompletedQuery>) -> Json<Vec<Task>> {
        Json(state.tasks.get_by_status(query.completed).await)
    }

    pub async fn by_priority(
        State(state): State<SharedState>,
        Query(query): Query<PriorityQuery>) -> Json<Vec<Task>> {
        Json(state.tasks.get_by_priority(query.priority).await)
    }

    /// The task page list: filtered and in display order.
    pub async fn view(
        State(state): State<SharedState>,
        Query(query): Query<TaskViewQuery>) -> Json<Vec<Task>> {
        let tasks = state.tasks.get_all().await;
        Json(task_view::visible_tasks(&tasks, query.status, query.category_id, &query.search))
    }

    pub async fn summary(State(state): State<SharedState>) -> Json<TaskSummary> {
        let tasks = state.tasks.get_all().await;
        Json(task_view::summarize(&tasks, chrono::Utc::now()))
    }

    pub async fn generate_description(
        State(state): State<SharedState>,
        Json(body): Json<GenerateDescriptionRequest>) -> Result<Json<GenerateDescriptionResponse>, (StatusCode, String)> {
        let title = body.title.trim();
        if title.is_empty() {
            return Err((StatusCode::BAD_REQUEST, "Task title is required".to_string()));
        }
        state.tasks.generate_description(title).await
            .map(|description| Json(GenerateDescriptionResponse { success: true, description }))
            .map_err(store_error_response)
    }
}
