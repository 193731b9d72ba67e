use axum::{Json, extract::{Query, State}, http::StatusCode};

use crate::{
    app_state::SharedState, category::Category, category_update::CategoryUpdate, id_query::IdQuery,
    new_category::NewCategory, store_error_response,
};

pub struct CategoryController {}

impl CategoryController {
    pub async fn get(
        State(state): State<SharedState>,
        Query(query): Query<IdQuery>) -> Result<Json<Category>, (StatusCode, String)> {
        match state.categories.get_by_id(query.id).await {
            Some(category) => Ok(Json(category)),
            None => Err((StatusCode::NOT_FOUND, "Category not found".to_string()))
        }
    }

    pub async fn get_all(State(state): State<SharedState>) -> Json<Vec<Category>> {
        Json(state.categories.get_all().await)
    }

    pub async fn add(
        State(state): State<SharedState>,
        Json(body): Json<NewCategory>) -> Result<Json<Category>, (StatusCode, String)> {
        state.categories.create(body).await
            .map(Json)
            .map_err(store_error_response)
    }

    pub async fn edit(
        State(state): State<SharedState>,
        Query(query): Query<IdQuery>,
        Json(body): Json<CategoryUpdate>) -> Result<Json<Category>, (StatusCode, String)> {
        state.categories.update(query.id, body).await
            .map(Json)
            .map_err(store_error_response)
    }

    pub async fn delete(
        State(state): State<SharedState>,
        Query(query): Query<IdQuery>) -> Result<(), (StatusCode, String)> {
        match state.categories.delete(query.id).await {
            true => Ok(()),
            false => Err((StatusCode::NOT_FOUND, "Category to delete was not found".to_string()))
        }
    }
}
