use axum::{Json, extract::{Query, State}, http::StatusCode};

use crate::{app_state::SharedState, id_query::IdQuery, user::User};

pub struct UserController {}

impl UserController {
    pub async fn get(
        State(state): State<SharedState>,
        Query(query): Query<IdQuery>) -> Result<Json<User>, (StatusCode, String)> {
        match state.users.get_by_id(query.id) {
            Some(user) => Ok(Json(user)),
            None => Err((StatusCode::NOT_FOUND, "User not found".to_string()))
        }
    }

    pub async fn get_all(State(state): State<SharedState>) -> Json<Vec<User>> {
        Json(state.users.get_all())
    }
}
