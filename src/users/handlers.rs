use axum::{
    extract::{Path, Query},
    routing::get,
    Json, Router,
};
use tracing::{instrument, warn};

use crate::{error::ApiError, state::AppState};

use super::dto::{ListUsersQuery, PlaceholderUser};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/:user_id", get(get_user))
}

/// GET /users — list users with optional filter parameters.
///
/// Stub: returns a fixed page of 10 placeholder records echoing the `user_id`
/// filter; the remaining filters are accepted but not applied yet.
/// TODO: back this with `User::list` and drop the placeholder page.
#[instrument]
pub async fn list_users(Query(q): Query<ListUsersQuery>) -> Json<Vec<PlaceholderUser>> {
    let users = (0..10)
        .map(|_| PlaceholderUser {
            user_id: q.user_id.clone(),
        })
        .collect();
    Json(users)
}

/// GET /users/:user_id — fetch one user by identifier.
///
/// Stub: "exists" is the placeholder range check `0 < id < 100`.
/// TODO: replace with `User::find_by_id` once the users table is populated.
#[instrument]
pub async fn get_user(Path(user_id): Path<String>) -> Result<Json<PlaceholderUser>, ApiError> {
    let id: i64 = user_id.parse().map_err(|_| {
        warn!(%user_id, "non-numeric user_id");
        ApiError::BadRequest(format!("user_id must be an integer, got {user_id}"))
    })?;

    let exists = 0 < id && id < 100;
    if !exists {
        return Err(ApiError::NotFound(format!(
            "User with user_id={user_id} not found"
        )));
    }
    Ok(Json(PlaceholderUser {
        user_id: Some(user_id),
    }))
}
