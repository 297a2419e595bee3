//! # Users API
//!
//! CRUD endpoints over the in-memory user store.
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/users` | List users in insertion order |
//! | POST | `/users` | Create a user |
//! | GET | `/users/{id}` | Get a user |
//! | PUT | `/users/{id}` | Update any subset of a user's fields |
//! | DELETE | `/users/{id}` | Delete a user |
//!
//! Create and update bodies go through [`crate::validation`] first; the
//! handlers only ever see trimmed, validated fields.
//!
//! ## Example: Creating a User
//!
//! ```bash
//! curl -X POST http://localhost:3000/users \
//!   -H "Content-Type: application/json" \
//!   -d '{"firstName": "Ann", "lastName": "Lee", "hobby": "chess"}'
//! ```

use axum::{
    extract::{Path, State},
    handler::Handler,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use roster_users::{NewUser, UserError, UserPatch, UserRecord};
use serde::Serialize;

use crate::api::{ApiError, AppState};
use crate::validation::{validate_create_body, validate_update_body};

/// Creates the user routes.
///
/// Validation middleware is layered on the POST and PUT handlers only.
pub fn user_routes(state: &AppState) -> Router<AppState> {
    let validate_create =
        middleware::from_fn_with_state(state.settings.clone(), validate_create_body);
    let validate_update =
        middleware::from_fn_with_state(state.settings.clone(), validate_update_body);

    Router::new()
        .route(
            "/users",
            get(list_users).post(create_user.layer(validate_create)),
        )
        .route(
            "/users/{id}",
            get(get_user)
                .put(update_user.layer(validate_update))
                .delete(delete_user),
        )
}

/// Response carrying a single user.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub message: &'static str,
    pub data: UserRecord,
}

/// Response carrying every user.
#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub message: &'static str,
    pub count: usize,
    pub data: Vec<UserRecord>,
}

/// Parses a path id. Anything that is not a `u64` cannot name a record.
fn parse_id(raw: &str) -> Result<u64, ApiError> {
    raw.parse::<u64>()
        .map_err(|_| ApiError::User(UserError::not_found(raw)))
}

/// Lists all users.
async fn list_users(State(state): State<AppState>) -> impl IntoResponse {
    let users = state.users.list_all();

    Json(UserListResponse {
        message: "Users retrieved successfully",
        count: users.len(),
        data: users,
    })
}

/// Gets a user by id.
async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.users.get(parse_id(&id)?)?;

    Ok(Json(UserResponse {
        message: "User retrieved successfully",
        data: user,
    }))
}

/// Creates a user from a validated body.
async fn create_user(
    State(state): State<AppState>,
    Extension(new_user): Extension<NewUser>,
) -> impl IntoResponse {
    let user = state.create_user(new_user);

    tracing::info!(id = user.id, "User created");

    (
        StatusCode::CREATED,
        Json(UserResponse {
            message: "User created successfully",
            data: user,
        }),
    )
}

/// Applies a validated partial update.
async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Extension(patch): Extension<UserPatch>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.users.update(parse_id(&id)?, patch)?;

    tracing::info!(id = user.id, "User updated");

    Ok(Json(UserResponse {
        message: "User updated successfully",
        data: user,
    }))
}

/// Deletes a user.
async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.delete_user(parse_id(&id)?)?;

    tracing::info!(id = user.id, "User deleted");

    Ok(Json(UserResponse {
        message: "User deleted successfully",
        data: user,
    }))
}
