// ABOUTME: HTTP request handlers for user operations
// ABOUTME: Create, fetch, and delete users; read and change a user's tags

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use usertags_users::{User, UserCreateInput};

use crate::error::{ApiResult, AppError};
use crate::state::AppState;

/// Request body for creating a user
#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub email: Option<String>,
}

/// Request body for attaching or detaching tags
#[derive(Deserialize)]
pub struct TagsRequest {
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserTagsResponse {
    pub user_id: i64,
    pub tags: Vec<String>,
}

/// Create a user
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> ApiResult<impl IntoResponse> {
    let Some(email) = request.email else {
        return Err(AppError::bad_request("email is missing"));
    };

    info!("Creating user");

    let user = state
        .user_storage
        .create_user(UserCreateInput { email: Some(email) })
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// Get user by ID
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<User>> {
    info!("Getting user: {}", user_id);

    let user = state.user_storage.get_user(user_id).await?;
    Ok(Json(user))
}

/// Delete a user along with every tag association it holds
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> ApiResult<StatusCode> {
    info!("Deleting user: {}", user_id);

    state
        .user_storage
        .delete_user(user_id, state.store())
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// List the tags attached to a user
pub async fn get_user_tags(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<UserTagsResponse>> {
    info!("Getting tags for user: {}", user_id);

    let user = state.user_storage.get_user(user_id).await?;
    let tags = user.tags(state.store()).await?;

    Ok(Json(UserTagsResponse {
        user_id: user.id,
        tags,
    }))
}

/// Attach tags to a user
pub async fn add_user_tags(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(request): Json<TagsRequest>,
) -> ApiResult<Json<UserTagsResponse>> {
    info!("Adding {} tag(s) to user {}", request.tags.len(), user_id);

    // Existence is checked here; the tag index trusts its caller
    let user = state.user_storage.get_user(user_id).await?;
    user.add_tags(state.store(), &request.tags).await?;
    let tags = user.tags(state.store()).await?;

    Ok(Json(UserTagsResponse {
        user_id: user.id,
        tags,
    }))
}

/// Detach tags from a user
pub async fn remove_user_tags(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(request): Json<TagsRequest>,
) -> ApiResult<Json<UserTagsResponse>> {
    info!(
        "Removing {} tag(s) from user {}",
        request.tags.len(),
        user_id
    );

    let user = state.user_storage.get_user(user_id).await?;
    user.remove_tags(state.store(), &request.tags).await?;
    let tags = user.tags(state.store()).await?;

    Ok(Json(UserTagsResponse {
        user_id: user.id,
        tags,
    }))
}
