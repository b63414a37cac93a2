//! User Handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::dto::{
    CreateUserRequest, LoginRequest, PaginationQuery, ProfileQuery, TokenResponse,
    UpdateUserRequest, UserResponse,
};
use crate::domain::Page;
use crate::infrastructure::metrics;
use crate::presentation::http::extractors::{AuthUser, PathId, ValidatedJson};
use crate::shared::error::AppError;
use crate::startup::AppState;

/// List users
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<PaginationQuery>,
) -> Result<Json<Page<UserResponse>>, AppError> {
    let page = query.page_request()?;
    let users = state.users.list_users(page).await?;

    Ok(Json(users.map(UserResponse::from)))
}

/// Register a new user
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let user = state.users.create_user(body.into()).await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Users whose first name starts with the given prefix
pub async fn search_by_name(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(name): Path<String>,
) -> Result<Response, AppError> {
    let users = state.users.search_by_name(name.trim()).await?;

    let body: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    let status = if body.is_empty() {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::OK
    };

    Ok((status, Json(body)).into_response())
}

/// Exchange credentials for a bearer token
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let result = state.auth.login(&body.email, &body.password).await;
    metrics::record_login(result.is_ok());

    Ok(Json(TokenResponse { token: result? }))
}

/// View a profile; friends only
pub async fn get_user(
    State(state): State<AppState>,
    auth: AuthUser,
    PathId(user_id): PathId,
    Query(query): Query<ProfileQuery>,
) -> Result<Json<UserResponse>, AppError> {
    let profile = state
        .users
        .get_profile(&auth.identity(), user_id, query.include_posts())
        .await?;

    Ok(Json(UserResponse::from(profile)))
}

/// Update a user; owner or admin only
pub async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    PathId(user_id): PathId,
    ValidatedJson(body): ValidatedJson<UpdateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let user = state
        .users
        .update_user(&auth.identity(), user_id, body.into())
        .await?;

    Ok(Json(UserResponse::from(user)))
}

/// Delete a user; owner or admin only
pub async fn delete_user(
    State(state): State<AppState>,
    auth: AuthUser,
    PathId(user_id): PathId,
) -> Result<Json<UserResponse>, AppError> {
    let user = state.users.delete_user(&auth.identity(), user_id).await?;

    Ok(Json(UserResponse::from(user)))
}
