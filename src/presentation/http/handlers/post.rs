//! Post Handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::dto::{CreatePostRequest, PaginationQuery, PostResponse, UpdatePostRequest};
use crate::domain::Page;
use crate::presentation::http::extractors::{PathId, ValidatedJson};
use crate::shared::error::AppError;
use crate::startup::AppState;

/// List posts with owners expanded
pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<PaginationQuery>,
) -> Result<Json<Page<PostResponse>>, AppError> {
    let page = query.page_request()?;
    let posts = state.posts.list_posts(page).await?;

    Ok(Json(posts.map(PostResponse::from)))
}

/// Create a post
pub async fn create_post(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<CreatePostRequest>,
) -> Result<(StatusCode, Json<PostResponse>), AppError> {
    let post = state.posts.create_post(body.into()).await?;

    Ok((StatusCode::CREATED, Json(PostResponse::from(post))))
}

/// Posts whose text starts with the given prefix
pub async fn search_by_title(
    State(state): State<AppState>,
    Path(title): Path<String>,
) -> Result<Response, AppError> {
    let posts = state.posts.search_by_title(title.trim()).await?;

    let body: Vec<PostResponse> = posts.into_iter().map(PostResponse::from).collect();
    let status = if body.is_empty() {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::OK
    };

    Ok((status, Json(body)).into_response())
}

/// Get a single post
pub async fn get_post(
    State(state): State<AppState>,
    PathId(post_id): PathId,
) -> Result<Json<PostResponse>, AppError> {
    let post = state.posts.get_post(post_id).await?;

    Ok(Json(PostResponse::from(post)))
}

/// Update a post
pub async fn update_post(
    State(state): State<AppState>,
    PathId(post_id): PathId,
    ValidatedJson(body): ValidatedJson<UpdatePostRequest>,
) -> Result<Json<PostResponse>, AppError> {
    let post = state.posts.update_post(post_id, body.into()).await?;

    Ok(Json(PostResponse::from(post)))
}

/// Delete a post
pub async fn delete_post(
    State(state): State<AppState>,
    PathId(post_id): PathId,
) -> Result<Json<PostResponse>, AppError> {
    let post = state.posts.delete_post(post_id).await?;

    Ok(Json(PostResponse::from(post)))
}
