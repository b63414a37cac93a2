//! Friendship Request Handlers

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};

use crate::application::dto::{
    CreateFriendshipRequest, FriendshipResponse, PaginationQuery, RespondFriendshipRequest,
};
use crate::domain::{FriendshipStatus, Page};
use crate::presentation::http::extractors::{AuthUser, PathId, ValidatedJson};
use crate::shared::error::AppError;
use crate::startup::AppState;

/// List friendship requests
pub async fn list_requests(
    State(state): State<AppState>,
    Query(query): Query<PaginationQuery>,
) -> Result<Json<Page<FriendshipResponse>>, AppError> {
    let page = query.page_request()?;
    let requests = state.friendships.list_requests(page).await?;

    Ok(Json(requests.map(FriendshipResponse::from)))
}

/// Send a friendship request
pub async fn send_request(
    State(state): State<AppState>,
    _auth: AuthUser,
    ValidatedJson(body): ValidatedJson<CreateFriendshipRequest>,
) -> Result<(StatusCode, Json<FriendshipResponse>), AppError> {
    let request = state.friendships.send_request(body.into()).await?;

    Ok((StatusCode::CREATED, Json(FriendshipResponse::from(request))))
}

/// Accept or reject a pending request
pub async fn respond(
    State(state): State<AppState>,
    auth: AuthUser,
    PathId(request_id): PathId,
    ValidatedJson(body): ValidatedJson<RespondFriendshipRequest>,
) -> Result<Json<FriendshipResponse>, AppError> {
    let status = FriendshipStatus::parse_response(&body.status).ok_or_else(|| {
        AppError::BadRequest("Status must be either 'accepted' or 'rejected'".into())
    })?;

    tracing::debug!(request_id, responder = auth.user_id, %status, "Answering friendship request");
    let request = state.friendships.respond(request_id, status).await?;

    Ok(Json(FriendshipResponse::from(request)))
}

/// Pending requests sent or received by a user
pub async fn pending_for_user(
    State(state): State<AppState>,
    _auth: AuthUser,
    PathId(user_id): PathId,
) -> Result<Json<Vec<FriendshipResponse>>, AppError> {
    let requests = state.friendships.pending_for_user(user_id).await?;

    Ok(Json(requests.into_iter().map(FriendshipResponse::from).collect()))
}
