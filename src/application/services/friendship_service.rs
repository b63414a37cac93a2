//! Friendship Service
//!
//! Handles sending friendship requests and answering them.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::{FriendshipRepository, FriendshipRequest, FriendshipStatus, Page, PageRequest};
use crate::shared::error::AppError;
use crate::shared::snowflake::SnowflakeGenerator;

/// Friendship service trait
#[async_trait]
pub trait FriendshipService: Send + Sync {
    /// List requests, one page at a time
    async fn list_requests(&self, page: PageRequest)
        -> Result<Page<FriendshipRequest>, FriendshipError>;

    /// Send a new pending request
    async fn send_request(
        &self,
        request: NewFriendshipRequestDto,
    ) -> Result<FriendshipRequest, FriendshipError>;

    /// Accept or reject a pending request
    async fn respond(
        &self,
        request_id: i64,
        status: FriendshipStatus,
    ) -> Result<FriendshipRequest, FriendshipError>;

    /// Pending requests sent or received by `user_id`
    async fn pending_for_user(&self, user_id: i64)
        -> Result<Vec<FriendshipRequest>, FriendshipError>;
}

/// Validated request creation input
#[derive(Debug, Clone)]
pub struct NewFriendshipRequestDto {
    pub sender_id: i64,
    pub recipient_id: i64,
    pub message: Option<String>,
}

/// Friendship service errors
#[derive(Debug, thiserror::Error)]
pub enum FriendshipError {
    #[error("Friendship request not found")]
    NotFound,

    #[error("Duplicate pending request")]
    DuplicatePending,

    #[error("Request already {0}")]
    AlreadyAnswered(FriendshipStatus),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<AppError> for FriendshipError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::Conflict(_) => FriendshipError::DuplicatePending,
            other => FriendshipError::Internal(other.to_string()),
        }
    }
}

impl From<FriendshipError> for AppError {
    fn from(err: FriendshipError) -> Self {
        match err {
            FriendshipError::NotFound => {
                AppError::NotFound("Friendship request not found".into())
            }
            FriendshipError::DuplicatePending => AppError::BadRequest(
                "A pending request with the same message already exists between these users"
                    .into(),
            ),
            FriendshipError::AlreadyAnswered(status) => {
                AppError::Conflict(format!("Friendship request was already {}", status))
            }
            FriendshipError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

/// FriendshipService implementation
pub struct FriendshipServiceImpl<F>
where
    F: FriendshipRepository + ?Sized,
{
    friendship_repo: Arc<F>,
    id_generator: Arc<SnowflakeGenerator>,
}

impl<F> FriendshipServiceImpl<F>
where
    F: FriendshipRepository + ?Sized,
{
    /// Create a new FriendshipServiceImpl
    pub fn new(friendship_repo: Arc<F>, id_generator: Arc<SnowflakeGenerator>) -> Self {
        Self {
            friendship_repo,
            id_generator,
        }
    }
}

#[async_trait]
impl<F> FriendshipService for FriendshipServiceImpl<F>
where
    F: FriendshipRepository + ?Sized + 'static,
{
    async fn list_requests(
        &self,
        page: PageRequest,
    ) -> Result<Page<FriendshipRequest>, FriendshipError> {
        let requests = self.friendship_repo.list(page).await?;
        let total = self.friendship_repo.count().await?;

        Ok(Page::new(requests, total, page))
    }

    async fn send_request(
        &self,
        request: NewFriendshipRequestDto,
    ) -> Result<FriendshipRequest, FriendshipError> {
        let message = request.message.filter(|m| !m.is_empty());

        let duplicate = self
            .friendship_repo
            .find_pending_duplicate(
                request.sender_id,
                request.recipient_id,
                message.as_deref().unwrap_or_default(),
            )
            .await?;
        if duplicate.is_some() {
            return Err(FriendshipError::DuplicatePending);
        }

        let now = Utc::now();
        let pending = FriendshipRequest {
            id: self.id_generator.generate(),
            sender_id: request.sender_id,
            recipient_id: request.recipient_id,
            message,
            status: FriendshipStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        // A concurrent duplicate surfaces here as a Conflict.
        let created = self.friendship_repo.create(&pending).await?;
        tracing::debug!(
            request_id = created.id,
            sender_id = created.sender_id,
            recipient_id = created.recipient_id,
            "Friendship request sent"
        );

        Ok(created)
    }

    async fn respond(
        &self,
        request_id: i64,
        status: FriendshipStatus,
    ) -> Result<FriendshipRequest, FriendshipError> {
        let current = self
            .friendship_repo
            .find_by_id(request_id)
            .await?
            .ok_or(FriendshipError::NotFound)?;

        if !current.status.can_transition_to(status) {
            return Err(FriendshipError::AlreadyAnswered(current.status));
        }

        match self
            .friendship_repo
            .update_pending_status(request_id, status)
            .await?
        {
            Some(updated) => {
                tracing::info!(request_id, status = %updated.status, "Friendship request answered");
                Ok(updated)
            }
            // Answered by someone else between the read and the write.
            None => match self.friendship_repo.find_by_id(request_id).await? {
                Some(latest) => Err(FriendshipError::AlreadyAnswered(latest.status)),
                None => Err(FriendshipError::NotFound),
            },
        }
    }

    async fn pending_for_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<FriendshipRequest>, FriendshipError> {
        Ok(self.friendship_repo.find_pending_for_user(user_id).await?)
    }
}
