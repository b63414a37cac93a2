//! Friendship Request Repository Implementation
//!
//! PostgreSQL implementation of the FriendshipRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{FriendshipRepository, FriendshipRequest, FriendshipStatus, PageRequest};
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct FriendshipRow {
    id: i64,
    sender_id: i64,
    recipient_id: i64,
    message: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl FriendshipRow {
    fn into_request(self) -> Result<FriendshipRequest, AppError> {
        let status = FriendshipStatus::from_db(&self.status).ok_or_else(|| {
            AppError::Internal(format!(
                "Unknown status '{}' for friendship request {}",
                self.status, self.id
            ))
        })?;

        Ok(FriendshipRequest {
            id: self.id,
            sender_id: self.sender_id,
            recipient_id: self.recipient_id,
            message: self.message,
            status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// PostgreSQL friendship request repository implementation.
#[derive(Clone)]
pub struct PgFriendshipRepository {
    pool: PgPool,
}

impl PgFriendshipRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FriendshipRepository for PgFriendshipRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<FriendshipRequest>, AppError> {
        let row = sqlx::query_as::<_, FriendshipRow>(
            r#"
            SELECT id, sender_id, recipient_id, message, status, created_at, updated_at
            FROM friendship_requests
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(FriendshipRow::into_request).transpose()
    }

    async fn find_pending_duplicate(
        &self,
        sender_id: i64,
        recipient_id: i64,
        message: &str,
    ) -> Result<Option<FriendshipRequest>, AppError> {
        let row = sqlx::query_as::<_, FriendshipRow>(
            r#"
            SELECT id, sender_id, recipient_id, message, status, created_at, updated_at
            FROM friendship_requests
            WHERE sender_id = $1
              AND recipient_id = $2
              AND COALESCE(message, '') = $3
              AND status = 'pending'
            LIMIT 1
            "#,
        )
        .bind(sender_id)
        .bind(recipient_id)
        .bind(message)
        .fetch_optional(&self.pool)
        .await?;

        row.map(FriendshipRow::into_request).transpose()
    }

    async fn find_pending_for_user(&self, user_id: i64) -> Result<Vec<FriendshipRequest>, AppError> {
        let rows = sqlx::query_as::<_, FriendshipRow>(
            r#"
            SELECT id, sender_id, recipient_id, message, status, created_at, updated_at
            FROM friendship_requests
            WHERE (sender_id = $1 OR recipient_id = $1)
              AND status = 'pending'
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(FriendshipRow::into_request).collect()
    }

    async fn are_friends(&self, user_a: i64, user_b: i64) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM friendship_requests
                WHERE status = 'accepted'
                  AND ((sender_id = $1 AND recipient_id = $2)
                    OR (sender_id = $2 AND recipient_id = $1))
            )
            "#,
        )
        .bind(user_a)
        .bind(user_b)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn list(&self, page: PageRequest) -> Result<Vec<FriendshipRequest>, AppError> {
        let rows = sqlx::query_as::<_, FriendshipRow>(
            r#"
            SELECT id, sender_id, recipient_id, message, status, created_at, updated_at
            FROM friendship_requests
            ORDER BY id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(i64::from(page.limit()))
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(FriendshipRow::into_request).collect()
    }

    async fn count(&self) -> Result<u64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM friendship_requests")
            .fetch_one(&self.pool)
            .await?;

        Ok(count as u64)
    }

    async fn create(&self, request: &FriendshipRequest) -> Result<FriendshipRequest, AppError> {
        let row = sqlx::query_as::<_, FriendshipRow>(
            r#"
            INSERT INTO friendship_requests (id, sender_id, recipient_id, message, status,
                                             created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, sender_id, recipient_id, message, status, created_at, updated_at
            "#,
        )
        .bind(request.id)
        .bind(request.sender_id)
        .bind(request.recipient_id)
        .bind(&request.message)
        .bind(request.status.as_str())
        .bind(request.created_at)
        .bind(request.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => AppError::Conflict(
                "A pending request with the same message already exists".to_string(),
            ),
            _ => AppError::Database(e),
        })?;

        row.into_request()
    }

    /// Conditional on the row still being pending, so two concurrent
    /// answers cannot both succeed.
    async fn update_pending_status(
        &self,
        id: i64,
        status: FriendshipStatus,
    ) -> Result<Option<FriendshipRequest>, AppError> {
        let row = sqlx::query_as::<_, FriendshipRow>(
            r#"
            UPDATE friendship_requests
            SET status = $2,
                updated_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING id, sender_id, recipient_id, message, status, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(FriendshipRow::into_request).transpose()
    }

    async fn clear(&self) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM friendship_requests")
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
