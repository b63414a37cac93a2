//! Post entity and repository trait.
//!
//! Maps to the `posts` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::PageRequest;
use crate::shared::error::AppError;

/// A post published by a user.
///
/// Maps to the `posts` table:
/// - id: BIGINT PRIMARY KEY (Snowflake ID)
/// - text: VARCHAR(450) NOT NULL
/// - images: TEXT[] NOT NULL DEFAULT '{}'
/// - user_id: BIGINT NOT NULL (unenforced reference to users.id)
/// - likes: BIGINT[] NOT NULL DEFAULT '{}'
/// - created_at / updated_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,

    pub text: String,

    /// Image paths
    pub images: Vec<String>,

    /// Owning user
    pub user_id: i64,

    /// Users who liked the post
    pub likes: Vec<i64>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Repository trait for Post data access operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, AppError>;

    /// Every post owned by `user_id`, oldest first.
    async fn find_by_user(&self, user_id: i64) -> Result<Vec<Post>, AppError>;

    /// Case-insensitive prefix match on the post text.
    async fn search_by_text(&self, prefix: &str) -> Result<Vec<Post>, AppError>;

    async fn list(&self, page: PageRequest) -> Result<Vec<Post>, AppError>;

    async fn count(&self) -> Result<u64, AppError>;

    async fn create(&self, post: &Post) -> Result<Post, AppError>;

    /// Persist every mutable field; `None` when the post does not exist.
    async fn update(&self, post: &Post) -> Result<Option<Post>, AppError>;

    async fn delete(&self, id: i64) -> Result<Option<Post>, AppError>;

    async fn clear(&self) -> Result<u64, AppError>;
}
