//! Group entity and repository trait.
//!
//! Maps to the `user_groups` table. Groups have no HTTP surface; they are
//! populated by the seeder.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// A group of users administered by one of them.
///
/// Maps to the `user_groups` table:
/// - id: BIGINT PRIMARY KEY (Snowflake ID)
/// - title: VARCHAR(150) NOT NULL
/// - images: TEXT[] NOT NULL DEFAULT '{}'
/// - admin_id: BIGINT NOT NULL
/// - post_ids / member_ids: BIGINT[] NOT NULL DEFAULT '{}'
/// - created_at / updated_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: i64,

    pub title: String,

    pub images: Vec<String>,

    /// Administrator of the group
    pub admin_id: i64,

    pub post_ids: Vec<i64>,

    pub member_ids: Vec<i64>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Group {
    pub fn is_member(&self, user_id: i64) -> bool {
        self.member_ids.contains(&user_id)
    }

    /// Add a member; returns false if they were already in the group.
    pub fn add_member(&mut self, user_id: i64) -> bool {
        if self.is_member(user_id) {
            return false;
        }
        self.member_ids.push(user_id);
        true
    }
}

/// Repository trait for Group data access operations.
#[async_trait]
pub trait GroupRepository: Send + Sync {
    async fn create(&self, group: &Group) -> Result<Group, AppError>;

    async fn count(&self) -> Result<u64, AppError>;

    async fn clear(&self) -> Result<u64, AppError>;
}
