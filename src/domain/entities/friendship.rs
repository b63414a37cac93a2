//! Friendship request entity and repository trait.
//!
//! Maps to the `friendship_requests` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::PageRequest;
use crate::shared::error::AppError;

/// Lifecycle of a friendship request: `pending` moves to one of the two
/// terminal states and never back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FriendshipStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

impl FriendshipStatus {
    /// Convert from database string representation.
    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "accepted" => Some(Self::Accepted),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }

    /// Parse the status a recipient answers with. Only terminal states are
    /// valid answers; `approved` is kept as an alias of `accepted` for older
    /// clients.
    pub fn parse_response(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "accepted" | "approved" => Some(Self::Accepted),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Whether the state machine allows moving from `self` to `next`.
    pub fn can_transition_to(&self, next: FriendshipStatus) -> bool {
        matches!(self, Self::Pending) && next.is_terminal()
    }
}

impl std::fmt::Display for FriendshipStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A request from `sender_id` to become friends with `recipient_id`.
///
/// Maps to the `friendship_requests` table:
/// - id: BIGINT PRIMARY KEY (Snowflake ID)
/// - sender_id / recipient_id: BIGINT NOT NULL
/// - message: VARCHAR(450) NULL
/// - status: VARCHAR(16) NOT NULL DEFAULT 'pending'
/// - created_at / updated_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
///
/// A partial unique index forbids two pending requests with the same
/// sender, recipient and message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FriendshipRequest {
    pub id: i64,

    pub sender_id: i64,

    pub recipient_id: i64,

    pub message: Option<String>,

    #[serde(default)]
    pub status: FriendshipStatus,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl FriendshipRequest {
    /// Check if a user is either party of the request.
    pub fn involves(&self, user_id: i64) -> bool {
        self.sender_id == user_id || self.recipient_id == user_id
    }

    /// Same sender, recipient and message (absent and empty messages match).
    pub fn duplicates(&self, sender_id: i64, recipient_id: i64, message: &str) -> bool {
        self.sender_id == sender_id
            && self.recipient_id == recipient_id
            && self.message.as_deref().unwrap_or_default() == message
    }
}

/// Repository trait for friendship request data access operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FriendshipRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<FriendshipRequest>, AppError>;

    /// A pending request with the same sender, recipient and message. An
    /// empty `message` matches requests sent without one.
    async fn find_pending_duplicate(
        &self,
        sender_id: i64,
        recipient_id: i64,
        message: &str,
    ) -> Result<Option<FriendshipRequest>, AppError>;

    /// Pending requests where `user_id` is sender or recipient.
    async fn find_pending_for_user(&self, user_id: i64) -> Result<Vec<FriendshipRequest>, AppError>;

    /// True if an accepted request links the two users in either direction.
    async fn are_friends(&self, user_a: i64, user_b: i64) -> Result<bool, AppError>;

    async fn list(&self, page: PageRequest) -> Result<Vec<FriendshipRequest>, AppError>;

    async fn count(&self) -> Result<u64, AppError>;

    /// Insert a request. A pending duplicate is reported as
    /// [`AppError::Conflict`].
    async fn create(&self, request: &FriendshipRequest) -> Result<FriendshipRequest, AppError>;

    /// Move a *pending* request to `status`. Returns `None` if the request
    /// does not exist or is no longer pending.
    async fn update_pending_status(
        &self,
        id: i64,
        status: FriendshipStatus,
    ) -> Result<Option<FriendshipRequest>, AppError>;

    async fn clear(&self) -> Result<u64, AppError>;
}
