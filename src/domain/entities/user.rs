//! User entity and repository trait.
//!
//! Maps to the `users` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::PageRequest;
use crate::shared::error::AppError;

/// Gender enum matching database VARCHAR constraint.
///
/// Parsing is case-insensitive; the stored form is upper-case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
pub enum Gender {
    Female,
    Male,
    Custom,
}

impl Gender {
    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Female => "FEMALE",
            Self::Male => "MALE",
            Self::Custom => "CUSTOM",
        }
    }
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "FEMALE" => Ok(Self::Female),
            "MALE" => Ok(Self::Male),
            "CUSTOM" => Ok(Self::Custom),
            other => Err(format!(
                "`{}` is not a valid gender (expected FEMALE, MALE or CUSTOM)",
                other
            )),
        }
    }
}

impl TryFrom<String> for Gender {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Represents a user account.
///
/// Maps to the `users` table:
/// - id: BIGINT PRIMARY KEY (Snowflake ID)
/// - email: VARCHAR(255) NOT NULL UNIQUE
/// - password_hash: VARCHAR(255) NOT NULL
/// - first_name / last_name: VARCHAR(20) NOT NULL
/// - birthday_date: DATE NOT NULL
/// - gender: VARCHAR(16) NOT NULL
/// - profile_image: TEXT NULL
/// - created_at / updated_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Snowflake ID (primary key)
    pub id: i64,

    /// Email address (unique)
    pub email: String,

    /// Argon2 password hash
    #[serde(skip_serializing)]
    pub password_hash: String,

    pub first_name: String,

    pub last_name: String,

    pub birthday_date: NaiveDate,

    pub gender: Gender,

    /// Path or URL of the profile picture
    pub profile_image: Option<String>,

    /// Account creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Repository trait for User data access operations.
///
/// Implementations of this trait handle the actual database interactions.
/// The trait is defined in the domain layer to maintain dependency inversion.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by their Snowflake ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError>;

    /// Fetch every user whose id is in `ids` (missing ids are skipped).
    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<User>, AppError>;

    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Case-insensitive prefix match on the first name.
    async fn search_by_first_name(&self, prefix: &str) -> Result<Vec<User>, AppError>;

    /// One page of users in creation order.
    async fn list(&self, page: PageRequest) -> Result<Vec<User>, AppError>;

    /// Total number of users.
    async fn count(&self) -> Result<u64, AppError>;

    /// Create a new user in the database.
    async fn create(&self, user: &User) -> Result<User, AppError>;

    /// Persist every mutable field of an existing user.
    async fn update(&self, user: &User) -> Result<Option<User>, AppError>;

    /// Delete a user by ID, returning the removed record.
    async fn delete(&self, id: i64) -> Result<Option<User>, AppError>;

    /// Remove every user; returns how many were deleted.
    async fn clear(&self) -> Result<u64, AppError>;
}
