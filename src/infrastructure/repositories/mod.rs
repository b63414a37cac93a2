//! Repository Implementations
//!
//! PostgreSQL implementations of domain repository traits.
//!
//! ## Available Repositories
//!
//! - **PgUserRepository** - User accounts and name search
//! - **PgPostRepository** - Posts and title search
//! - **PgGroupRepository** - Groups (seeded only)
//! - **PgFriendshipRepository** - Friendship requests and their status
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! let pool = create_pool(&settings.database).await?;
//! let repos = postgres_repositories(pool);
//! let user = repos.users.find_by_id(id).await?;
//! ```

pub mod friendship_repository;
pub mod group_repository;
pub mod post_repository;
pub mod user_repository;

use std::sync::Arc;

use sqlx::PgPool;

use crate::domain::Repositories;

pub use friendship_repository::PgFriendshipRepository;
pub use group_repository::PgGroupRepository;
pub use post_repository::PgPostRepository;
pub use user_repository::PgUserRepository;

/// Build every repository on one shared connection pool.
pub fn postgres_repositories(pool: PgPool) -> Repositories {
    Repositories {
        users: Arc::new(PgUserRepository::new(pool.clone())),
        posts: Arc::new(PgPostRepository::new(pool.clone())),
        groups: Arc::new(PgGroupRepository::new(pool.clone())),
        friendships: Arc::new(PgFriendshipRepository::new(pool)),
    }
}

/// `LIKE` pattern matching values that start with `prefix` literally.
/// Use with `ESCAPE '\'`.
pub(crate) fn like_prefix(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for c in prefix.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
