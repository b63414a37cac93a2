//! # Domain Entities
//!
//! Core domain entities representing the main business objects of the social
//! network. All entities map directly to their corresponding database tables.
//!
//! - **User**: account with credentials and profile
//! - **Post**: text and images published by a user, with likes
//! - **Group**: titled set of members administered by one user
//! - **FriendshipRequest**: pending/accepted/rejected link between two users
//!
//! ## Repository Traits
//!
//! Each entity has an associated repository trait defining data access operations.
//! These traits are implemented in the infrastructure layer, following the
//! dependency inversion principle.

use std::sync::Arc;

mod friendship;
mod group;
mod post;
mod user;

pub use friendship::{FriendshipRepository, FriendshipRequest, FriendshipStatus};
pub use group::{Group, GroupRepository};
pub use post::{Post, PostRepository};
pub use user::{Gender, User, UserRepository};

/// One handle per repository, behind trait objects so the storage backend
/// can be swapped (Postgres in production, in-memory doubles in tests).
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub groups: Arc<dyn GroupRepository>,
    pub friendships: Arc<dyn FriendshipRepository>,
}

#[cfg(test)]
pub use friendship::MockFriendshipRepository;
#[cfg(test)]
pub use post::MockPostRepository;
#[cfg(test)]
pub use user::MockUserRepository;
