//! Application Services
//!
//! Business logic services that coordinate domain operations.
//!
//! ## Available Services
//!
//! - **AuthService**: Login, bearer tokens, password hashing
//! - **UserService**: Registration, profiles, account management
//! - **PostService**: Post CRUD and title search
//! - **FriendshipService**: Sending and answering friendship requests
//! - **Seeder**: Demo data loading

pub mod auth_service;
pub mod friendship_service;
pub mod post_service;
pub mod seed_service;
pub mod user_service;

// Re-export auth service types
pub use auth_service::{hash_password, verify_password, AuthError, AuthService, AuthServiceImpl, Claims, Identity};

// Re-export user service types
pub use user_service::{NewUserDto, UpdateUserDto, UserError, UserProfileDto, UserService, UserServiceImpl};

// Re-export post service types
pub use post_service::{NewPostDto, PostError, PostService, PostServiceImpl, PostWithOwnerDto, UpdatePostDto};

// Re-export friendship service types
pub use friendship_service::{
    FriendshipError, FriendshipService, FriendshipServiceImpl, NewFriendshipRequestDto,
};

pub use seed_service::{SeedReport, Seeder};
