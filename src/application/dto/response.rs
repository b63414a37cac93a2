//! Response DTOs
//!
//! Data structures for API response bodies. Ids are rendered as decimal
//! strings and password hashes never leave the service.

use serde::Serialize;

use crate::application::services::{PostWithOwnerDto, UserProfileDto};
use crate::domain::{FriendshipRequest, Post, User};

/// Login response
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// A reference to another record: its id, the record itself when
/// expanded, or `null` when the referenced record no longer exists.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Reference<T> {
    Id(String),
    Expanded(T),
    Missing,
}

/// User response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub birthday_date: String,
    pub gender: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    /// The owner's posts, only present for `?includePosts=true`.
    #[serde(rename = "post", skip_serializing_if = "Option::is_none")]
    pub posts: Option<Vec<PostResponse>>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            birthday_date: user.birthday_date.format("%Y-%m-%d").to_string(),
            gender: user.gender.as_str().to_string(),
            profile_image: user.profile_image,
            created_at: user.created_at.to_rfc3339(),
            updated_at: user.updated_at.to_rfc3339(),
            posts: None,
        }
    }
}

impl From<UserProfileDto> for UserResponse {
    fn from(profile: UserProfileDto) -> Self {
        let mut response = UserResponse::from(profile.user);
        response.posts = profile
            .posts
            .map(|posts| posts.into_iter().map(PostResponse::from).collect());
        response
    }
}

/// Post response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: String,
    pub text: String,
    pub images: Vec<String>,
    pub user: Reference<UserResponse>,
    pub likes: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            id: post.id.to_string(),
            text: post.text,
            images: post.images,
            user: Reference::Id(post.user_id.to_string()),
            likes: post.likes.iter().map(i64::to_string).collect(),
            created_at: post.created_at.to_rfc3339(),
            updated_at: post.updated_at.to_rfc3339(),
        }
    }
}

impl From<PostWithOwnerDto> for PostResponse {
    fn from(dto: PostWithOwnerDto) -> Self {
        let mut response = PostResponse::from(dto.post);
        response.user = match dto.owner {
            Some(owner) => Reference::Expanded(UserResponse::from(owner)),
            None => Reference::Missing,
        };
        response
    }
}

/// Friendship request response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendshipResponse {
    pub id: String,
    pub sender: String,
    pub recipient: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<FriendshipRequest> for FriendshipResponse {
    fn from(request: FriendshipRequest) -> Self {
        Self {
            id: request.id.to_string(),
            sender: request.sender_id.to_string(),
            recipient: request.recipient_id.to_string(),
            message: request.message,
            status: request.status.as_str().to_string(),
            created_at: request.created_at.to_rfc3339(),
            updated_at: request.updated_at.to_rfc3339(),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
