//! Post Service
//!
//! Handles post CRUD operations, owner expansion, and title search.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::{Page, PageRequest, Post, PostRepository, User, UserRepository};
use crate::shared::error::AppError;
use crate::shared::snowflake::SnowflakeGenerator;

/// Post service trait
#[async_trait]
pub trait PostService: Send + Sync {
    /// List posts with their owners expanded
    async fn list_posts(&self, page: PageRequest) -> Result<Page<PostWithOwnerDto>, PostError>;

    /// Create a post
    async fn create_post(&self, new_post: NewPostDto) -> Result<Post, PostError>;

    /// Posts whose text starts with `prefix`, ignoring case
    async fn search_by_title(&self, prefix: &str) -> Result<Vec<Post>, PostError>;

    /// Get a single post with its owner expanded
    async fn get_post(&self, post_id: i64) -> Result<PostWithOwnerDto, PostError>;

    /// Apply a partial update to a post
    async fn update_post(&self, post_id: i64, changes: UpdatePostDto) -> Result<Post, PostError>;

    /// Delete a post, returning the removed record
    async fn delete_post(&self, post_id: i64) -> Result<Post, PostError>;
}

/// Validated post creation input
#[derive(Debug, Clone)]
pub struct NewPostDto {
    pub text: String,
    pub images: Vec<String>,
    pub user_id: i64,
    pub likes: Vec<i64>,
}

/// Fields to change on an existing post
#[derive(Debug, Clone, Default)]
pub struct UpdatePostDto {
    pub text: Option<String>,
    pub images: Option<Vec<String>>,
    pub user_id: Option<i64>,
    pub likes: Option<Vec<i64>>,
}

/// A post and the user it belongs to. `owner` is `None` when the owning
/// user no longer exists.
#[derive(Debug, Clone)]
pub struct PostWithOwnerDto {
    pub post: Post,
    pub owner: Option<User>,
}

/// Post service errors
#[derive(Debug, thiserror::Error)]
pub enum PostError {
    #[error("Post not found")]
    NotFound,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<AppError> for PostError {
    fn from(err: AppError) -> Self {
        PostError::Internal(err.to_string())
    }
}

impl From<PostError> for AppError {
    fn from(err: PostError) -> Self {
        match err {
            PostError::NotFound => AppError::NotFound("Post not found".into()),
            PostError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

/// PostService implementation
pub struct PostServiceImpl<P, U>
where
    P: PostRepository + ?Sized,
    U: UserRepository + ?Sized,
{
    post_repo: Arc<P>,
    user_repo: Arc<U>,
    id_generator: Arc<SnowflakeGenerator>,
}

impl<P, U> PostServiceImpl<P, U>
where
    P: PostRepository + ?Sized,
    U: UserRepository + ?Sized,
{
    /// Create a new PostServiceImpl
    pub fn new(post_repo: Arc<P>, user_repo: Arc<U>, id_generator: Arc<SnowflakeGenerator>) -> Self {
        Self {
            post_repo,
            user_repo,
            id_generator,
        }
    }

    /// Attach owners to posts with a single batched user lookup.
    async fn with_owners(&self, posts: Vec<Post>) -> Result<Vec<PostWithOwnerDto>, PostError> {
        let mut owner_ids: Vec<i64> = posts.iter().map(|p| p.user_id).collect();
        owner_ids.sort_unstable();
        owner_ids.dedup();

        let owners: HashMap<i64, User> = if owner_ids.is_empty() {
            HashMap::new()
        } else {
            self.user_repo
                .find_by_ids(&owner_ids)
                .await?
                .into_iter()
                .map(|u| (u.id, u))
                .collect()
        };

        Ok(posts
            .into_iter()
            .map(|post| {
                let owner = owners.get(&post.user_id).cloned();
                PostWithOwnerDto { post, owner }
            })
            .collect())
    }
}

#[async_trait]
impl<P, U> PostService for PostServiceImpl<P, U>
where
    P: PostRepository + ?Sized + 'static,
    U: UserRepository + ?Sized + 'static,
{
    async fn list_posts(&self, page: PageRequest) -> Result<Page<PostWithOwnerDto>, PostError> {
        let posts = self.post_repo.list(page).await?;
        let total = self.post_repo.count().await?;
        let data = self.with_owners(posts).await?;

        Ok(Page::new(data, total, page))
    }

    async fn create_post(&self, new_post: NewPostDto) -> Result<Post, PostError> {
        let now = Utc::now();
        let post = Post {
            id: self.id_generator.generate(),
            text: new_post.text,
            images: new_post.images,
            user_id: new_post.user_id,
            likes: new_post.likes,
            created_at: now,
            updated_at: now,
        };

        let created = self.post_repo.create(&post).await?;
        tracing::debug!(post_id = created.id, user_id = created.user_id, "Post created");

        Ok(created)
    }

    async fn search_by_title(&self, prefix: &str) -> Result<Vec<Post>, PostError> {
        Ok(self.post_repo.search_by_text(prefix).await?)
    }

    async fn get_post(&self, post_id: i64) -> Result<PostWithOwnerDto, PostError> {
        let post = self
            .post_repo
            .find_by_id(post_id)
            .await?
            .ok_or(PostError::NotFound)?;

        self.with_owners(vec![post])
            .await?
            .pop()
            .ok_or(PostError::NotFound)
    }

    async fn update_post(&self, post_id: i64, changes: UpdatePostDto) -> Result<Post, PostError> {
        let mut post = self
            .post_repo
            .find_by_id(post_id)
            .await?
            .ok_or(PostError::NotFound)?;

        if let Some(text) = changes.text {
            post.text = text;
        }
        if let Some(images) = changes.images {
            post.images = images;
        }
        if let Some(user_id) = changes.user_id {
            post.user_id = user_id;
        }
        if let Some(likes) = changes.likes {
            post.likes = likes;
        }
        post.updated_at = Utc::now();

        self.post_repo
            .update(&post)
            .await?
            .ok_or(PostError::NotFound)
    }

    async fn delete_post(&self, post_id: i64) -> Result<Post, PostError> {
        self.post_repo
            .delete(post_id)
            .await?
            .ok_or(PostError::NotFound)
    }
}
