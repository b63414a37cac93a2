//! User Service
//!
//! Handles registration, profile lookup, and account management.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};

use crate::application::services::auth_service::{hash_password, Identity};
use crate::domain::{
    AccessPolicy, FriendshipRepository, Gender, Page, PageRequest, Post, PostRepository, User,
    UserRepository,
};
use crate::shared::error::AppError;
use crate::shared::snowflake::SnowflakeGenerator;

/// User service trait
#[async_trait]
pub trait UserService: Send + Sync {
    /// List users, one page at a time
    async fn list_users(&self, page: PageRequest) -> Result<Page<User>, UserError>;

    /// Register a new user
    async fn create_user(&self, new_user: NewUserDto) -> Result<User, UserError>;

    /// Users whose first name starts with `prefix`, ignoring case
    async fn search_by_name(&self, prefix: &str) -> Result<Vec<User>, UserError>;

    /// View a profile, optionally with the owner's posts
    async fn get_profile(
        &self,
        viewer: &Identity,
        user_id: i64,
        include_posts: bool,
    ) -> Result<UserProfileDto, UserError>;

    /// Apply a partial update to a user
    async fn update_user(
        &self,
        actor: &Identity,
        user_id: i64,
        changes: UpdateUserDto,
    ) -> Result<User, UserError>;

    /// Delete a user, returning the removed record
    async fn delete_user(&self, actor: &Identity, user_id: i64) -> Result<User, UserError>;
}

/// Validated registration input. `password` is plaintext.
#[derive(Debug, Clone)]
pub struct NewUserDto {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub birthday_date: NaiveDate,
    pub gender: Gender,
    pub profile_image: Option<String>,
}

/// Fields to change on an existing user. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserDto {
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub birthday_date: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub profile_image: Option<String>,
}

/// A user together with their posts, when requested.
#[derive(Debug, Clone)]
pub struct UserProfileDto {
    pub user: User,
    pub posts: Option<Vec<Post>>,
}

/// User service errors
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("User not found")]
    NotFound,

    #[error("Email already registered")]
    EmailTaken,

    #[error("Profile is only visible to friends")]
    NotFriends,

    #[error("Not allowed to modify this user")]
    Forbidden,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<AppError> for UserError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::Conflict(_) => UserError::EmailTaken,
            other => UserError::Internal(other.to_string()),
        }
    }
}

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound => AppError::NotFound("User not found".into()),
            UserError::EmailTaken => {
                AppError::Conflict("A user with this email already exists".into())
            }
            UserError::NotFriends => {
                AppError::Forbidden("You must be friends to view this profile".into())
            }
            UserError::Forbidden => {
                AppError::Forbidden("You can only modify your own account".into())
            }
            UserError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

/// UserService implementation
pub struct UserServiceImpl<U, P, F>
where
    U: UserRepository + ?Sized,
    P: PostRepository + ?Sized,
    F: FriendshipRepository + ?Sized,
{
    user_repo: Arc<U>,
    post_repo: Arc<P>,
    friendship_repo: Arc<F>,
    policy: AccessPolicy,
    id_generator: Arc<SnowflakeGenerator>,
}

impl<U, P, F> UserServiceImpl<U, P, F>
where
    U: UserRepository + ?Sized,
    P: PostRepository + ?Sized,
    F: FriendshipRepository + ?Sized,
{
    /// Create a new UserServiceImpl
    pub fn new(
        user_repo: Arc<U>,
        post_repo: Arc<P>,
        friendship_repo: Arc<F>,
        policy: AccessPolicy,
        id_generator: Arc<SnowflakeGenerator>,
    ) -> Self {
        Self {
            user_repo,
            post_repo,
            friendship_repo,
            policy,
            id_generator,
        }
    }

    fn ensure_can_modify(&self, actor: &Identity, user_id: i64) -> Result<(), UserError> {
        if self.policy.can_modify_user(actor.user_id, &actor.email, user_id) {
            Ok(())
        } else {
            tracing::debug!(actor_id = actor.user_id, user_id, "User modification denied");
            Err(UserError::Forbidden)
        }
    }
}

#[async_trait]
impl<U, P, F> UserService for UserServiceImpl<U, P, F>
where
    U: UserRepository + ?Sized + 'static,
    P: PostRepository + ?Sized + 'static,
    F: FriendshipRepository + ?Sized + 'static,
{
    async fn list_users(&self, page: PageRequest) -> Result<Page<User>, UserError> {
        let users = self.user_repo.list(page).await?;
        let total = self.user_repo.count().await?;

        Ok(Page::new(users, total, page))
    }

    async fn create_user(&self, new_user: NewUserDto) -> Result<User, UserError> {
        let password_hash =
            hash_password(&new_user.password).map_err(|e| UserError::Internal(e.to_string()))?;
        let now = Utc::now();

        let user = User {
            id: self.id_generator.generate(),
            email: new_user.email,
            password_hash,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            birthday_date: new_user.birthday_date,
            gender: new_user.gender,
            profile_image: new_user.profile_image,
            created_at: now,
            updated_at: now,
        };

        let created = self.user_repo.create(&user).await?;
        tracing::info!(user_id = created.id, "User registered");

        Ok(created)
    }

    async fn search_by_name(&self, prefix: &str) -> Result<Vec<User>, UserError> {
        Ok(self.user_repo.search_by_first_name(prefix).await?)
    }

    async fn get_profile(
        &self,
        viewer: &Identity,
        user_id: i64,
        include_posts: bool,
    ) -> Result<UserProfileDto, UserError> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(UserError::NotFound)?;

        let are_friends = viewer.user_id != user_id
            && self
                .friendship_repo
                .are_friends(viewer.user_id, user_id)
                .await?;

        if !AccessPolicy::can_view_profile(viewer.user_id, user_id, are_friends) {
            return Err(UserError::NotFriends);
        }

        let posts = if include_posts {
            Some(self.post_repo.find_by_user(user_id).await?)
        } else {
            None
        };

        Ok(UserProfileDto { user, posts })
    }

    async fn update_user(
        &self,
        actor: &Identity,
        user_id: i64,
        changes: UpdateUserDto,
    ) -> Result<User, UserError> {
        self.ensure_can_modify(actor, user_id)?;

        let mut user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(UserError::NotFound)?;

        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(password) = changes.password {
            user.password_hash =
                hash_password(&password).map_err(|e| UserError::Internal(e.to_string()))?;
        }
        if let Some(first_name) = changes.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = changes.last_name {
            user.last_name = last_name;
        }
        if let Some(birthday_date) = changes.birthday_date {
            user.birthday_date = birthday_date;
        }
        if let Some(gender) = changes.gender {
            user.gender = gender;
        }
        if let Some(profile_image) = changes.profile_image {
            user.profile_image = Some(profile_image);
        }
        user.updated_at = Utc::now();

        self.user_repo
            .update(&user)
            .await?
            .ok_or(UserError::NotFound)
    }

    async fn delete_user(&self, actor: &Identity, user_id: i64) -> Result<User, UserError> {
        self.ensure_can_modify(actor, user_id)?;

        let deleted = self
            .user_repo
            .delete(user_id)
            .await?
            .ok_or(UserError::NotFound)?;
        tracing::info!(user_id, actor_id = actor.user_id, "User deleted");

        Ok(deleted)
    }
}
