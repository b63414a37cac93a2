//! Post Repository Implementation
//!
//! PostgreSQL implementation of the PostRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::like_prefix;
use crate::domain::{PageRequest, Post, PostRepository};
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct PostRow {
    id: i64,
    text: String,
    images: Vec<String>,
    user_id: i64,
    likes: Vec<i64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Post {
            id: row.id,
            text: row.text,
            images: row.images,
            user_id: row.user_id,
            likes: row.likes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// PostgreSQL post repository implementation.
#[derive(Clone)]
pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, AppError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT id, text, images, user_id, likes, created_at, updated_at
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Post::from))
    }

    async fn find_by_user(&self, user_id: i64) -> Result<Vec<Post>, AppError> {
        let rows = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT id, text, images, user_id, likes, created_at, updated_at
            FROM posts
            WHERE user_id = $1
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Post::from).collect())
    }

    async fn search_by_text(&self, prefix: &str) -> Result<Vec<Post>, AppError> {
        let rows = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT id, text, images, user_id, likes, created_at, updated_at
            FROM posts
            WHERE lower(text) LIKE $1 ESCAPE '\'
            ORDER BY id
            "#,
        )
        .bind(like_prefix(&prefix.to_lowercase()))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Post::from).collect())
    }

    async fn list(&self, page: PageRequest) -> Result<Vec<Post>, AppError> {
        let rows = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT id, text, images, user_id, likes, created_at, updated_at
            FROM posts
            ORDER BY id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(i64::from(page.limit()))
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Post::from).collect())
    }

    async fn count(&self) -> Result<u64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM posts")
            .fetch_one(&self.pool)
            .await?;

        Ok(count as u64)
    }

    async fn create(&self, post: &Post) -> Result<Post, AppError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            INSERT INTO posts (id, text, images, user_id, likes, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, text, images, user_id, likes, created_at, updated_at
            "#,
        )
        .bind(post.id)
        .bind(&post.text)
        .bind(&post.images)
        .bind(post.user_id)
        .bind(&post.likes)
        .bind(post.created_at)
        .bind(post.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn update(&self, post: &Post) -> Result<Option<Post>, AppError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            UPDATE posts
            SET text = $2,
                images = $3,
                user_id = $4,
                likes = $5,
                updated_at = $6
            WHERE id = $1
            RETURNING id, text, images, user_id, likes, created_at, updated_at
            "#,
        )
        .bind(post.id)
        .bind(&post.text)
        .bind(&post.images)
        .bind(post.user_id)
        .bind(&post.likes)
        .bind(post.updated_at)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Post::from))
    }

    async fn delete(&self, id: i64) -> Result<Option<Post>, AppError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            DELETE FROM posts
            WHERE id = $1
            RETURNING id, text, images, user_id, likes, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Post::from))
    }

    async fn clear(&self) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM posts")
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
