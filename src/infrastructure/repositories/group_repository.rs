//! Group Repository Implementation
//!
//! PostgreSQL implementation of the GroupRepository trait. Groups live in
//! the `user_groups` table since `groups` is reserved in SQL.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{Group, GroupRepository};
use crate::shared::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct GroupRow {
    id: i64,
    title: String,
    images: Vec<String>,
    admin_id: i64,
    post_ids: Vec<i64>,
    member_ids: Vec<i64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<GroupRow> for Group {
    fn from(row: GroupRow) -> Self {
        Group {
            id: row.id,
            title: row.title,
            images: row.images,
            admin_id: row.admin_id,
            post_ids: row.post_ids,
            member_ids: row.member_ids,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// PostgreSQL group repository implementation.
#[derive(Clone)]
pub struct PgGroupRepository {
    pool: PgPool,
}

impl PgGroupRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GroupRepository for PgGroupRepository {
    async fn create(&self, group: &Group) -> Result<Group, AppError> {
        let row = sqlx::query_as::<_, GroupRow>(
            r#"
            INSERT INTO user_groups (id, title, images, admin_id, post_ids, member_ids,
                                     created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, title, images, admin_id, post_ids, member_ids, created_at, updated_at
            "#,
        )
        .bind(group.id)
        .bind(&group.title)
        .bind(&group.images)
        .bind(group.admin_id)
        .bind(&group.post_ids)
        .bind(&group.member_ids)
        .bind(group.created_at)
        .bind(group.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn count(&self) -> Result<u64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM user_groups")
            .fetch_one(&self.pool)
            .await?;

        Ok(count as u64)
    }

    async fn clear(&self) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM user_groups")
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
