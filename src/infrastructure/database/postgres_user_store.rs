use super::map_sqlx_error;
use crate::domain::{StoreError, UserCredential, UserStore, UserStorePtr};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

pub fn create_postgres_user_store(pool: PgPool) -> UserStorePtr {
    // ---
    Arc::new(PostgresUserStore::new(pool))
}

pub struct PostgresUserStore {
    // ---
    pool: PgPool,
}

impl PostgresUserStore {
    // ---
    pub fn new(pool: PgPool) -> Self {
        // ---
        Self { pool }
    }
}

#[async_trait::async_trait]
impl UserStore for PostgresUserStore {
    // ---
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserCredential>, StoreError> {
        // ---
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, password_hash, created_at
             FROM users WHERE lower(username) = lower($1)",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(|r| UserCredential {
            id: r.id,
            username: r.username,
            password_hash: r.password_hash,
            created_at: r.created_at,
        }))
    }

    async fn insert(&self, user: &UserCredential) -> Result<(), StoreError> {
        // ---
        sqlx::query(
            "INSERT INTO users (id, username, password_hash, created_at)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        // ---
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }
}
