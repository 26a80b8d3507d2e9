//! PostgreSQL implementation of token repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::AuthToken;
use crate::domain::repositories::TokenRepository;
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct TokenRow {
    key: String,
    user_id: i64,
    created_at: DateTime<Utc>,
}

impl From<TokenRow> for AuthToken {
    fn from(row: TokenRow) -> Self {
        AuthToken {
            key: row.key,
            user_id: row.user_id,
            created_at: row.created_at,
        }
    }
}

/// PostgreSQL repository for auth tokens.
///
/// `auth_tokens_user_id_key` keeps one token per user; get-or-create is a
/// single upsert so racing logins receive the same key.
pub struct PgTokenRepository {
    pool: Arc<PgPool>,
}

impl PgTokenRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenRepository for PgTokenRepository {
    async fn get_or_create(
        &self,
        user_id: i64,
        candidate_key: &str,
    ) -> Result<AuthToken, AppError> {
        // The no-op update makes RETURNING yield the existing row on conflict.
        let row = sqlx::query_as::<_, TokenRow>(
            r#"
            INSERT INTO auth_tokens (key, user_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
            RETURNING key, user_id, created_at
            "#,
        )
        .bind(candidate_key)
        .bind(user_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn find_by_key(&self, key: &str) -> Result<Option<AuthToken>, AppError> {
        let row = sqlx::query_as::<_, TokenRow>(
            "SELECT key, user_id, created_at FROM auth_tokens WHERE key = $1",
        )
        .bind(key)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(AuthToken::from))
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM auth_tokens")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}
