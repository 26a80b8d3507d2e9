//! PostgreSQL implementation of confirmation repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::repositories::ConfirmationRepository;
use crate::error::AppError;

/// PostgreSQL repository for pending email confirmations.
pub struct PgConfirmationRepository {
    pool: Arc<PgPool>,
}

impl PgConfirmationRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConfirmationRepository for PgConfirmationRepository {
    async fn store(&self, user_id: i64, token_hash: &str) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO email_confirmations (user_id, token_hash)
            VALUES ($1, $2)
            ON CONFLICT (user_id)
            DO UPDATE SET token_hash = EXCLUDED.token_hash, created_at = NOW()
            "#,
        )
        .bind(user_id)
        .bind(token_hash)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn consume(&self, user_id: i64, token_hash: &str) -> Result<bool, AppError> {
        let result =
            sqlx::query("DELETE FROM email_confirmations WHERE user_id = $1 AND token_hash = $2")
                .bind(user_id)
                .bind(token_hash)
                .execute(self.pool.as_ref())
                .await?;

        Ok(result.rows_affected() > 0)
    }
}
