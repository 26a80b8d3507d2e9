//! PostgreSQL implementation of contact repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Contact, ContactPatch, NewContact};
use crate::domain::repositories::ContactRepository;
use crate::error::AppError;

const CONTACT_COLUMNS: &str =
    "id, user_id, city, street, house, structure, building, apartment, phone, created_at";

#[derive(sqlx::FromRow)]
struct ContactRow {
    id: i64,
    user_id: i64,
    city: String,
    street: String,
    house: String,
    structure: String,
    building: String,
    apartment: String,
    phone: String,
    created_at: DateTime<Utc>,
}

impl From<ContactRow> for Contact {
    fn from(row: ContactRow) -> Self {
        Contact {
            id: row.id,
            user_id: row.user_id,
            city: row.city,
            street: row.street,
            house: row.house,
            structure: row.structure,
            building: row.building,
            apartment: row.apartment,
            phone: row.phone,
            created_at: row.created_at,
        }
    }
}

/// PostgreSQL repository for address contacts.
///
/// Every statement filters on `user_id` so that foreign rows are never
/// read or written.
pub struct PgContactRepository {
    pool: Arc<PgPool>,
}

impl PgContactRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContactRepository for PgContactRepository {
    async fn create(&self, user_id: i64, new_contact: NewContact) -> Result<Contact, AppError> {
        let sql = format!(
            r#"
            INSERT INTO contacts
                (user_id, city, street, house, structure, building, apartment, phone)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {CONTACT_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, ContactRow>(&sql)
            .bind(user_id)
            .bind(new_contact.city)
            .bind(new_contact.street)
            .bind(new_contact.house)
            .bind(new_contact.structure)
            .bind(new_contact.building)
            .bind(new_contact.apartment)
            .bind(new_contact.phone)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(row.into())
    }

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Contact>, AppError> {
        let sql = format!("SELECT {CONTACT_COLUMNS} FROM contacts WHERE user_id = $1 ORDER BY id");

        let rows = sqlx::query_as::<_, ContactRow>(&sql)
            .bind(user_id)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(Contact::from).collect())
    }

    async fn update(
        &self,
        id: i64,
        user_id: i64,
        patch: ContactPatch,
    ) -> Result<Option<Contact>, AppError> {
        let sql = format!(
            r#"
            UPDATE contacts
            SET city      = COALESCE($3::TEXT, city),
                street    = COALESCE($4::TEXT, street),
                house     = COALESCE($5::TEXT, house),
                structure = COALESCE($6::TEXT, structure),
                building  = COALESCE($7::TEXT, building),
                apartment = COALESCE($8::TEXT, apartment),
                phone     = COALESCE($9::TEXT, phone)
            WHERE id = $1 AND user_id = $2
            RETURNING {CONTACT_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, ContactRow>(&sql)
            .bind(id)
            .bind(user_id)
            .bind(patch.city)
            .bind(patch.street)
            .bind(patch.house)
            .bind(patch.structure)
            .bind(patch.building)
            .bind(patch.apartment)
            .bind(patch.phone)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Contact::from))
    }

    async fn delete_by_ids(&self, user_id: i64, ids: &[i64]) -> Result<u64, AppError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query("DELETE FROM contacts WHERE user_id = $1 AND id = ANY($2)")
            .bind(user_id)
            .bind(ids.to_vec())
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected())
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM contacts")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}
