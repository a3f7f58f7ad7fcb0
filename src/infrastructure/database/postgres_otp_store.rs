use super::map_sqlx_error;
use crate::domain::{OtpRecord, OtpStore, OtpStorePtr, StoreError};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

#[derive(sqlx::FromRow)]
struct PhoneOtpRow {
    id: Uuid,
    phone_number: String,
    code: String,
    created_at: DateTime<Utc>,
}

impl From<PhoneOtpRow> for OtpRecord {
    fn from(r: PhoneOtpRow) -> Self {
        OtpRecord::from_parts(r.id, r.phone_number, r.code, r.created_at)
    }
}

pub fn create_postgres_otp_store(pool: PgPool) -> OtpStorePtr {
    // ---
    Arc::new(PostgresOtpStore::new(pool))
}

/// OTP records in the `phone_otps` table, unique on `phone_number`.
pub struct PostgresOtpStore {
    // ---
    pool: PgPool,
}

impl PostgresOtpStore {
    // ---
    pub fn new(pool: PgPool) -> Self {
        // ---
        Self { pool }
    }
}

#[async_trait::async_trait]
impl OtpStore for PostgresOtpStore {
    // ---
    async fn find_by_phone(&self, phone: &str) -> Result<Option<OtpRecord>, StoreError> {
        // ---
        let row = sqlx::query_as::<_, PhoneOtpRow>(
            "SELECT id, phone_number, code, created_at FROM phone_otps WHERE phone_number = $1",
        )
        .bind(phone)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(OtpRecord::from))
    }

    async fn find_by_phone_and_code(
        &self,
        phone: &str,
        code: &str,
    ) -> Result<Option<OtpRecord>, StoreError> {
        // ---
        let row = sqlx::query_as::<_, PhoneOtpRow>(
            "SELECT id, phone_number, code, created_at
             FROM phone_otps WHERE phone_number = $1 AND code = $2",
        )
        .bind(phone)
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(OtpRecord::from))
    }

    async fn insert(&self, record: &OtpRecord) -> Result<(), StoreError> {
        // ---
        sqlx::query(
            "INSERT INTO phone_otps (id, phone_number, code, created_at)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(record.id)
        .bind(&record.phone_number)
        .bind(record.code())
        .bind(record.created_at())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn reissue(&self, record: &OtpRecord) -> Result<(), StoreError> {
        // ---
        let result = sqlx::query(
            "UPDATE phone_otps SET code = $1, created_at = $2
             WHERE id = $3 AND phone_number = $4",
        )
        .bind(record.code())
        .bind(record.created_at())
        .bind(record.id)
        .bind(&record.phone_number)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Missing);
        }

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
