mod pool;
mod postgres_otp_store;
mod postgres_user_store;

pub use pool::connect_with_retry;
pub use postgres_otp_store::{create_postgres_otp_store, PostgresOtpStore};
pub use postgres_user_store::{create_postgres_user_store, PostgresUserStore};

use crate::domain::StoreError;

/// Map a sqlx error, turning unique-constraint violations into `Conflict`.
fn map_sqlx_error(err: sqlx::Error) -> StoreError {
    // ---
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return StoreError::Conflict;
        }
    }
    StoreError::backend(err)
}
