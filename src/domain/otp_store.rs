use super::error::StoreError;
use super::otp::OtpRecord;
use std::sync::Arc;

/// Persistence boundary for OTP challenges, keyed by phone number.
///
/// Each call is atomic on its own. Nothing here locks across calls; callers
/// that read and then write must handle [`StoreError::Conflict`].
#[async_trait::async_trait]
pub trait OtpStore: Send + Sync {
    // ---
    /// Get the record for a phone number, if any.
    async fn find_by_phone(&self, phone: &str) -> Result<Option<OtpRecord>, StoreError>;

    /// Get the record matching both phone number and code exactly.
    async fn find_by_phone_and_code(
        &self,
        phone: &str,
        code: &str,
    ) -> Result<Option<OtpRecord>, StoreError>;

    /// Create a record. Fails with `Conflict` if the phone number already has one.
    async fn insert(&self, record: &OtpRecord) -> Result<(), StoreError>;

    /// Overwrite `code` and `created_at` of the stored record with the same
    /// id and phone number, in a single write. Fails with `Missing` if absent.
    async fn reissue(&self, record: &OtpRecord) -> Result<(), StoreError>;

    /// Check the backend is reachable.
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Type alias for any backend that implements OtpStore.
pub type OtpStorePtr = Arc<dyn OtpStore>;
