//! Phone OTP login: request a code, then redeem it for a bearer token.

use super::phone_locks::PhoneLocks;
use crate::domain::{
    is_valid_phone, IssuedToken, OtpGenerator, OtpIssue, OtpRecord, OtpStorePtr, StoreError,
    TokenIssuerPtr,
};
use crate::error::AuthError;
use std::sync::Arc;

/// Orchestrates phone validation, the OTP store, code generation and token
/// minting into the two phone login operations.
pub struct OtpAuthFlow {
    // ---
    store: OtpStorePtr,
    generator: Arc<OtpGenerator>,
    tokens: TokenIssuerPtr,
    locks: PhoneLocks,
}

impl OtpAuthFlow {
    // ---
    pub fn new(store: OtpStorePtr, generator: Arc<OtpGenerator>, tokens: TokenIssuerPtr) -> Self {
        // ---
        Self {
            store,
            generator,
            tokens,
            locks: PhoneLocks::new(),
        }
    }

    /// Hand out a code for `phone`.
    ///
    /// # Flow
    /// 1. Reject malformed phone numbers before touching the store
    /// 2. Serialize with other requests for the same phone
    /// 3. No record: create one (`Issued`)
    /// 4. Expired record: replace code and timestamp in place (`Reissued`)
    /// 5. Live record: return it untouched (`Reused`)
    ///
    /// A `Conflict` on insert means another process created the record
    /// between our read and write; the record is re-read and handled as
    /// existing.
    #[tracing::instrument(skip(self))]
    pub async fn request_code(&self, phone: &str) -> Result<OtpIssue, AuthError> {
        // ---
        if !is_valid_phone(phone) {
            tracing::warn!("Rejected OTP request for malformed phone number");
            return Err(AuthError::InvalidPhone);
        }

        let _guard = self.locks.lock(phone).await;

        let existing = match self.store.find_by_phone(phone).await? {
            Some(record) => record,
            None => {
                let record = OtpRecord::new(
                    phone.to_string(),
                    self.generator.generate_code(),
                    self.generator.now(),
                );

                match self.store.insert(&record).await {
                    Ok(()) => {
                        tracing::info!("Issued new OTP");
                        return Ok(OtpIssue::Issued {
                            code: record.code().to_string(),
                        });
                    }
                    Err(StoreError::Conflict) => {
                        tracing::debug!("OTP record created concurrently, re-reading");
                        self.store.find_by_phone(phone).await?.ok_or_else(|| {
                            StoreError::backend(anyhow::anyhow!(
                                "OTP record vanished after insert conflict"
                            ))
                        })?
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        };

        if self.generator.is_expired(existing.created_at()) {
            let record = existing.reissue(self.generator.generate_code(), self.generator.now());
            self.store.reissue(&record).await?;

            tracing::info!("Reissued expired OTP");
            return Ok(OtpIssue::Reissued {
                code: record.code().to_string(),
            });
        }

        tracing::info!("Existing OTP still live, reusing it");
        Ok(OtpIssue::Reused {
            code: existing.code().to_string(),
        })
    }

    /// Exchange a (phone, code) pair for a bearer token.
    ///
    /// A redeemed code is left in the store and stays usable until it
    /// expires or is reissued.
    #[tracing::instrument(skip(self, code))]
    pub async fn redeem_code(&self, phone: &str, code: &str) -> Result<IssuedToken, AuthError> {
        // ---
        if !is_valid_phone(phone) {
            tracing::warn!("Rejected OTP redemption for malformed phone number");
            return Err(AuthError::InvalidPhone);
        }

        let record = self
            .store
            .find_by_phone_and_code(phone, code)
            .await?
            .ok_or_else(|| {
                tracing::warn!("No OTP record matches phone and code");
                AuthError::InvalidOtp
            })?;

        if self.generator.is_expired(record.created_at()) {
            tracing::warn!("OTP presented after expiry");
            return Err(AuthError::ExpiredOtp);
        }

        let token = self.tokens.mint(&record.phone_number).await?;
        tracing::info!("OTP redeemed, token issued");

        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::domain::{Clock, ManualClock, OtpStore, TokenIssuer, OTP_ALPHABET, OTP_CODE_LEN};
    use crate::infrastructure::MemoryOtpStore;
    use chrono::{Duration, Utc};
    use std::sync::atomic::{AtomicUsize, Ordering};

    const PHONE: &str = "5551234567";

    /// Counts mints and hands back a predictable token.
    #[derive(Default)]
    struct CountingIssuer {
        minted: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl TokenIssuer for CountingIssuer {
        async fn mint(&self, subject: &str) -> anyhow::Result<IssuedToken> {
            let n = self.minted.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(IssuedToken {
                token: format!("token-{subject}-{n}"),
                expires_at: Utc::now() + Duration::minutes(1),
            })
        }
    }

    /// Store whose every operation fails.
    struct BrokenStore;

    #[async_trait::async_trait]
    impl OtpStore for BrokenStore {
        async fn find_by_phone(&self, _: &str) -> Result<Option<OtpRecord>, StoreError> {
            Err(StoreError::backend(anyhow::anyhow!("connection refused")))
        }
        async fn find_by_phone_and_code(
            &self,
            _: &str,
            _: &str,
        ) -> Result<Option<OtpRecord>, StoreError> {
            Err(StoreError::backend(anyhow::anyhow!("connection refused")))
        }
        async fn insert(&self, _: &OtpRecord) -> Result<(), StoreError> {
            Err(StoreError::backend(anyhow::anyhow!("connection refused")))
        }
        async fn reissue(&self, _: &OtpRecord) -> Result<(), StoreError> {
            Err(StoreError::backend(anyhow::anyhow!("connection refused")))
        }
    }

    /// Store that reports "no record" on the first lookup but already holds
    /// one, as if a second process inserted it in between.
    struct RacingStore {
        inner: MemoryOtpStore,
        lookups: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl OtpStore for RacingStore {
        async fn find_by_phone(&self, phone: &str) -> Result<Option<OtpRecord>, StoreError> {
            if self.lookups.fetch_add(1, Ordering::SeqCst) == 0 {
                return Ok(None);
            }
            self.inner.find_by_phone(phone).await
        }
        async fn find_by_phone_and_code(
            &self,
            phone: &str,
            code: &str,
        ) -> Result<Option<OtpRecord>, StoreError> {
            self.inner.find_by_phone_and_code(phone, code).await
        }
        async fn insert(&self, record: &OtpRecord) -> Result<(), StoreError> {
            self.inner.insert(record).await
        }
        async fn reissue(&self, record: &OtpRecord) -> Result<(), StoreError> {
            self.inner.reissue(record).await
        }
    }

    struct Fixture {
        flow: OtpAuthFlow,
        store: Arc<MemoryOtpStore>,
        clock: Arc<ManualClock>,
        issuer: Arc<CountingIssuer>,
    }

    fn fixture() -> Fixture {
        // ---
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let store = Arc::new(MemoryOtpStore::new());
        let issuer = Arc::new(CountingIssuer::default());
        let generator = Arc::new(OtpGenerator::seeded(1234, clock.clone()));
        let flow = OtpAuthFlow::new(store.clone(), generator, issuer.clone());

        Fixture {
            flow,
            store,
            clock,
            issuer,
        }
    }

    #[tokio::test]
    async fn first_request_issues_one_record() {
        // ---
        let fx = fixture();

        let issue = fx.flow.request_code(PHONE).await.unwrap();
        assert!(issue.is_new());
        assert_eq!(issue.code().len(), OTP_CODE_LEN);
        assert!(issue.code().bytes().all(|b| OTP_ALPHABET.contains(&b)));

        assert_eq!(fx.store.len(), 1);
        let stored = fx.store.find_by_phone(PHONE).await.unwrap().unwrap();
        assert_eq!(stored.code(), issue.code());
        assert_eq!(stored.created_at(), fx.clock.now());
    }

    #[tokio::test]
    async fn live_record_is_reused_unchanged() {
        // ---
        let fx = fixture();
        let first = fx.flow.request_code(PHONE).await.unwrap();
        let before = fx.store.find_by_phone(PHONE).await.unwrap().unwrap();

        fx.clock.advance(Duration::seconds(30));
        let second = fx.flow.request_code(PHONE).await.unwrap();

        assert!(second.is_reused());
        assert_eq!(second.code(), first.code());
        let after = fx.store.find_by_phone(PHONE).await.unwrap().unwrap();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn expired_record_is_reissued_in_place() {
        // ---
        let fx = fixture();
        let first = fx.flow.request_code(PHONE).await.unwrap();
        let before = fx.store.find_by_phone(PHONE).await.unwrap().unwrap();

        fx.clock.advance(Duration::minutes(2));
        let second = fx.flow.request_code(PHONE).await.unwrap();

        assert!(!second.is_new());
        assert!(!second.is_reused());
        assert_ne!(second.code(), first.code());

        let after = fx.store.find_by_phone(PHONE).await.unwrap().unwrap();
        assert_eq!(after.id, before.id);
        assert_eq!(after.code(), second.code());
        assert_eq!(after.created_at(), fx.clock.now());
        assert_eq!(fx.store.len(), 1);
    }

    #[tokio::test]
    async fn malformed_phone_never_touches_store() {
        // ---
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let flow = OtpAuthFlow::new(
            Arc::new(BrokenStore),
            Arc::new(OtpGenerator::seeded(1, clock)),
            Arc::new(CountingIssuer::default()),
        );

        for phone in ["+15551234567", "555123456", "555-123-456", "55512345ab"] {
            assert!(matches!(
                flow.request_code(phone).await,
                Err(AuthError::InvalidPhone)
            ));
            assert!(matches!(
                flow.redeem_code(phone, "ABC123").await,
                Err(AuthError::InvalidPhone)
            ));
        }
    }

    #[tokio::test]
    async fn store_failures_propagate() {
        // ---
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let issuer = Arc::new(CountingIssuer::default());
        let flow = OtpAuthFlow::new(
            Arc::new(BrokenStore),
            Arc::new(OtpGenerator::seeded(1, clock)),
            issuer.clone(),
        );

        assert!(matches!(
            flow.request_code(PHONE).await,
            Err(AuthError::Store(StoreError::Backend(_)))
        ));
        assert!(matches!(
            flow.redeem_code(PHONE, "ABC123").await,
            Err(AuthError::Store(StoreError::Backend(_)))
        ));
        assert_eq!(issuer.minted.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn insert_conflict_rereads_existing_record() {
        // ---
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let inner = MemoryOtpStore::new();
        let theirs = OtpRecord::new(PHONE.to_string(), "THEIRS".to_string(), clock.now());
        inner.insert(&theirs).await.unwrap();

        let store = Arc::new(RacingStore {
            inner,
            lookups: AtomicUsize::new(0),
        });
        let flow = OtpAuthFlow::new(
            store,
            Arc::new(OtpGenerator::seeded(1, clock)),
            Arc::new(CountingIssuer::default()),
        );

        let issue = flow.request_code(PHONE).await.unwrap();
        assert_eq!(issue, OtpIssue::Reused { code: "THEIRS".to_string() });
    }

    #[tokio::test]
    async fn concurrent_first_requests_share_one_record() {
        // ---
        let fx = Arc::new(fixture());

        let mut tasks = Vec::new();
        for _ in 0..10 {
            let fx = fx.clone();
            tasks.push(tokio::spawn(async move { fx.flow.request_code(PHONE).await }));
        }

        let mut codes = std::collections::HashSet::new();
        let mut issued = 0;
        for task in tasks {
            let issue = task.await.unwrap().unwrap();
            if issue.is_new() {
                issued += 1;
            }
            codes.insert(issue.code().to_string());
        }

        assert_eq!(issued, 1);
        assert_eq!(codes.len(), 1);
        assert_eq!(fx.store.len(), 1);
    }

    #[tokio::test]
    async fn redeem_unknown_pair_fails_without_minting() {
        // ---
        let fx = fixture();
        let issue = fx.flow.request_code(PHONE).await.unwrap();
        let wrong = if issue.code() == "AAAAAA" { "BBBBBB" } else { "AAAAAA" };

        assert!(matches!(
            fx.flow.redeem_code(PHONE, wrong).await,
            Err(AuthError::InvalidOtp)
        ));
        assert!(matches!(
            fx.flow.redeem_code("5559876543", issue.code()).await,
            Err(AuthError::InvalidOtp)
        ));
        assert_eq!(fx.issuer.minted.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn redeem_expired_pair_fails_without_minting() {
        // ---
        let fx = fixture();
        let issue = fx.flow.request_code(PHONE).await.unwrap();

        fx.clock.advance(Duration::seconds(61));
        assert!(matches!(
            fx.flow.redeem_code(PHONE, issue.code()).await,
            Err(AuthError::ExpiredOtp)
        ));
        assert_eq!(fx.issuer.minted.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn redeem_live_pair_returns_token_and_leaves_record() {
        // ---
        let fx = fixture();
        let issue = fx.flow.request_code(PHONE).await.unwrap();

        let token = fx.flow.redeem_code(PHONE, issue.code()).await.unwrap();
        assert_eq!(token.token, format!("token-{PHONE}-1"));

        // Still redeemable until expiry.
        let again = fx.flow.redeem_code(PHONE, issue.code()).await.unwrap();
        assert_eq!(again.token, format!("token-{PHONE}-2"));
        assert!(fx.store.find_by_phone(PHONE).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn request_reuse_reissue_redeem_scenario() {
        // ---
        let fx = fixture();

        let c1 = fx.flow.request_code(PHONE).await.unwrap();
        assert!(c1.is_new());

        let again = fx.flow.request_code(PHONE).await.unwrap();
        assert_eq!(again, OtpIssue::Reused { code: c1.code().to_string() });

        fx.clock.advance(Duration::minutes(2));
        let c2 = fx.flow.request_code(PHONE).await.unwrap();
        assert!(matches!(c2, OtpIssue::Reissued { .. }));
        assert_ne!(c2.code(), c1.code());

        // C1 was overwritten, so it no longer matches any record.
        assert!(matches!(
            fx.flow.redeem_code(PHONE, c1.code()).await,
            Err(AuthError::InvalidOtp)
        ));

        let token = fx.flow.redeem_code(PHONE, c2.code()).await.unwrap();
        assert!(!token.token.is_empty());
    }
}
