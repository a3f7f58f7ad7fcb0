//! OTP code generation and expiry checks.

use super::clock::ClockPtr;
use chrono::{DateTime, Utc};
use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};
use std::sync::Mutex;

/// Number of characters in an OTP code.
pub const OTP_CODE_LEN: usize = 6;

/// Symbols an OTP code is drawn from.
pub const OTP_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Whole minutes after issuance at which a code counts as expired.
pub const OTP_EXPIRY_MINUTES: i64 = 1;

/// Produces OTP codes and judges their expiry.
///
/// The random source and the clock are both injected. The default source is
/// a general-purpose `SmallRng`, not a CSPRNG.
pub struct OtpGenerator {
    // ---
    rng: Mutex<Box<dyn RngCore + Send>>,
    clock: ClockPtr,
}

impl OtpGenerator {
    // ---
    pub fn new(rng: impl RngCore + Send + 'static, clock: ClockPtr) -> Self {
        // ---
        Self {
            rng: Mutex::new(Box::new(rng)),
            clock,
        }
    }

    /// Generator seeded from OS entropy.
    pub fn from_entropy(clock: ClockPtr) -> Self {
        // ---
        Self::new(SmallRng::from_entropy(), clock)
    }

    /// Deterministic generator for tests.
    pub fn seeded(seed: u64, clock: ClockPtr) -> Self {
        // ---
        Self::new(SmallRng::seed_from_u64(seed), clock)
    }

    /// Draw a fresh code of [`OTP_CODE_LEN`] symbols from [`OTP_ALPHABET`].
    pub fn generate_code(&self) -> String {
        // ---
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        (0..OTP_CODE_LEN)
            .map(|_| OTP_ALPHABET[rng.gen_range(0..OTP_ALPHABET.len())] as char)
            .collect()
    }

    /// True once at least one whole minute has elapsed since `created_at`.
    ///
    /// Elapsed time is truncated to whole minutes before comparing.
    pub fn is_expired(&self, created_at: DateTime<Utc>) -> bool {
        // ---
        let minutes_passed = (self.clock.now() - created_at).num_minutes();
        minutes_passed >= OTP_EXPIRY_MINUTES
    }

    /// Current time from the injected clock; stamps `created_at`.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}
