//! Per-phone-number async mutual exclusion.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// A map of async mutexes keyed by phone number.
///
/// Entries are created on first use and dropped once nobody holds or waits
/// on them, including waiters whose future is cancelled before acquiring.
#[derive(Default)]
pub struct PhoneLocks {
    // ---
    inner: Mutex<HashMap<String, Slot>>,
}

struct Slot {
    mutex: Arc<AsyncMutex<()>>,
    /// Holders plus queued waiters.
    users: usize,
}

/// Counts one caller against a slot until dropped, whether it got the lock or not.
struct Registration<'a> {
    locks: &'a PhoneLocks,
    phone: String,
}

/// Held for the duration of a critical section on one phone number.
pub struct PhoneLockGuard<'a> {
    // ---
    // Field order matters: the mutex is released before the slot is unregistered.
    _guard: OwnedMutexGuard<()>,
    _registration: Registration<'a>,
}

impl PhoneLocks {
    // ---
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until no other caller holds the lock for `phone`.
    ///
    /// Dropping the returned future before it resolves unregisters the caller.
    pub async fn lock(&self, phone: &str) -> PhoneLockGuard<'_> {
        // ---
        let (mutex, registration) = {
            let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            let slot = map.entry(phone.to_string()).or_insert_with(|| Slot {
                mutex: Arc::default(),
                users: 0,
            });
            slot.users += 1;

            let registration = Registration {
                locks: self,
                phone: phone.to_string(),
            };
            (slot.mutex.clone(), registration)
        };

        let guard = mutex.lock_owned().await;

        PhoneLockGuard {
            _guard: guard,
            _registration: registration,
        }
    }

    /// Number of phones currently holding or awaiting a lock.
    pub fn active(&self) -> usize {
        // ---
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

impl Drop for Registration<'_> {
    fn drop(&mut self) {
        // ---
        let mut map = self.locks.inner.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(slot) = map.get_mut(&self.phone) {
            slot.users = slot.users.saturating_sub(1);
            if slot.users == 0 {
                map.remove(&self.phone);
            }
        }
    }
}
