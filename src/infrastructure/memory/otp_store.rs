use crate::domain::{OtpRecord, OtpStore, StoreError};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::RwLock;

/// OTP records kept in a map keyed by phone number.
#[derive(Default)]
pub struct MemoryOtpStore {
    // ---
    records: RwLock<HashMap<String, OtpRecord>>,
}

impl MemoryOtpStore {
    // ---
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> StoreError {
    StoreError::backend(anyhow::anyhow!("in-memory OTP store lock poisoned"))
}

#[async_trait::async_trait]
impl OtpStore for MemoryOtpStore {
    // ---
    async fn find_by_phone(&self, phone: &str) -> Result<Option<OtpRecord>, StoreError> {
        // ---
        let records = self.records.read().map_err(|_| poisoned())?;
        Ok(records.get(phone).cloned())
    }

    async fn find_by_phone_and_code(
        &self,
        phone: &str,
        code: &str,
    ) -> Result<Option<OtpRecord>, StoreError> {
        // ---
        let records = self.records.read().map_err(|_| poisoned())?;
        Ok(records.get(phone).filter(|r| r.code() == code).cloned())
    }

    async fn insert(&self, record: &OtpRecord) -> Result<(), StoreError> {
        // ---
        let mut records = self.records.write().map_err(|_| poisoned())?;
        match records.entry(record.phone_number.clone()) {
            Entry::Occupied(_) => Err(StoreError::Conflict),
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
                Ok(())
            }
        }
    }

    async fn reissue(&self, record: &OtpRecord) -> Result<(), StoreError> {
        // ---
        let mut records = self.records.write().map_err(|_| poisoned())?;
        match records.get_mut(&record.phone_number) {
            Some(stored) if stored.id == record.id => {
                *stored = record.clone();
                Ok(())
            }
            _ => Err(StoreError::Missing),
        }
    }
}
