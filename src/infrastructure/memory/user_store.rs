use crate::domain::{StoreError, UserCredential, UserStore};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::RwLock;

/// Users kept in a map keyed by lowercased username.
#[derive(Default)]
pub struct MemoryUserStore {
    // ---
    users: RwLock<HashMap<String, UserCredential>>,
}

impl MemoryUserStore {
    // ---
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> StoreError {
    StoreError::backend(anyhow::anyhow!("in-memory user store lock poisoned"))
}

#[async_trait::async_trait]
impl UserStore for MemoryUserStore {
    // ---
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserCredential>, StoreError> {
        // ---
        let users = self.users.read().map_err(|_| poisoned())?;
        Ok(users.get(&username.to_lowercase()).cloned())
    }

    async fn insert(&self, user: &UserCredential) -> Result<(), StoreError> {
        // ---
        let mut users = self.users.write().map_err(|_| poisoned())?;
        match users.entry(user.username.to_lowercase()) {
            Entry::Occupied(_) => Err(StoreError::Conflict),
            Entry::Vacant(slot) => {
                slot.insert(user.clone());
                Ok(())
            }
        }
    }
}
