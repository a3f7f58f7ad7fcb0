use super::error::StoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// A username / password-hash pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCredential {
    // ---
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl UserCredential {
    // ---
    pub fn new(username: String, password_hash: String) -> Self {
        // ---
        Self {
            id: Uuid::new_v4(),
            username,
            password_hash,
            created_at: Utc::now(),
        }
    }
}

/// Persistence for user credentials. Usernames compare case-insensitively.
#[async_trait::async_trait]
pub trait UserStore: Send + Sync {
    // ---
    /// Get a user by username, ignoring case.
    async fn find_by_username(&self, username: &str)
        -> Result<Option<UserCredential>, StoreError>;

    /// Save a new user. Fails with `Conflict` if the username is taken.
    async fn insert(&self, user: &UserCredential) -> Result<(), StoreError>;

    /// Check the backend is reachable.
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Type alias for any backend that implements UserStore.
pub type UserStorePtr = Arc<dyn UserStore>;

/// One-way password hashing.
pub trait PasswordHasher: Send + Sync {
    // ---
    fn hash(&self, password: &str) -> String;

    fn verify(&self, password: &str, hash: &str) -> bool {
        self.hash(password) == hash
    }
}

/// Type alias for any implementation of PasswordHasher.
pub type PasswordHasherPtr = Arc<dyn PasswordHasher>;
