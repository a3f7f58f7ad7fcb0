//! Username/password sign-up and login.

use crate::domain::{
    IssuedToken, PasswordHasherPtr, StoreError, TokenIssuerPtr, UserCredential, UserStorePtr,
};
use crate::error::AuthError;

pub struct PasswordAuthFlow {
    // ---
    users: UserStorePtr,
    hasher: PasswordHasherPtr,
    tokens: TokenIssuerPtr,
}

impl PasswordAuthFlow {
    // ---
    pub fn new(users: UserStorePtr, hasher: PasswordHasherPtr, tokens: TokenIssuerPtr) -> Self {
        // ---
        Self {
            users,
            hasher,
            tokens,
        }
    }

    /// Register a new account.
    ///
    /// Usernames are unique ignoring case; the stored spelling is the one
    /// given at sign-up.
    #[tracing::instrument(skip(self, password))]
    pub async fn sign_up(&self, username: &str, password: &str) -> Result<UserCredential, AuthError> {
        // ---
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        if self.users.find_by_username(username).await?.is_some() {
            tracing::info!("Sign-up refused, username already taken");
            return Err(AuthError::UsernameTaken(username.to_string()));
        }

        let user = UserCredential::new(username.to_string(), self.hasher.hash(password));

        match self.users.insert(&user).await {
            Ok(()) => {
                tracing::info!(user_id = %user.id, "Created user");
                Ok(user)
            }
            Err(StoreError::Conflict) => Err(AuthError::UsernameTaken(username.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    /// Check a username/password pair and mint a token for the account.
    ///
    /// Unknown usernames and wrong passwords fail identically.
    #[tracing::instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<IssuedToken, AuthError> {
        // ---
        let user = self
            .users
            .find_by_username(username.trim())
            .await?
            .filter(|user| self.hasher.verify(password, &user.password_hash))
            .ok_or_else(|| {
                tracing::warn!("Invalid login attempt");
                AuthError::InvalidLogin
            })?;

        let token = self.tokens.mint(&user.username).await?;
        tracing::info!(user_id = %user.id, "Password login succeeded");

        Ok(token)
    }

    /// Create `username` with `password` unless an account with that name exists.
    ///
    /// Returns `true` when the account was created.
    pub async fn ensure_user(&self, username: &str, password: &str) -> Result<bool, AuthError> {
        // ---
        match self.sign_up(username, password).await {
            Ok(_) => Ok(true),
            Err(AuthError::UsernameTaken(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}
