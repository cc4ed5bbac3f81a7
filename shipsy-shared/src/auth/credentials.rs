/// Credential store
///
/// Owns user identities and their password verifiers. Raw passwords pass
/// through here on their way to Argon2id and are dropped immediately; only
/// the hash reaches the [`UserStore`].
///
/// Hashing and verification run on tokio's blocking pool so they do not
/// stall request handling.

use std::sync::{Arc, OnceLock};

use tracing::{debug, info};
use uuid::Uuid;

use super::password::{self, PasswordError};
use crate::models::user::User;
use crate::store::{StoreError, UserStore};

/// Error type for credential operations
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    /// Username already registered
    #[error("Username already exists")]
    DuplicateUsername,

    /// Hashing or verification failed
    #[error(transparent)]
    Password(#[from] PasswordError),

    /// Blocking hash task panicked or was cancelled
    #[error("Password task failed: {0}")]
    Task(String),

    /// Persistence failure
    #[error(transparent)]
    Storage(StoreError),
}

impl From<StoreError> for CredentialError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(_) => CredentialError::DuplicateUsername,
            other => CredentialError::Storage(other),
        }
    }
}

/// Verifier checked when the username is unknown, so both login failures cost one Argon2 pass
static DUMMY_HASH: OnceLock<String> = OnceLock::new();

fn dummy_hash() -> Result<&'static str, PasswordError> {
    if let Some(hash) = DUMMY_HASH.get() {
        return Ok(hash);
    }
    let hash = password::hash_password("shipsy-unknown-user")?;
    Ok(DUMMY_HASH.get_or_init(|| hash))
}

/// User identities and password verifiers
#[derive(Clone)]
pub struct CredentialStore {
    users: Arc<dyn UserStore>,
}

impl CredentialStore {
    /// Creates a credential store backed by `users`
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// Hashes the password and persists a new user
    ///
    /// # Errors
    ///
    /// [`CredentialError::DuplicateUsername`] if the username is taken.
    pub async fn create_user(&self, username: &str, raw_password: &str) -> Result<User, CredentialError> {
        if self.users.find_user_by_username(username).await?.is_some() {
            return Err(CredentialError::DuplicateUsername);
        }

        let raw = raw_password.to_string();
        let password_hash = tokio::task::spawn_blocking(move || password::hash_password(&raw))
            .await
            .map_err(|e| CredentialError::Task(e.to_string()))??;

        let user = User::new(username, password_hash);

        // A concurrent signup for the same name surfaces here as a conflict
        self.users.insert_user(&user).await?;

        info!(user_id = %user.id, username = %user.username, "User created");
        Ok(user)
    }

    /// Finds a user by exact username
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, CredentialError> {
        Ok(self.users.find_user_by_username(username).await?)
    }

    /// Finds a user by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, CredentialError> {
        Ok(self.users.find_user_by_id(id).await?)
    }

    /// Checks a raw password against the user's stored verifier
    pub async fn verify_password(&self, user: &User, raw_password: &str) -> Result<bool, CredentialError> {
        let raw = raw_password.to_string();
        let hash = user.password_hash.clone();

        let valid = tokio::task::spawn_blocking(move || password::verify_password(&raw, &hash))
            .await
            .map_err(|e| CredentialError::Task(e.to_string()))??;

        debug!(user_id = %user.id, valid, "Password verified");
        Ok(valid)
    }

    /// Looks up `username` and checks `raw_password` against its verifier
    ///
    /// Returns `None` for an unknown username or a wrong password. Unknown
    /// usernames are still run through Argon2 against a fixed verifier.
    pub async fn authenticate(&self, username: &str, raw_password: &str) -> Result<Option<User>, CredentialError> {
        let Some(user) = self.find_by_username(username).await? else {
            let raw = raw_password.to_string();
            tokio::task::spawn_blocking(move || password::verify_password(&raw, dummy_hash()?))
                .await
                .map_err(|e| CredentialError::Task(e.to_string()))??;

            debug!("Password checked against dummy verifier");
            return Ok(None);
        };

        if self.verify_password(&user, raw_password).await? {
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryStore;

    fn store() -> CredentialStore {
        CredentialStore::new(Arc::new(InMemoryStore::new()))
    }

    #[tokio::test]
    async fn test_create_user_stores_hash_only() {
        let credentials = store();
        let user = credentials.create_user("alice", "pw1").await.unwrap();

        assert_eq!(user.username, "alice");
        assert!(user.password_hash.starts_with("$argon2id$"));
        assert!(!user.password_hash.contains("pw1"));

        let found = credentials.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(found.id, user.id);
        assert_eq!(found.password_hash, user.password_hash);
    }

    #[tokio::test]
    async fn test_duplicate_username() {
        let credentials = store();
        credentials.create_user("alice", "pw1").await.unwrap();

        let result = credentials.create_user("alice", "other").await;
        assert!(matches!(result, Err(CredentialError::DuplicateUsername)));
    }

    #[tokio::test]
    async fn test_verify_password() {
        let credentials = store();
        let user = credentials.create_user("alice", "pw1").await.unwrap();

        assert!(credentials.verify_password(&user, "pw1").await.unwrap());
        assert!(!credentials.verify_password(&user, "pw2").await.unwrap());
    }

    #[tokio::test]
    async fn test_authenticate() {
        let credentials = store();
        let user = credentials.create_user("alice", "pw1").await.unwrap();

        let found = credentials.authenticate("alice", "pw1").await.unwrap().unwrap();
        assert_eq!(found.id, user.id);
        assert!(credentials.authenticate("alice", "pw2").await.unwrap().is_none());

        // Unknown user goes through the dummy verifier, twice to hit the cached hash
        assert!(credentials.authenticate("nobody", "pw1").await.unwrap().is_none());
        assert!(credentials.authenticate("nobody", "").await.unwrap().is_none());
        assert!(DUMMY_HASH.get().unwrap().starts_with("$argon2id$"));
    }

    #[tokio::test]
    async fn test_find_missing_user() {
        let credentials = store();
        assert!(credentials.find_by_username("nobody").await.unwrap().is_none());
        assert!(credentials.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[test]
    fn test_store_conflict_maps_to_duplicate() {
        let err = CredentialError::from(StoreError::Conflict("users_username_key".to_string()));
        assert!(matches!(err, CredentialError::DuplicateUsername));

        let err = CredentialError::from(StoreError::Backend("boom".to_string()));
        assert!(matches!(err, CredentialError::Storage(_)));
    }
}
