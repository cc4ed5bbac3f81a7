/// Authentication service
///
/// Signup, login, session token verification and profile lookup. The service
/// holds no per-session state: everything needed to verify a token is in the
/// token itself plus the signing secret passed in at construction.
///
/// # Token states
///
/// Callers see exactly two outcomes of [`AuthService::verify`]: a
/// [`UserIdentity`], or [`AuthServiceError::Unauthenticated`]. Expired,
/// forged and malformed tokens are indistinguishable from the outside.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use shipsy_shared::auth::service::{AuthService, TokenSettings};
/// use shipsy_shared::store::memory::InMemoryStore;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let auth = AuthService::new(
///     Arc::new(InMemoryStore::new()),
///     TokenSettings::new("a-very-long-signing-secret-of-32-chars"),
/// );
///
/// auth.signup("alice", "pw1").await?;
/// let session = auth.login("alice", "pw1").await?;
/// let identity = auth.verify(&session.token)?;
/// assert_eq!(identity.username, "alice");
/// # Ok(())
/// # }
/// ```

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;
use validator::Validate;

use super::credentials::{CredentialError, CredentialStore};
use super::jwt::{self, Claims, JwtError};
use crate::models::user::{Profile, User};
use crate::store::{StoreError, UserStore};
use crate::validation::{collect_violations, FieldViolation};

/// Default session lifetime
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

/// Error type for authentication operations
#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    /// Signup input failed validation
    #[error("Validation failed: {} errors", .0.len())]
    Validation(Vec<FieldViolation>),

    /// Username already registered
    #[error("Username already exists")]
    DuplicateUsername,

    /// Unknown user or wrong password (deliberately not distinguished)
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Token missing, malformed, forged or expired
    #[error("Unauthenticated")]
    Unauthenticated,

    /// User referenced by a valid token no longer exists
    #[error("User not found")]
    NotFound,

    /// Persistence failure
    #[error(transparent)]
    Storage(#[from] StoreError),

    /// Hashing or signing failure
    #[error("Internal authentication error: {0}")]
    Internal(String),
}

impl From<CredentialError> for AuthServiceError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::DuplicateUsername => AuthServiceError::DuplicateUsername,
            CredentialError::Storage(e) => AuthServiceError::Storage(e),
            CredentialError::Password(e) => AuthServiceError::Internal(e.to_string()),
            CredentialError::Task(e) => AuthServiceError::Internal(e),
        }
    }
}

/// Signing configuration for session tokens
///
/// Built once at startup; never mutated afterwards.
#[derive(Clone)]
pub struct TokenSettings {
    secret: Arc<str>,
    ttl: Duration,
}

impl TokenSettings {
    /// Settings with the default 24h lifetime
    pub fn new(secret: impl Into<String>) -> Self {
        Self::with_ttl(secret, Duration::hours(DEFAULT_TOKEN_TTL_HOURS))
    }

    /// Settings with a custom lifetime
    pub fn with_ttl(secret: impl Into<String>, ttl: Duration) -> Self {
        Self {
            secret: Arc::from(secret.into()),
            ttl,
        }
    }

    /// Session lifetime
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl std::fmt::Debug for TokenSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSettings")
            .field("secret", &"<redacted>")
            .field("ttl", &self.ttl)
            .finish()
    }
}

/// Identity of the caller, established by [`AuthService::verify`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    /// User ID
    pub id: Uuid,

    /// Username as of login
    pub username: String,
}

impl From<&User> for UserIdentity {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
        }
    }
}

/// Signed session token returned by login
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedToken {
    /// Opaque token to send back on every request
    pub token: String,

    /// When the token stops being accepted
    pub expires_at: DateTime<Utc>,
}

/// Signup input
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Credentials {
    #[validate(length(min = 1, max = 64, message = "Username must be 1-64 characters"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    credentials: CredentialStore,
    tokens: TokenSettings,
}

impl AuthService {
    /// Creates the service over a user store and signing settings
    pub fn new(users: Arc<dyn UserStore>, tokens: TokenSettings) -> Self {
        Self {
            credentials: CredentialStore::new(users),
            tokens,
        }
    }

    /// Registers a new user
    ///
    /// # Errors
    ///
    /// - [`AuthServiceError::Validation`]: empty or whitespace-only field,
    ///   or a username longer than 64 characters
    /// - [`AuthServiceError::DuplicateUsername`]: name already taken
    pub async fn signup(&self, username: &str, password: &str) -> Result<User, AuthServiceError> {
        let input = Credentials {
            username: username.to_string(),
            password: password.to_string(),
        };

        let mut violations = match input.validate() {
            Ok(()) => Vec::new(),
            Err(e) => collect_violations(&e),
        };
        if !username.is_empty() && username.trim().is_empty() {
            violations.push(FieldViolation::new("username", "Username must not be blank"));
        }
        if !violations.is_empty() {
            return Err(AuthServiceError::Validation(violations));
        }

        let user = self.credentials.create_user(username, password).await.map_err(|e| {
            if matches!(e, CredentialError::DuplicateUsername) {
                debug!(username = %username, "Signup rejected: username taken");
            }
            AuthServiceError::from(e)
        })?;

        Ok(user)
    }

    /// Checks credentials and issues a session token
    ///
    /// Unknown usernames and wrong passwords both yield
    /// [`AuthServiceError::InvalidCredentials`].
    pub async fn login(&self, username: &str, password: &str) -> Result<SignedToken, AuthServiceError> {
        let Some(user) = self.credentials.authenticate(username, password).await? else {
            warn!("Login failed: invalid credentials");
            return Err(AuthServiceError::InvalidCredentials);
        };

        let session = self.issue_token(&user)?;
        info!(user_id = %user.id, expires_at = %session.expires_at, "User logged in");
        Ok(session)
    }

    /// Signs a fresh session token for `user`
    pub fn issue_token(&self, user: &User) -> Result<SignedToken, AuthServiceError> {
        let claims = Claims::new(user.id, user.username.clone(), self.tokens.ttl);
        let token = jwt::create_token(&claims, &self.tokens.secret)
            .map_err(|e| AuthServiceError::Internal(e.to_string()))?;

        Ok(SignedToken {
            token,
            expires_at: claims.expires_at(),
        })
    }

    /// Verifies a session token
    ///
    /// Purely cryptographic: checks signature, issuer and expiry against the
    /// configured secret without touching the store.
    pub fn verify(&self, token: &str) -> Result<UserIdentity, AuthServiceError> {
        let claims = jwt::validate_token(token, &self.tokens.secret).map_err(|e| {
            match e {
                JwtError::Expired => debug!("Rejected expired token"),
                other => debug!(error = %other, "Rejected invalid token"),
            }
            AuthServiceError::Unauthenticated
        })?;

        Ok(UserIdentity {
            id: claims.sub,
            username: claims.username,
        })
    }

    /// Looks up the caller's profile
    pub async fn fetch_profile(&self, identity: &UserIdentity) -> Result<Profile, AuthServiceError> {
        let user = self
            .credentials
            .find_by_id(identity.id)
            .await?
            .ok_or(AuthServiceError::NotFound)?;

        Ok(Profile::from(&user))
    }
}
