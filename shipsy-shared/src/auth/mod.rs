/// Authentication
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: HS256 session token signing and validation
/// - [`credentials`]: user identities and password verifiers
/// - [`service`]: signup, login, token verification, profile lookup
///
/// # Example
///
/// ```no_run
/// use chrono::Duration;
/// use shipsy_shared::auth::password::{hash_password, verify_password};
/// use shipsy_shared::auth::jwt::{create_token, validate_token, Claims};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let claims = Claims::new(Uuid::new_v4(), "alice", Duration::hours(24));
/// let token = create_token(&claims, "secret-key")?;
/// validate_token(&token, "secret-key")?;
/// # Ok(())
/// # }
/// ```

pub mod credentials;
pub mod jwt;
pub mod password;
pub mod service;
