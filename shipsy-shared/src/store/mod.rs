/// Persistence ports and adapters
///
/// Domain services talk to storage only through the [`UserStore`] and
/// [`ShipmentStore`] traits. Two adapters are provided:
///
/// - [`postgres::PgStore`]: PostgreSQL via sqlx (production)
/// - [`memory::InMemoryStore`]: process-local maps (development and tests)
///
/// Adapters serialize conflicting writes at the record level only; two
/// concurrent updates to the same shipment resolve last-write-wins.
///
/// # Example
///
/// ```
/// use shipsy_shared::store::{memory::InMemoryStore, UserStore};
/// use shipsy_shared::models::user::User;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = InMemoryStore::new();
/// store.insert_user(&User::new("alice", "$argon2id$...".to_string())).await?;
/// assert!(store.find_user_by_username("alice").await?.is_some());
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{shipment::Shipment, user::User};

pub mod memory;
pub mod postgres;

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A uniqueness constraint was violated
    #[error("Conflict on {0}")]
    Conflict(String),

    /// Backend failure (connection, query, serialization)
    #[error("Storage backend error: {0}")]
    Backend(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                let constraint = db_err.constraint().unwrap_or("unique constraint");
                return StoreError::Conflict(constraint.to_string());
            }
        }

        StoreError::Backend(err.to_string())
    }
}

/// User persistence
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a new user
    ///
    /// Returns [`StoreError::Conflict`] if the username is taken.
    async fn insert_user(&self, user: &User) -> Result<(), StoreError>;

    /// Finds a user by ID
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Finds a user by exact (case-sensitive) username
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;
}

/// Shipment persistence
#[async_trait]
pub trait ShipmentStore: Send + Sync {
    /// Inserts a new shipment
    async fn insert_shipment(&self, shipment: &Shipment) -> Result<(), StoreError>;

    /// Finds a shipment by ID
    async fn find_shipment(&self, id: Uuid) -> Result<Option<Shipment>, StoreError>;

    /// Lists shipments newest first, optionally restricted to one creator
    async fn list_shipments(&self, created_by: Option<Uuid>) -> Result<Vec<Shipment>, StoreError>;

    /// Overwrites a stored shipment
    ///
    /// Returns false if no shipment with that ID exists.
    async fn replace_shipment(&self, shipment: &Shipment) -> Result<bool, StoreError>;

    /// Deletes a shipment
    ///
    /// Returns false if no shipment with that ID exists.
    async fn delete_shipment(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Checks that the backend is reachable
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
