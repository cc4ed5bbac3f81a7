/// Shipment repository
///
/// Business rules for shipments on top of a [`ShipmentStore`]:
///
/// - the creator snapshot is taken from the caller's [`UserIdentity`] at
///   creation and never changes afterwards
/// - `cost` is recomputed by [`crate::pricing::compute_cost`] on every write
/// - `updated_at` is refreshed on every update
///
/// Every operation expects an already verified caller. Reads, updates and
/// deletes by ID are not restricted to the creator.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use shipsy_shared::auth::service::UserIdentity;
/// use shipsy_shared::models::shipment::NewShipment;
/// use shipsy_shared::shipments::ShipmentRepository;
/// use shipsy_shared::store::memory::InMemoryStore;
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let repo = ShipmentRepository::new(Arc::new(InMemoryStore::new()));
/// let alice = UserIdentity { id: Uuid::new_v4(), username: "alice".to_string() };
///
/// let shipment = repo
///     .create(&alice, NewShipment {
///         weight_kg: Some(10.0),
///         distance_km: Some(20.0),
///         base_rate: Some(5.0),
///         ..Default::default()
///     })
///     .await?;
/// assert_eq!(shipment.cost, 60.0);
/// # Ok(())
/// # }
/// ```

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

use crate::auth::service::UserIdentity;
use crate::models::shipment::{CreatedBy, NewShipment, Shipment, ShipmentPatch};
use crate::store::{ShipmentStore, StoreError};
use crate::validation::{collect_violations, FieldViolation};

/// Error type for shipment operations
#[derive(Debug, thiserror::Error)]
pub enum ShipmentError {
    /// Input failed validation
    #[error("Validation failed: {} errors", .0.len())]
    Validation(Vec<FieldViolation>),

    /// No shipment with the given ID
    #[error("Shipment not found")]
    NotFound,

    /// Persistence failure
    #[error(transparent)]
    Storage(#[from] StoreError),
}

/// Rejects inputs whose product overflows `f64`
fn ensure_finite_cost(shipment: &Shipment) -> Result<(), ShipmentError> {
    if shipment.cost.is_finite() {
        Ok(())
    } else {
        Err(ShipmentError::Validation(vec![FieldViolation::new(
            "cost",
            "Cost is out of range for the given weight, distance and rate",
        )]))
    }
}

/// Shipment business operations
#[derive(Clone)]
pub struct ShipmentRepository {
    store: Arc<dyn ShipmentStore>,
}

impl ShipmentRepository {
    /// Creates a repository backed by `store`
    pub fn new(store: Arc<dyn ShipmentStore>) -> Self {
        Self { store }
    }

    /// Creates a shipment owned by `identity`
    ///
    /// # Errors
    ///
    /// [`ShipmentError::Validation`] if `weightKg`, `distanceKm` or `baseRate`
    /// is missing or negative, the resulting cost is not finite, or the title
    /// is too long.
    pub async fn create(&self, identity: &UserIdentity, input: NewShipment) -> Result<Shipment, ShipmentError> {
        input
            .validate()
            .map_err(|e| ShipmentError::Validation(collect_violations(&e)))?;

        let created_by = CreatedBy {
            id: identity.id,
            username: identity.username.clone(),
        };
        let shipment = Shipment::create(input, created_by);
        ensure_finite_cost(&shipment)?;

        self.store.insert_shipment(&shipment).await?;

        info!(
            shipment_id = %shipment.id,
            user_id = %identity.id,
            cost = shipment.cost,
            "Shipment created"
        );
        Ok(shipment)
    }

    /// Fetches a shipment by ID
    pub async fn get_by_id(&self, id: Uuid) -> Result<Shipment, ShipmentError> {
        self.store
            .find_shipment(id)
            .await?
            .ok_or(ShipmentError::NotFound)
    }

    /// Lists every shipment, newest first
    pub async fn list_all(&self) -> Result<Vec<Shipment>, ShipmentError> {
        Ok(self.store.list_shipments(None).await?)
    }

    /// Lists the caller's own shipments, newest first
    pub async fn list_mine(&self, identity: &UserIdentity) -> Result<Vec<Shipment>, ShipmentError> {
        Ok(self.store.list_shipments(Some(identity.id)).await?)
    }

    /// Applies a partial update
    ///
    /// The patch type has no creator field, so ownership cannot change here.
    /// Concurrent updates to the same shipment are last-write-wins.
    pub async fn update(
        &self,
        id: Uuid,
        identity: &UserIdentity,
        patch: ShipmentPatch,
    ) -> Result<Shipment, ShipmentError> {
        patch
            .validate()
            .map_err(|e| ShipmentError::Validation(collect_violations(&e)))?;

        let mut shipment = self.get_by_id(id).await?;
        shipment.apply(patch);
        ensure_finite_cost(&shipment)?;

        if !self.store.replace_shipment(&shipment).await? {
            // Deleted between read and write
            return Err(ShipmentError::NotFound);
        }

        debug!(shipment_id = %id, user_id = %identity.id, cost = shipment.cost, "Shipment updated");
        Ok(shipment)
    }

    /// Deletes a shipment permanently
    pub async fn delete(&self, id: Uuid) -> Result<(), ShipmentError> {
        if !self.store.delete_shipment(id).await? {
            return Err(ShipmentError::NotFound);
        }

        info!(shipment_id = %id, "Shipment deleted");
        Ok(())
    }

    /// Checks that the backing store is reachable
    pub async fn ping(&self) -> Result<(), ShipmentError> {
        Ok(self.store.ping().await?)
    }
}
