/// In-memory store
///
/// Keeps users and shipments in `RwLock`-guarded maps. Data lives only as
/// long as the process. Used when no `DATABASE_URL` is configured and by the
/// test suites.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ShipmentStore, StoreError, UserStore};
use crate::models::{shipment::Shipment, user::User};

/// Process-local implementation of [`UserStore`] and [`ShipmentStore`]
#[derive(Debug, Default)]
pub struct InMemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    shipments: RwLock<Vec<Shipment>>,
}

impl InMemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.username == user.username) {
            return Err(StoreError::Conflict("users_username_key".to_string()));
        }

        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.username == username)
            .cloned())
    }
}

#[async_trait]
impl ShipmentStore for InMemoryStore {
    async fn insert_shipment(&self, shipment: &Shipment) -> Result<(), StoreError> {
        let mut shipments = self.shipments.write().await;

        if shipments.iter().any(|s| s.id == shipment.id) {
            return Err(StoreError::Conflict("shipments_pkey".to_string()));
        }

        shipments.push(shipment.clone());
        Ok(())
    }

    async fn find_shipment(&self, id: Uuid) -> Result<Option<Shipment>, StoreError> {
        Ok(self
            .shipments
            .read()
            .await
            .iter()
            .find(|s| s.id == id)
            .cloned())
    }

    async fn list_shipments(&self, created_by: Option<Uuid>) -> Result<Vec<Shipment>, StoreError> {
        // Insertion order reversed, then a stable sort, so equal timestamps
        // still come back newest-inserted first.
        let mut shipments: Vec<Shipment> = self
            .shipments
            .read()
            .await
            .iter()
            .rev()
            .filter(|s| created_by.map_or(true, |owner| s.is_owned_by(owner)))
            .cloned()
            .collect();

        shipments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(shipments)
    }

    async fn replace_shipment(&self, shipment: &Shipment) -> Result<bool, StoreError> {
        let mut shipments = self.shipments.write().await;

        match shipments.iter_mut().find(|s| s.id == shipment.id) {
            Some(existing) => {
                *existing = shipment.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_shipment(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut shipments = self.shipments.write().await;
        let before = shipments.len();
        shipments.retain(|s| s.id != id);
        Ok(shipments.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::shipment::{CreatedBy, NewShipment};
    use chrono::Duration;

    fn shipment_for(owner: &User) -> Shipment {
        Shipment::create(
            NewShipment {
                weight_kg: Some(1.0),
                distance_km: Some(1.0),
                base_rate: Some(1.0),
                ..Default::default()
            },
            CreatedBy {
                id: owner.id,
                username: owner.username.clone(),
            },
        )
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let store = InMemoryStore::new();
        store
            .insert_user(&User::new("alice", "h1".to_string()))
            .await
            .unwrap();

        let result = store.insert_user(&User::new("alice", "h2".to_string())).await;
        assert!(matches!(result, Err(StoreError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_username_lookup_is_case_sensitive() {
        let store = InMemoryStore::new();
        store
            .insert_user(&User::new("Alice", "h".to_string()))
            .await
            .unwrap();

        assert!(store.find_user_by_username("Alice").await.unwrap().is_some());
        assert!(store.find_user_by_username("alice").await.unwrap().is_none());

        // A different case is a different user
        assert!(store
            .insert_user(&User::new("alice", "h".to_string()))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_list_orders_newest_first_and_filters() {
        let store = InMemoryStore::new();
        let alice = User::new("alice", "h".to_string());
        let bob = User::new("bob", "h".to_string());

        let mut older = shipment_for(&alice);
        older.created_at = older.created_at - Duration::minutes(5);
        let newer = shipment_for(&alice);
        let bobs = shipment_for(&bob);

        store.insert_shipment(&newer).await.unwrap();
        store.insert_shipment(&older).await.unwrap();
        store.insert_shipment(&bobs).await.unwrap();

        let all = store.list_shipments(None).await.unwrap();
        assert_eq!(all.len(), 3);
        assert!(all.windows(2).all(|w| w[0].created_at >= w[1].created_at));

        let mine = store.list_shipments(Some(alice.id)).await.unwrap();
        assert_eq!(
            mine.iter().map(|s| s.id).collect::<Vec<_>>(),
            vec![newer.id, older.id]
        );
    }

    #[tokio::test]
    async fn test_replace_and_delete_missing() {
        let store = InMemoryStore::new();
        let owner = User::new("alice", "h".to_string());
        let shipment = shipment_for(&owner);

        assert!(!store.replace_shipment(&shipment).await.unwrap());
        assert!(!store.delete_shipment(shipment.id).await.unwrap());

        store.insert_shipment(&shipment).await.unwrap();
        assert!(store.replace_shipment(&shipment).await.unwrap());
        assert!(store.delete_shipment(shipment.id).await.unwrap());
        assert!(store.find_shipment(shipment.id).await.unwrap().is_none());
    }
}
