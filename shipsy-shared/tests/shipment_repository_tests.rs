/// Integration tests for the auth service and shipment repository
///
/// Runs against the in-memory store, so no external services are needed.

use std::sync::Arc;

use shipsy_shared::auth::service::{AuthService, AuthServiceError, TokenSettings, UserIdentity};
use shipsy_shared::models::shipment::{NewShipment, ShipmentPatch, ShipmentStatus};
use shipsy_shared::pricing::compute_cost;
use shipsy_shared::shipments::{ShipmentError, ShipmentRepository};
use shipsy_shared::store::memory::InMemoryStore;

const SECRET: &str = "integration-test-secret-at-least-32-chars";

fn services() -> (AuthService, ShipmentRepository) {
    let store = Arc::new(InMemoryStore::new());
    let auth = AuthService::new(store.clone(), TokenSettings::new(SECRET));
    let shipments = ShipmentRepository::new(store);
    (auth, shipments)
}

async fn sign_in(auth: &AuthService, username: &str, password: &str) -> UserIdentity {
    auth.signup(username, password).await.expect("signup failed");
    let token = auth.login(username, password).await.expect("login failed");
    auth.verify(&token.token).expect("token rejected")
}

fn input(title: &str, weight_kg: f64, distance_km: f64, base_rate: f64) -> NewShipment {
    NewShipment {
        title: Some(title.to_string()),
        weight_kg: Some(weight_kg),
        distance_km: Some(distance_km),
        base_rate: Some(base_rate),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_signup_login_create_list_update_delete() {
    let (auth, shipments) = services();
    let alice = sign_in(&auth, "alice", "pw1").await;

    let created = shipments
        .create(&alice, input("Box", 10.0, 20.0, 5.0))
        .await
        .unwrap();
    assert_eq!(created.cost, 60.0);
    assert_eq!(created.status, ShipmentStatus::New);
    assert!(!created.fragile);
    assert_eq!(created.created_by.username, "alice");

    let mine = shipments.list_mine(&alice).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].id, created.id);

    let updated = shipments
        .update(
            created.id,
            &alice,
            ShipmentPatch {
                distance_km: Some(40.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.cost, 70.0);
    assert!(updated.updated_at >= created.updated_at);
    assert_eq!(updated.created_at, created.created_at);

    shipments.delete(created.id).await.unwrap();
    assert!(matches!(
        shipments.get_by_id(created.id).await,
        Err(ShipmentError::NotFound)
    ));
}

#[tokio::test]
async fn test_cost_holds_after_every_write() {
    let (auth, shipments) = services();
    let alice = sign_in(&auth, "alice", "pw1").await;

    let created = shipments
        .create(&alice, input("Crate", 3.5, 12.0, 2.25))
        .await
        .unwrap();
    assert_eq!(created.cost, compute_cost(3.5, 12.0, 2.25));

    let patches = vec![
        ShipmentPatch {
            weight_kg: Some(0.0),
            ..Default::default()
        },
        ShipmentPatch {
            base_rate: Some(9.0),
            status: Some(ShipmentStatus::InTransit),
            ..Default::default()
        },
        ShipmentPatch {
            title: Some("Renamed".to_string()),
            ..Default::default()
        },
    ];

    for patch in patches {
        let updated = shipments.update(created.id, &alice, patch).await.unwrap();
        assert_eq!(
            updated.cost,
            compute_cost(updated.weight_kg, updated.distance_km, updated.base_rate)
        );

        let stored = shipments.get_by_id(created.id).await.unwrap();
        assert_eq!(stored, updated);
    }
}

#[tokio::test]
async fn test_creator_never_changes() {
    let (auth, shipments) = services();
    let alice = sign_in(&auth, "alice", "pw1").await;
    let bob = sign_in(&auth, "bob", "pw2").await;

    let created = shipments
        .create(&alice, input("Box", 1.0, 1.0, 1.0))
        .await
        .unwrap();

    let updated = shipments
        .update(
            created.id,
            &bob,
            ShipmentPatch {
                status: Some(ShipmentStatus::Delivered),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.status, ShipmentStatus::Delivered);
    assert_eq!(updated.created_by, created.created_by);
    assert!(updated.is_owned_by(alice.id));
    assert!(!updated.is_owned_by(bob.id));
}

#[tokio::test]
async fn test_list_mine_is_subset_of_all_in_order() {
    let (auth, shipments) = services();
    let alice = sign_in(&auth, "alice", "pw1").await;
    let bob = sign_in(&auth, "bob", "pw2").await;

    for (owner, title) in [(&alice, "a1"), (&bob, "b1"), (&alice, "a2"), (&bob, "b2"), (&alice, "a3")] {
        shipments.create(owner, input(title, 1.0, 1.0, 1.0)).await.unwrap();
    }

    let all = shipments.list_all().await.unwrap();
    let mine = shipments.list_mine(&alice).await.unwrap();

    assert_eq!(all.len(), 5);
    assert_eq!(mine.len(), 3);
    assert!(mine.iter().all(|s| s.created_by.id == alice.id));

    let titles: Vec<_> = mine.iter().filter_map(|s| s.title.as_deref()).collect();
    assert_eq!(titles, vec!["a3", "a2", "a1"]);

    // Same relative order as the full listing
    let filtered: Vec<_> = all
        .iter()
        .filter(|s| s.created_by.id == alice.id)
        .map(|s| s.id)
        .collect();
    let mine_ids: Vec<_> = mine.iter().map(|s| s.id).collect();
    assert_eq!(filtered, mine_ids);

    for pair in all.windows(2) {
        assert!(pair[0].created_at >= pair[1].created_at);
    }
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let (auth, _) = services();
    auth.signup("alice", "pw1").await.unwrap();

    let wrong_password = auth.login("alice", "nope").await.unwrap_err();
    let unknown_user = auth.login("mallory", "pw1").await.unwrap_err();

    assert!(matches!(wrong_password, AuthServiceError::InvalidCredentials));
    assert!(matches!(unknown_user, AuthServiceError::InvalidCredentials));
    assert_eq!(wrong_password.to_string(), unknown_user.to_string());
}

#[tokio::test]
async fn test_token_from_other_deployment_is_rejected() {
    let store = Arc::new(InMemoryStore::new());
    let ours = AuthService::new(store.clone(), TokenSettings::new(SECRET));
    let theirs = AuthService::new(store, TokenSettings::new("a-different-secret-also-32-chars-long"));

    ours.signup("alice", "pw1").await.unwrap();
    let token = theirs.login("alice", "pw1").await.unwrap();

    assert!(matches!(
        ours.verify(&token.token),
        Err(AuthServiceError::Unauthenticated)
    ));
}
