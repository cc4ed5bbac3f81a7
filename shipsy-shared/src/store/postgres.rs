/// PostgreSQL store
///
/// Implements the store ports on top of a sqlx connection pool. Schema is
/// created by the migrations in `shipsy-shared/migrations/` (see
/// [`crate::db::migrations::run_migrations`]).
///
/// # Example
///
/// ```no_run
/// use shipsy_shared::db::pool::{create_pool, DatabaseConfig};
/// use shipsy_shared::store::postgres::PgStore;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig {
///     url: std::env::var("DATABASE_URL")?,
///     ..Default::default()
/// })
/// .await?;
///
/// let store = PgStore::new(pool);
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{ShipmentStore, StoreError, UserStore};
use crate::db::pool;
use crate::models::{
    shipment::{Shipment, ShipmentRow},
    user::User,
};

/// PostgreSQL implementation of [`UserStore`] and [`ShipmentStore`]
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wraps an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets the underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, password_hash, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}

#[async_trait]
impl ShipmentStore for PgStore {
    async fn insert_shipment(&self, shipment: &Shipment) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO shipments (
                id, title, created_by_id, created_by_username, status, fragile,
                weight_kg, distance_km, base_rate, cost, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(shipment.id)
        .bind(&shipment.title)
        .bind(shipment.created_by.id)
        .bind(&shipment.created_by.username)
        .bind(shipment.status)
        .bind(shipment.fragile)
        .bind(shipment.weight_kg)
        .bind(shipment.distance_km)
        .bind(shipment.base_rate)
        .bind(shipment.cost)
        .bind(shipment.created_at)
        .bind(shipment.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_shipment(&self, id: Uuid) -> Result<Option<Shipment>, StoreError> {
        let row = sqlx::query_as::<_, ShipmentRow>(
            r#"
            SELECT id, title, created_by_id, created_by_username, status, fragile,
                   weight_kg, distance_km, base_rate, cost, created_at, updated_at
            FROM shipments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Shipment::from))
    }

    async fn list_shipments(&self, created_by: Option<Uuid>) -> Result<Vec<Shipment>, StoreError> {
        let rows = sqlx::query_as::<_, ShipmentRow>(
            r#"
            SELECT id, title, created_by_id, created_by_username, status, fragile,
                   weight_kg, distance_km, base_rate, cost, created_at, updated_at
            FROM shipments
            WHERE $1::uuid IS NULL OR created_by_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(created_by)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Shipment::from).collect())
    }

    async fn replace_shipment(&self, shipment: &Shipment) -> Result<bool, StoreError> {
        // created_by_* and created_at are never written after insert
        let result = sqlx::query(
            r#"
            UPDATE shipments
            SET title = $2,
                status = $3,
                fragile = $4,
                weight_kg = $5,
                distance_km = $6,
                base_rate = $7,
                cost = $8,
                updated_at = $9
            WHERE id = $1
            "#,
        )
        .bind(shipment.id)
        .bind(&shipment.title)
        .bind(shipment.status)
        .bind(shipment.fragile)
        .bind(shipment.weight_kg)
        .bind(shipment.distance_km)
        .bind(shipment.base_rate)
        .bind(shipment.cost)
        .bind(shipment.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_shipment(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM shipments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        pool::health_check(&self.pool).await?;
        Ok(())
    }
}
