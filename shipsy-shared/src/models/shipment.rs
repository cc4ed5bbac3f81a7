/// Shipment model
///
/// A shipment records a parcel's physical attributes, its delivery status,
/// and a snapshot of the user who created it. The `cost` field is derived
/// from `weight_kg`, `distance_km` and `base_rate` by
/// [`crate::pricing::compute_cost`] and is recomputed on every mutation.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE shipment_status AS ENUM (
///     'NEW', 'IN_TRANSIT', 'DELIVERED', 'CANCELLED'
/// );
///
/// CREATE TABLE shipments (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(200),
///     created_by_id UUID NOT NULL,
///     created_by_username VARCHAR(64) NOT NULL,
///     status shipment_status NOT NULL DEFAULT 'NEW',
///     fragile BOOLEAN NOT NULL DEFAULT FALSE,
///     weight_kg DOUBLE PRECISION NOT NULL,
///     distance_km DOUBLE PRECISION NOT NULL,
///     base_rate DOUBLE PRECISION NOT NULL,
///     cost DOUBLE PRECISION NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// `created_by_id` is deliberately not a foreign key: the creator is a
/// denormalized copy taken at creation time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::now_micros;
use crate::pricing::compute_cost;

/// Delivery status of a shipment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "shipment_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShipmentStatus {
    /// Registered, not yet picked up
    #[default]
    New,

    /// On its way (older clients send `IN-TRANSIT`)
    #[serde(alias = "IN-TRANSIT")]
    InTransit,

    /// Handed over to the recipient
    Delivered,

    /// Will not be delivered
    Cancelled,
}

impl ShipmentStatus {
    /// Gets status as its wire string
    pub fn as_str(&self) -> &'static str {
        match self {
            ShipmentStatus::New => "NEW",
            ShipmentStatus::InTransit => "IN_TRANSIT",
            ShipmentStatus::Delivered => "DELIVERED",
            ShipmentStatus::Cancelled => "CANCELLED",
        }
    }
}

/// Snapshot of the creating user, captured once at creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedBy {
    /// Creator's user ID at creation time
    pub id: Uuid,

    /// Creator's username at creation time
    pub username: String,
}

/// Shipment record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shipment {
    /// Unique shipment ID (UUID v4), never reused
    pub id: Uuid,

    /// Optional free-form title
    pub title: Option<String>,

    /// Creator snapshot; immutable
    pub created_by: CreatedBy,

    /// Delivery status
    pub status: ShipmentStatus,

    /// Whether the parcel needs careful handling
    pub fragile: bool,

    /// Weight in kilograms
    pub weight_kg: f64,

    /// Distance in kilometres
    pub distance_km: f64,

    /// Rate charged per kilogram
    pub base_rate: f64,

    /// Derived cost, see [`compute_cost`]
    pub cost: f64,

    /// When the shipment was created
    pub created_at: DateTime<Utc>,

    /// When the shipment was last modified
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a shipment
///
/// Numeric fields are `Option`s so a missing value can be reported as a
/// validation error instead of a deserialization failure. Any `cost`,
/// `createdBy`, `id` or timestamp sent by the client is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewShipment {
    /// Optional title
    #[validate(length(max = 200, message = "Title must be at most 200 characters"))]
    pub title: Option<String>,

    /// Initial status (defaults to `NEW`)
    pub status: Option<ShipmentStatus>,

    /// Fragile flag (defaults to false)
    pub fragile: Option<bool>,

    /// Weight in kilograms
    #[validate(
        required(message = "Weight is required"),
        range(min = 0.0, message = "Weight must not be negative")
    )]
    pub weight_kg: Option<f64>,

    /// Distance in kilometres
    #[validate(
        required(message = "Distance is required"),
        range(min = 0.0, message = "Distance must not be negative")
    )]
    pub distance_km: Option<f64>,

    /// Rate per kilogram
    #[validate(
        required(message = "Base rate is required"),
        range(min = 0.0, message = "Base rate must not be negative")
    )]
    pub base_rate: Option<f64>,
}

/// Partial update for a shipment
///
/// Only present fields are applied. The creator snapshot is not part of this
/// type, so a `createdBy` in the request body is dropped during
/// deserialization; so is `cost`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentPatch {
    /// New title
    #[validate(length(max = 200, message = "Title must be at most 200 characters"))]
    pub title: Option<String>,

    /// New status
    pub status: Option<ShipmentStatus>,

    /// New fragile flag
    pub fragile: Option<bool>,

    /// New weight
    #[validate(range(min = 0.0, message = "Weight must not be negative"))]
    pub weight_kg: Option<f64>,

    /// New distance
    #[validate(range(min = 0.0, message = "Distance must not be negative"))]
    pub distance_km: Option<f64>,

    /// New base rate
    #[validate(range(min = 0.0, message = "Base rate must not be negative"))]
    pub base_rate: Option<f64>,
}

impl Shipment {
    /// Builds a priced shipment from validated input
    ///
    /// Missing numeric fields default to zero; callers validate `input`
    /// first so this only happens in tests.
    pub fn create(input: NewShipment, created_by: CreatedBy) -> Self {
        let now = now_micros();

        let mut shipment = Self {
            id: Uuid::new_v4(),
            title: input.title,
            created_by,
            status: input.status.unwrap_or_default(),
            fragile: input.fragile.unwrap_or(false),
            weight_kg: input.weight_kg.unwrap_or(0.0),
            distance_km: input.distance_km.unwrap_or(0.0),
            base_rate: input.base_rate.unwrap_or(0.0),
            cost: 0.0,
            created_at: now,
            updated_at: now,
        };
        shipment.reprice();
        shipment
    }

    /// Merges a patch, recomputes cost and refreshes `updated_at`
    pub fn apply(&mut self, patch: ShipmentPatch) {
        if let Some(title) = patch.title {
            self.title = Some(title);
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(fragile) = patch.fragile {
            self.fragile = fragile;
        }
        if let Some(weight_kg) = patch.weight_kg {
            self.weight_kg = weight_kg;
        }
        if let Some(distance_km) = patch.distance_km {
            self.distance_km = distance_km;
        }
        if let Some(base_rate) = patch.base_rate {
            self.base_rate = base_rate;
        }

        self.reprice();
        self.updated_at = now_micros().max(self.updated_at);
    }

    /// Recomputes `cost` from the current physical attributes
    pub fn reprice(&mut self) {
        self.cost = compute_cost(self.weight_kg, self.distance_km, self.base_rate);
    }

    /// Checks if the shipment was created by the given user
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.created_by.id == user_id
    }
}

/// Flat database row for a shipment
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ShipmentRow {
    pub id: Uuid,
    pub title: Option<String>,
    pub created_by_id: Uuid,
    pub created_by_username: String,
    pub status: ShipmentStatus,
    pub fragile: bool,
    pub weight_kg: f64,
    pub distance_km: f64,
    pub base_rate: f64,
    pub cost: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ShipmentRow> for Shipment {
    fn from(row: ShipmentRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            created_by: CreatedBy {
                id: row.created_by_id,
                username: row.created_by_username,
            },
            status: row.status,
            fragile: row.fragile,
            weight_kg: row.weight_kg,
            distance_km: row.distance_km,
            base_rate: row.base_rate,
            cost: row.cost,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
