/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Banner, health check, service info and the 404 fallback
/// - `auth`: Authentication endpoints (signup, login, profile)
/// - `shipments`: Shipment CRUD endpoints

pub mod auth;
pub mod health;
pub mod shipments;
