//! # Shipsy Shared Library
//!
//! Domain types, persistence and business logic for the Shipsy shipment
//! service. The HTTP layer lives in `shipsy-api`.
//!
//! ## Module Organization
//!
//! - `auth`: password hashing, session tokens, signup and login
//! - `db`: PostgreSQL pool and migrations
//! - `models`: users and shipments
//! - `pricing`: shipment cost formula
//! - `shipments`: shipment repository
//! - `store`: persistence ports with PostgreSQL and in-memory backends
//! - `validation`: field-level validation reporting

pub mod auth;
pub mod db;
pub mod models;
pub mod pricing;
pub mod shipments;
pub mod store;
pub mod validation;

/// Current version of the Shipsy shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
