/// Domain models
///
/// - `user`: user accounts
/// - `shipment`: shipments, their status and creator snapshot
///
/// Both derive `sqlx::FromRow` (directly or via a row type) for the
/// PostgreSQL store.

pub mod shipment;
pub mod user;

use chrono::{DateTime, SubsecRound, Utc};

/// Current time truncated to the microsecond precision PostgreSQL stores
pub(crate) fn now_micros() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}
