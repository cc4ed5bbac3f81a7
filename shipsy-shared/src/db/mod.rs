/// Database layer
///
/// - `pool`: PostgreSQL connection pool with a startup health check
/// - `migrations`: embedded schema migrations
///
/// The SQL adapter that uses the pool is [`crate::store::postgres::PgStore`].

pub mod migrations;
pub mod pool;
