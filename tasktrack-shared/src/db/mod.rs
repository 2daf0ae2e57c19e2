/// Database utilities
///
/// - `pool`: PostgreSQL connection pool with health check
/// - `migrations`: sqlx migration runner
pub mod migrations;
pub mod pool;
