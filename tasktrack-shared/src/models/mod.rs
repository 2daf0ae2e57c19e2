/// Database models for tasktrack
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: Accounts with role and active flag
/// - `task`: Tasks with a single assignee, deadline, and status
/// - `revoked_token`: Blacklisted refresh tokens (logout)
///
/// # Example
///
/// ```no_run
/// use tasktrack_shared::models::user::{CreateUser, Role, User};
/// use tasktrack_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let user = User::create(&pool, CreateUser {
///     username: "jsmith".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     role: Role::User,
/// }).await?;
/// # Ok(())
/// # }
/// ```
pub mod revoked_token;
pub mod task;
pub mod user;
