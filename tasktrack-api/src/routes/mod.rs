/// API route handlers
///
/// Route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Authentication endpoints (register, login, refresh, logout)
/// - `users`: User management endpoints
/// - `tasks`: Task assignment and status endpoints
pub mod auth;
pub mod health;
pub mod tasks;
pub mod users;
