//! # tasktrack shared library
//!
//! Types and utilities shared by the API server and the overdue reviewer.
//!
//! ## Module Organization
//!
//! - `models`: Database models and queries (users, tasks, revoked tokens)
//! - `auth`: JWT tokens, Argon2id password hashing, request auth context
//! - `db`: Connection pool and migration runner

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the tasktrack shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
