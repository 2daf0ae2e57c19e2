/// Authentication utilities
///
/// - `jwt`: HS256 access/refresh token creation and validation
/// - `password`: Argon2id hashing and strength validation
/// - `middleware`: `AuthContext` injected into authenticated requests
pub mod jwt;
pub mod middleware;
pub mod password;
