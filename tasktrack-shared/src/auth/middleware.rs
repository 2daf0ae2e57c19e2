/// Authentication context for Axum handlers
///
/// The API server validates the Bearer token in a middleware layer and
/// inserts an [`AuthContext`] into request extensions. Handlers extract it
/// with Axum's `Extension` extractor and use it for permission checks.
///
/// # Example
///
/// ```
/// use axum::Extension;
/// use tasktrack_shared::auth::middleware::AuthContext;
///
/// async fn handler(Extension(auth): Extension<AuthContext>) -> String {
///     format!("User: {} ({})", auth.user_id, auth.role)
/// }
/// ```
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::Role;
use super::jwt::Claims;

/// Authentication context added to request extensions
///
/// Built from validated access-token claims. The role comes from the
/// token, so a role change takes effect when the user next obtains a
/// token, not mid-session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: Uuid,

    /// Role carried by the token
    pub role: Role,
}

impl AuthContext {
    /// Creates auth context from validated JWT claims
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            user_id: claims.sub,
            role: claims.role,
        }
    }
}

/// Error type for authentication middleware
#[derive(Debug)]
pub enum AuthError {
    /// Missing authorization header
    MissingCredentials,

    /// Invalid authorization header format
    InvalidFormat(String),

    /// Token validation failed
    InvalidToken(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingCredentials => (
                StatusCode::UNAUTHORIZED,
                "Missing authorization header".to_string(),
            ),
            AuthError::InvalidFormat(msg) => (StatusCode::BAD_REQUEST, msg),
            AuthError::InvalidToken(msg) => (StatusCode::UNAUTHORIZED, msg),
        };

        let body = Json(serde_json::json!({
            "error": "unauthorized",
            "message": message,
        }));

        (status, body).into_response()
    }
}
