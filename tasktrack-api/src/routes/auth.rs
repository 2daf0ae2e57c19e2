/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /v1/auth/register` - Register a new user
/// - `POST /v1/auth/login` - Login and get tokens
/// - `POST /v1/auth/refresh` - Refresh access token
/// - `POST /v1/auth/logout` - Blacklist the refresh token
use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use tasktrack_shared::{
    auth::{jwt, middleware::AuthContext, password},
    models::{
        revoked_token::RevokedToken,
        user::{CreateUser, Role, User},
    },
};
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Login name
    #[validate(length(min = 3, max = 150, message = "Username must be 3-150 characters"))]
    pub username: String,

    /// Password (validated for strength)
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    /// Account role, defaults to `user`
    #[serde(default = "default_role")]
    pub role: Role,
}

fn default_role() -> Role {
    Role::User
}

/// Register response
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    /// New user ID
    pub user_id: String,

    /// Login name
    pub username: String,

    /// Assigned role
    pub role: Role,
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Login name
    pub username: String,

    /// Password
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// User ID
    pub user_id: String,

    /// Account role
    pub role: Role,

    /// Access token (1h)
    pub access_token: String,

    /// Refresh token (7d)
    pub refresh_token: String,
}

/// Refresh token request
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    /// Refresh token
    pub refresh_token: String,
}

/// Refresh token response
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    /// New access token (1h)
    pub access_token: String,
}

/// Logout request
#[derive(Debug, Deserialize)]
pub struct LogoutRequest {
    /// Refresh token to blacklist
    pub refresh_token: String,
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /v1/auth/register
/// Content-Type: application/json
///
/// {
///   "username": "jsmith",
///   "password": "SecureP4ss",
///   "role": "user"
/// }
/// ```
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Validation failed
/// - `409 Conflict`: Username already exists
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    req.validate().map_err(ApiError::from_validation)?;

    password::validate_password_strength(&req.password).map_err(|e| {
        ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "password".to_string(),
            message: e,
        }])
    })?;

    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            username: req.username,
            password_hash,
            role: req.role,
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, role = %user.role, "Registered user");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user_id: user.id.to_string(),
            username: user.username,
            role: user.role,
        }),
    ))
}

/// Login endpoint
///
/// Authenticates a user and returns JWT tokens. Unknown usernames and bad
/// passwords produce the same response so the endpoint doesn't leak which
/// accounts exist. Deactivated accounts cannot log in.
///
/// # Endpoint
///
/// ```text
/// POST /v1/auth/login
/// Content-Type: application/json
///
/// {
///   "username": "jsmith",
///   "password": "SecureP4ss"
/// }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Invalid credentials or deactivated account
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let user = User::find_by_username(&state.db, &req.username)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid username or password".to_string()))?;

    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Invalid username or password".to_string(),
        ));
    }

    if !user.is_active {
        return Err(ApiError::Unauthorized(
            "Account has been deactivated".to_string(),
        ));
    }

    let access_claims = jwt::Claims::new(user.id, user.role, jwt::TokenType::Access);
    let refresh_claims = jwt::Claims::new(user.id, user.role, jwt::TokenType::Refresh);

    let access_token = jwt::create_token(&access_claims, state.jwt_secret())?;
    let refresh_token = jwt::create_token(&refresh_claims, state.jwt_secret())?;

    Ok(Json(LoginResponse {
        user_id: user.id.to_string(),
        role: user.role,
        access_token,
        refresh_token,
    }))
}

/// Token refresh endpoint
///
/// Exchanges a refresh token for a new access token. Blacklisted tokens
/// (logged out) are rejected.
///
/// # Endpoint
///
/// ```text
/// POST /v1/auth/refresh
/// Content-Type: application/json
///
/// { "refresh_token": "eyJ..." }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Invalid, expired, or revoked refresh token
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Json<RefreshResponse>> {
    let claims = jwt::validate_refresh_token(&req.refresh_token, state.jwt_secret())?;

    if RevokedToken::is_revoked(&state.db, claims.jti).await? {
        return Err(jwt::JwtError::Revoked.into());
    }

    let access_claims = jwt::Claims::new(claims.sub, claims.role, jwt::TokenType::Access);
    let access_token = jwt::create_token(&access_claims, state.jwt_secret())?;

    Ok(Json(RefreshResponse { access_token }))
}

/// Logout endpoint
///
/// Blacklists the presented refresh token so it can no longer mint access
/// tokens. Requires a valid access token; the refresh token must belong to
/// the caller.
///
/// # Endpoint
///
/// ```text
/// POST /v1/auth/logout
/// Authorization: Bearer <access token>
/// Content-Type: application/json
///
/// { "refresh_token": "eyJ..." }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Token is not a refresh token
/// - `401 Unauthorized`: Invalid or expired refresh token
/// - `403 Forbidden`: Refresh token belongs to another user
pub async fn logout(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<LogoutRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let claims = jwt::validate_refresh_token(&req.refresh_token, state.jwt_secret())?;

    if claims.sub != auth.user_id {
        return Err(ApiError::Forbidden(
            "Refresh token does not belong to the authenticated user".to_string(),
        ));
    }

    RevokedToken::revoke(&state.db, claims.jti, claims.sub, claims.expires_at()).await?;

    tracing::info!(user_id = %auth.user_id, "Logged out, refresh token revoked");

    Ok(Json(serde_json::json!({ "detail": "Logout successful" })))
}
