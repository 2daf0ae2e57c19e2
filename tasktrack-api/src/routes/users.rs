/// User management endpoints
///
/// # Endpoints
///
/// - `GET /v1/users` - List users (manager/admin)
/// - `GET /v1/users/:id` - Get one user (any authenticated user)
/// - `PUT /v1/users/:id` - Update role/active flag (manager/admin)
/// - `DELETE /v1/users/:id` - Delete a user (manager/admin; managers
///   cannot delete admins)
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tasktrack_shared::{
    auth::middleware::AuthContext,
    models::user::{Role, UpdateUser, User},
};
use uuid::Uuid;

/// User as returned by the API
///
/// The password hash never leaves the server.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    /// User ID
    pub id: Uuid,

    /// Login name
    pub username: String,

    /// Account role
    pub role: Role,

    /// Whether the account is active
    pub is_active: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            role: user.role,
            is_active: user.is_active,
        }
    }
}

/// Update user request
///
/// Only role and active flag are manager-mutable, mirroring the account
/// fields a manager review can change.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    /// New role
    pub role: Option<Role>,

    /// New active flag
    pub is_active: Option<bool>,
}

/// Lists all users
///
/// Manager/admin only.
///
/// # Errors
///
/// - `403 Forbidden`: Caller is a regular user
pub async fn list_users(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<UserResponse>>> {
    if !auth.role.can_manage_users() {
        return Err(ApiError::Forbidden(
            "Only managers and admins can list users".to_string(),
        ));
    }

    let users = User::list(&state.db).await?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Gets a single user by ID
///
/// Any authenticated user may look up an account.
///
/// # Errors
///
/// - `404 Not Found`: No such user
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<UserResponse>> {
    let user = User::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(user.into()))
}

/// Updates a user's role and/or active flag
///
/// Manager/admin only.
///
/// # Errors
///
/// - `403 Forbidden`: Caller is a regular user
/// - `404 Not Found`: No such user
pub async fn update_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateUserRequest>,
) -> ApiResult<Json<UserResponse>> {
    if !auth.role.can_manage_users() {
        return Err(ApiError::Forbidden(
            "Only managers and admins can update users".to_string(),
        ));
    }

    let user = User::update(
        &state.db,
        id,
        UpdateUser {
            role: req.role,
            is_active: req.is_active,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    tracing::info!(user_id = %id, updated_by = %auth.user_id, "Updated user");

    Ok(Json(user.into()))
}

/// Deletes a user
///
/// Manager/admin only, with one extra rule: a manager cannot delete an
/// admin-role account. The user's tasks are deleted with them.
///
/// # Errors
///
/// - `403 Forbidden`: Caller is a regular user, or a manager targeting an admin
/// - `404 Not Found`: No such user
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    if !auth.role.can_manage_users() {
        return Err(ApiError::Forbidden(
            "Only managers and admins can delete users".to_string(),
        ));
    }

    let user = User::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    if user.role == Role::Admin && auth.role != Role::Admin {
        return Err(ApiError::Forbidden(
            "Managers cannot delete admin users".to_string(),
        ));
    }

    User::delete(&state.db, id).await?;

    tracing::info!(user_id = %id, deleted_by = %auth.user_id, "Deleted user");

    Ok(StatusCode::NO_CONTENT)
}
