/// Task endpoints
///
/// # Endpoints
///
/// - `POST /v1/tasks` - Assign a task to a user (manager/admin)
/// - `GET /v1/tasks` - List tasks (own tasks, or all for manager/admin)
/// - `PUT /v1/tasks/:id/status` - Update task status (assignee or admin)
use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tasktrack_shared::{
    auth::middleware::AuthContext,
    models::{
        task::{CreateTask, Task, TaskStatus},
        user::{Role, User},
    },
};
use uuid::Uuid;
use validator::Validate;

/// Assign task request
#[derive(Debug, Deserialize, Validate)]
pub struct AssignTaskRequest {
    /// Task name
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    /// Task description
    pub description: String,

    /// Assignee user ID
    pub assigned_to: Uuid,

    /// Deadline; must be in the future
    pub deadline: DateTime<Utc>,
}

/// Task as returned by the API
#[derive(Debug, Serialize)]
pub struct TaskResponse {
    /// Task ID
    pub id: Uuid,

    /// Task name
    pub name: String,

    /// Task description
    pub description: String,

    /// Assignee user ID
    pub assigned_to: Uuid,

    /// Deadline
    pub deadline: DateTime<Utc>,

    /// Current status
    pub status: TaskStatus,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            name: task.name,
            description: task.description,
            assigned_to: task.assigned_to,
            deadline: task.deadline,
            status: task.status,
        }
    }
}

/// Update task status request
#[derive(Debug, Deserialize)]
pub struct UpdateTaskStatusRequest {
    /// New status
    pub status: TaskStatus,
}

/// Assigns a new task to a user
///
/// Manager/admin only. The assignee must be an active account of role
/// `user`, and the deadline must not be in the past.
///
/// # Endpoint
///
/// ```text
/// POST /v1/tasks
/// Authorization: Bearer <access token>
/// Content-Type: application/json
///
/// {
///   "name": "Quarterly report",
///   "description": "Compile the Q3 numbers",
///   "assigned_to": "uuid",
///   "deadline": "2025-10-01T17:00:00Z"
/// }
/// ```
///
/// # Errors
///
/// - `403 Forbidden`: Caller is a regular user
/// - `422 Unprocessable Entity`: Deadline in the past, assignee unknown,
///   inactive, or not of role `user`
pub async fn assign_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<AssignTaskRequest>,
) -> ApiResult<(StatusCode, Json<TaskResponse>)> {
    if !auth.role.can_manage_users() {
        return Err(ApiError::Forbidden(
            "Only managers and admins can assign tasks".to_string(),
        ));
    }

    req.validate().map_err(ApiError::from_validation)?;

    if req.deadline < Utc::now() {
        return Err(ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "deadline".to_string(),
            message: "Deadline cannot be in the past".to_string(),
        }]));
    }

    let assignee = User::find_by_id(&state.db, req.assigned_to)
        .await?
        .ok_or_else(|| {
            ApiError::ValidationError(vec![ValidationErrorDetail {
                field: "assigned_to".to_string(),
                message: "Assignee does not exist".to_string(),
            }])
        })?;

    if !assignee.role.is_assignable() {
        return Err(ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "assigned_to".to_string(),
            message: "Tasks can only be assigned to users with the user role".to_string(),
        }]));
    }

    if !assignee.is_active {
        return Err(ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "assigned_to".to_string(),
            message: "Cannot assign task to a deactivated user".to_string(),
        }]));
    }

    let task = Task::create(
        &state.db,
        CreateTask {
            name: req.name,
            description: req.description,
            assigned_to: req.assigned_to,
            deadline: req.deadline,
        },
    )
    .await?;

    tracing::info!(
        task_id = %task.id,
        assigned_to = %task.assigned_to,
        assigned_by = %auth.user_id,
        "Assigned task"
    );

    Ok((StatusCode::CREATED, Json(task.into())))
}

/// Lists tasks visible to the caller
///
/// Regular users see only tasks assigned to them; managers and admins see
/// everything.
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<TaskResponse>>> {
    let tasks = match auth.role {
        Role::User => Task::list_by_assignee(&state.db, auth.user_id).await?,
        Role::Manager | Role::Admin => Task::list(&state.db).await?,
    };

    Ok(Json(tasks.into_iter().map(TaskResponse::from).collect()))
}

/// Updates the status of a task
///
/// Allowed for the task's assignee and for admins. Managers assign tasks
/// but don't complete them, so they are excluded here.
///
/// # Errors
///
/// - `403 Forbidden`: Caller is neither the assignee nor an admin
/// - `404 Not Found`: No such task
pub async fn update_task_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTaskStatusRequest>,
) -> ApiResult<Json<TaskResponse>> {
    if !auth.role.can_update_task_status() {
        return Err(ApiError::Forbidden(
            "Only the assignee or an admin can update task status".to_string(),
        ));
    }

    let task = Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    if auth.role != Role::Admin && task.assigned_to != auth.user_id {
        return Err(ApiError::Forbidden(
            "Only the assignee or an admin can update task status".to_string(),
        ));
    }

    let task = Task::update_status(&state.db, id, req.status)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    tracing::info!(
        task_id = %id,
        status = task.status.as_str(),
        updated_by = %auth.user_id,
        "Updated task status"
    );

    Ok(Json(task.into()))
}
