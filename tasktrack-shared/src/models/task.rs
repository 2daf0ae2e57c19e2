/// Task model and database operations
///
/// Tasks are the unit of work assigned to regular users. Each task has
/// exactly one assignee and a hard deadline. A task whose deadline passes
/// while it is still `assigned` counts against its assignee in the
/// overdue review.
///
/// # State Machine
///
/// ```text
/// assigned → completed
/// ```
///
/// There is no way back: a completed task never becomes overdue.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('assigned', 'completed');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     description TEXT NOT NULL,
///     assigned_to UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     deadline TIMESTAMPTZ NOT NULL,
///     status task_status NOT NULL DEFAULT 'assigned',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Task status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Task is open and counts toward the overdue review once its
    /// deadline has passed
    Assigned,

    /// Task is done; never counted as overdue
    Completed,
}

impl TaskStatus {
    /// Converts status to string for display and logging
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Assigned => "assigned",
            TaskStatus::Completed => "completed",
        }
    }
}

/// Task model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Short human-readable name
    pub name: String,

    /// Free-text description
    pub description: String,

    /// The single assignee; deleting the user deletes their tasks
    pub assigned_to: Uuid,

    /// Deadline after which an `assigned` task is overdue
    pub deadline: DateTime<Utc>,

    /// Current status
    pub status: TaskStatus,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new task
///
/// Status is not an input; every task starts `assigned`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    /// Task name
    pub name: String,

    /// Task description
    pub description: String,

    /// Assignee user ID
    pub assigned_to: Uuid,

    /// Deadline
    pub deadline: DateTime<Utc>,
}

impl Task {
    /// Creates a new task in `assigned` status
    ///
    /// The caller is responsible for checking that the assignee is an
    /// active user of role `user` and that the deadline is in the future;
    /// those rules live at the API layer, not here.
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (name, description, assigned_to, deadline)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, description, assigned_to, deadline, status, created_at, updated_at
            "#,
        )
        .bind(data.name)
        .bind(data.description)
        .bind(data.assigned_to)
        .bind(data.deadline)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, name, description, assigned_to, deadline, status, created_at, updated_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists all tasks, newest first
    ///
    /// Used for manager/admin listings.
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, name, description, assigned_to, deadline, status, created_at, updated_at
            FROM tasks
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Lists tasks assigned to one user, newest first
    pub async fn list_by_assignee(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, name, description, assigned_to, deadline, status, created_at, updated_at
            FROM tasks
            WHERE assigned_to = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Counts a user's overdue tasks at a reference time
    ///
    /// An overdue task is one with status `assigned` and a deadline
    /// strictly before `now`. A deadline exactly equal to `now` is not
    /// overdue. The reviewer passes one fixed `now` for the whole run so
    /// every task in a run is classified against the same instant.
    pub async fn count_overdue_assigned(
        pool: &PgPool,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM tasks
            WHERE assigned_to = $1
              AND status = 'assigned'
              AND deadline < $2
            "#,
        )
        .bind(user_id)
        .bind(now)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }

    /// Updates a task's status
    ///
    /// # Returns
    ///
    /// The updated task if found, None if the task doesn't exist
    pub async fn update_status(
        pool: &PgPool,
        id: Uuid,
        status: TaskStatus,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET status = $2,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, description, assigned_to, deadline, status, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_status_as_str() {
        assert_eq!(TaskStatus::Assigned.as_str(), "assigned");
        assert_eq!(TaskStatus::Completed.as_str(), "completed");
    }

    #[test]
    fn test_task_status_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::Assigned).unwrap(),
            "\"assigned\""
        );
        let status: TaskStatus = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(status, TaskStatus::Completed);
    }

    // Overdue counting against a live database is covered by the
    // reviewer integration tests.
}
