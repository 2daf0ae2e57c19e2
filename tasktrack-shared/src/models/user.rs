/// User model and database operations
///
/// This module provides the User model and the queries the API server and
/// the overdue reviewer share. Every user carries exactly one role and an
/// active flag; deactivated users can no longer log in and are skipped by
/// the overdue review.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE user_role AS ENUM ('admin', 'manager', 'user');
///
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     username VARCHAR(150) NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     role user_role NOT NULL DEFAULT 'user',
///     is_active BOOLEAN NOT NULL DEFAULT TRUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use tasktrack_shared::models::user::{CreateUser, Role, User};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let user = User::create(&pool, CreateUser {
///     username: "jsmith".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     role: Role::User,
/// }).await?;
///
/// let found = User::find_by_username(&pool, "jsmith").await?;
/// assert!(found.is_some());
/// # Ok(())
/// # }
/// ```
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// User role
///
/// Roles are flat, not hierarchical: `manager` is not a superset of `user`.
/// Managers and admins assign tasks and manage accounts; regular users
/// receive tasks and update their status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access: manage users, assign tasks, update any task
    Admin,

    /// Can manage users and assign tasks, but not touch task status
    Manager,

    /// Receives tasks and updates the status of their own tasks
    User,
}

impl Role {
    /// Converts role to string for display and logging
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::User => "user",
        }
    }

    /// Can list, update, and delete user accounts and assign tasks
    pub fn can_manage_users(&self) -> bool {
        matches!(self, Role::Admin | Role::Manager)
    }

    /// Can update task status (assignees are additionally checked per task)
    pub fn can_update_task_status(&self) -> bool {
        matches!(self, Role::Admin | Role::User)
    }

    /// Whether a user of this role may be assigned tasks
    pub fn is_assignable(&self) -> bool {
        matches!(self, Role::User)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User model representing an account
///
/// Passwords are stored as Argon2id hashes, never in plaintext.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Login name, unique across all users
    pub username: String,

    /// Argon2id password hash
    pub password_hash: String,

    /// Account role
    pub role: Role,

    /// Whether the account is active
    ///
    /// Set to false by the overdue reviewer when the missed-task
    /// threshold is reached, or by a manager/admin update. Inactive
    /// users cannot log in and cannot be assigned tasks.
    pub is_active: bool,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Login name
    pub username: String,

    /// Argon2id password hash (NOT the plaintext password)
    pub password_hash: String,

    /// Account role
    pub role: Role,
}

/// Input for updating an existing user
///
/// Only the fields a manager may touch. Username and password changes go
/// through dedicated flows, not this struct.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUser {
    /// New role
    pub role: Option<Role>,

    /// New active flag
    pub is_active: Option<bool>,
}

impl User {
    /// Creates a new user
    ///
    /// # Errors
    ///
    /// Returns an error if the username already exists (unique constraint)
    /// or the database operation fails.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash, role)
            VALUES ($1, $2, $3)
            RETURNING id, username, password_hash, role, is_active, created_at, updated_at
            "#,
        )
        .bind(data.username)
        .bind(data.password_hash)
        .bind(data.role)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, role, is_active, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by username
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, role, is_active, created_at, updated_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Lists all users, newest first
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, role, is_active, created_at, updated_at
            FROM users
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(users)
    }

    /// Lists active users with the given role, ordered by id
    ///
    /// This is the candidate query of the overdue reviewer. The ordering
    /// is not significant for the policy (it is per-user and independent)
    /// but must be deterministic so runs are reproducible.
    pub async fn list_active_with_role(
        pool: &PgPool,
        role: Role,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, role, is_active, created_at, updated_at
            FROM users
            WHERE role = $1 AND is_active = TRUE
            ORDER BY id ASC
            "#,
        )
        .bind(role)
        .fetch_all(pool)
        .await?;

        Ok(users)
    }

    /// Updates role and/or active flag
    ///
    /// Only non-None fields are updated. The `updated_at` timestamp is
    /// always refreshed.
    ///
    /// # Returns
    ///
    /// The updated user if found, None if the user doesn't exist
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateUser,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE users SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.role.is_some() {
            bind_count += 1;
            query.push_str(&format!(", role = ${}", bind_count));
        }
        if data.is_active.is_some() {
            bind_count += 1;
            query.push_str(&format!(", is_active = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, username, password_hash, role, is_active, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, User>(&query).bind(id);

        if let Some(role) = data.role {
            q = q.bind(role);
        }
        if let Some(is_active) = data.is_active {
            q = q.bind(is_active);
        }

        let user = q.fetch_optional(pool).await?;

        Ok(user)
    }

    /// Sets a user's active flag to false
    ///
    /// This is the reviewer's only mutation. Setting the flag on an
    /// already-inactive user is a no-op, so repeated runs are safe.
    ///
    /// # Returns
    ///
    /// True if a row was updated, false if the user doesn't exist
    pub async fn deactivate(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET is_active = FALSE,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes a user by ID
    ///
    /// Tasks assigned to the user are deleted with them (ON DELETE CASCADE).
    ///
    /// # Returns
    ///
    /// True if the user was deleted, false if the user didn't exist
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
