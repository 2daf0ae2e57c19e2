/// Revoked refresh token store
///
/// Logout blacklists the presented refresh token by its JWT ID (`jti`
/// claim). Refresh and logout both check this table before accepting a
/// token. Rows past their expiry carry no information (the token would be
/// rejected as expired anyway) and can be pruned.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE revoked_tokens (
///     jti UUID PRIMARY KEY,
///     user_id UUID NOT NULL,
///     expires_at TIMESTAMPTZ NOT NULL,
///     revoked_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// A blacklisted refresh token
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RevokedToken {
    /// JWT ID claim of the revoked token
    pub jti: Uuid,

    /// User the token belonged to
    pub user_id: Uuid,

    /// When the token would have expired on its own
    pub expires_at: DateTime<Utc>,

    /// When the token was revoked
    pub revoked_at: DateTime<Utc>,
}

impl RevokedToken {
    /// Blacklists a refresh token
    ///
    /// Revoking the same token twice is a no-op, so a repeated logout with
    /// the same token still succeeds.
    pub async fn revoke(
        pool: &PgPool,
        jti: Uuid,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO revoked_tokens (jti, user_id, expires_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (jti) DO NOTHING
            "#,
        )
        .bind(jti)
        .bind(user_id)
        .bind(expires_at)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Checks whether a token has been revoked
    pub async fn is_revoked(pool: &PgPool, jti: Uuid) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS (SELECT 1 FROM revoked_tokens WHERE jti = $1)
            "#,
        )
        .bind(jti)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }

    /// Deletes revocation rows whose tokens have expired anyway
    ///
    /// # Returns
    ///
    /// Number of rows pruned
    pub async fn prune_expired(pool: &PgPool, now: DateTime<Utc>) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM revoked_tokens WHERE expires_at < $1")
            .bind(now)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }
}
