//! Session store.
//!
//! Sessions are keyed by a `sess_…` ID and looked up by the SHA-256 hash of
//! the bearer token. Raw tokens are never stored.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sos_id::{SessionId, UserId};

use super::DbError;

/// A session to persist at login.
#[derive(Debug)]
pub struct NewSession<'a> {
    pub session_id: SessionId,
    pub user_id: UserId,
    pub token_hash: &'a str,
    pub expires_at: DateTime<Utc>,
    pub ip_address: Option<&'a str>,
    pub user_agent: Option<&'a str>,
}

/// A valid (non-expired) session joined with its user.
#[derive(Debug, Clone)]
pub struct ActiveSessionRow {
    pub session_id: String,
    pub expires_at: DateTime<Utc>,
    pub user_id: UserId,
    pub email: String,
    pub role: String,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for ActiveSessionRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        use sqlx::Row;
        Ok(Self {
            session_id: row.try_get("session_id")?,
            expires_at: row.try_get("expires_at")?,
            user_id: UserId::new(row.try_get("user_id")?),
            email: row.try_get("email")?,
            role: row.try_get("role")?,
        })
    }
}

/// Store for session records.
pub struct SessionStore {
    pool: PgPool,
}

impl SessionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, session: NewSession<'_>) -> Result<(), DbError> {
        sqlx::query(
            r#"
            INSERT INTO sessions (
                session_id, user_id, token_hash, expires_at, ip_address, user_agent
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(session.session_id.to_string())
        .bind(session.user_id.value())
        .bind(session.token_hash)
        .bind(session.expires_at)
        .bind(session.ip_address)
        .bind(session.user_agent)
        .execute(&self.pool)
        .await
        .map_err(DbError::Query)?;

        Ok(())
    }

    /// Looks up a valid session by token hash.
    ///
    /// Expired sessions are filtered here, so an expired token reads exactly
    /// like an unknown one.
    pub async fn find_active_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<ActiveSessionRow>, DbError> {
        sqlx::query_as::<_, ActiveSessionRow>(
            r#"
            SELECT s.session_id, s.expires_at, u.id AS user_id, u.email, u.role
            FROM sessions s
            JOIN users u ON u.id = s.user_id
            WHERE s.token_hash = $1 AND s.expires_at > now()
            "#,
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(DbError::Query)
    }

    /// Deletes the session matching the token hash. Returns whether a row was
    /// removed, so logout can stay idempotent.
    pub async fn revoke_by_token_hash(&self, token_hash: &str) -> Result<bool, DbError> {
        let result = sqlx::query(r#"DELETE FROM sessions WHERE token_hash = $1"#)
            .bind(token_hash)
            .execute(&self.pool)
            .await
            .map_err(DbError::Query)?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes sessions that expired more than `grace_days` ago.
    pub async fn delete_expired(&self, grace_days: i32) -> Result<u64, DbError> {
        let result = sqlx::query(
            r#"
            DELETE FROM sessions
            WHERE expires_at < now() - make_interval(days => $1)
            "#,
        )
        .bind(grace_days)
        .execute(&self.pool)
        .await
        .map_err(DbError::Query)?;

        Ok(result.rows_affected())
    }
}
