//! User store.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sos_id::UserId;

use crate::domain::Role;

use super::DbError;

/// Row from the users table.
#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl UserRow {
    /// The stored role, parsed with the fail-safe `citizen` default.
    pub fn role(&self) -> Role {
        Role::parse_or_default(&self.role)
    }
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for UserRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        use sqlx::Row;
        Ok(Self {
            id: UserId::new(row.try_get("id")?),
            email: row.try_get("email")?,
            name: row.try_get("name")?,
            role: row.try_get("role")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

/// Store for user records.
pub struct UserStore {
    pool: PgPool,
}

impl UserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        email: &str,
        name: &str,
        role: Role,
    ) -> Result<UserRow, DbError> {
        sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (email, name, role)
            VALUES ($1, $2, $3)
            RETURNING id, email, name, role, created_at
            "#,
        )
        .bind(email)
        .bind(name)
        .bind(role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(DbError::Query)
    }

    pub async fn find_by_id(&self, id: UserId) -> Result<Option<UserRow>, DbError> {
        sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, name, role, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(DbError::Query)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserRow>, DbError> {
        sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, name, role, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(DbError::Query)
    }

    /// Updates a user's role. Returns the updated row, or `None` when no user
    /// has the given id.
    pub async fn update_role(
        &self,
        id: UserId,
        role: Role,
    ) -> Result<Option<UserRow>, DbError> {
        sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET role = $2
            WHERE id = $1
            RETURNING id, email, name, role, created_at
            "#,
        )
        .bind(id.value())
        .bind(role.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(DbError::Query)
    }

    /// Updates a user's role by email. Returns the updated row, or `None`
    /// when no user has the given email.
    pub async fn update_role_by_email(
        &self,
        email: &str,
        role: Role,
    ) -> Result<Option<UserRow>, DbError> {
        sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET role = $2
            WHERE email = $1
            RETURNING id, email, name, role, created_at
            "#,
        )
        .bind(email)
        .bind(role.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(DbError::Query)
    }

    pub async fn list_all(&self) -> Result<Vec<UserRow>, DbError> {
        sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, name, role, created_at
            FROM users
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::Query)
    }

    pub async fn count(&self) -> Result<i64, DbError> {
        sqlx::query_scalar(r#"SELECT COUNT(*) FROM users"#)
            .fetch_one(&self.pool)
            .await
            .map_err(DbError::Query)
    }
}
