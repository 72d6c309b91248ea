//! Credential account store.
//!
//! Accounts link a user to an authentication provider. Credential accounts
//! carry the argon2 password hash; provider accounts (reserved for OAuth)
//! carry none.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sos_id::{AccountId, UserId};

use super::DbError;

/// Provider name for email/password accounts.
pub const CREDENTIAL_PROVIDER: &str = "credential";

/// Row from the accounts table.
#[derive(Debug, Clone)]
pub struct AccountRow {
    pub account_id: String,
    pub user_id: UserId,
    pub provider: String,
    pub password_hash: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for AccountRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        use sqlx::Row;
        Ok(Self {
            account_id: row.try_get("account_id")?,
            user_id: UserId::new(row.try_get("user_id")?),
            provider: row.try_get("provider")?,
            password_hash: row.try_get("password_hash")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

/// Store for account records.
pub struct AccountStore {
    pool: PgPool,
}

impl AccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_credential(
        &self,
        user_id: UserId,
        password_hash: &str,
    ) -> Result<AccountRow, DbError> {
        let account_id = AccountId::new();

        sqlx::query_as::<_, AccountRow>(
            r#"
            INSERT INTO accounts (account_id, user_id, provider, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING account_id, user_id, provider, password_hash, created_at
            "#,
        )
        .bind(account_id.to_string())
        .bind(user_id.value())
        .bind(CREDENTIAL_PROVIDER)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(DbError::Query)
    }

    pub async fn find_credential_by_user(
        &self,
        user_id: UserId,
    ) -> Result<Option<AccountRow>, DbError> {
        sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT account_id, user_id, provider, password_hash, created_at
            FROM accounts
            WHERE user_id = $1 AND provider = $2
            "#,
        )
        .bind(user_id.value())
        .bind(CREDENTIAL_PROVIDER)
        .fetch_optional(&self.pool)
        .await
        .map_err(DbError::Query)
    }
}
