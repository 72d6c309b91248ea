//! Report store.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sos_id::{ReportId, UserId};

use crate::domain::{NewReport, ReportStatus};

use super::DbError;

/// Row from the reports table.
#[derive(Debug, Clone)]
pub struct ReportRow {
    pub id: ReportId,
    pub user_id: UserId,
    pub report_type: String,
    pub status: String,
    pub location: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for ReportRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        use sqlx::Row;
        Ok(Self {
            id: ReportId::new(row.try_get("id")?),
            user_id: UserId::new(row.try_get("user_id")?),
            report_type: row.try_get("type")?,
            status: row.try_get("status")?,
            location: row.try_get("location")?,
            description: row.try_get("description")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

/// Report joined with reporter name/email for the command center view.
#[derive(Debug, Clone)]
pub struct ReportWithReporterRow {
    pub id: ReportId,
    pub user_id: UserId,
    pub report_type: String,
    pub status: String,
    pub location: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for ReportWithReporterRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        use sqlx::Row;
        Ok(Self {
            id: ReportId::new(row.try_get("id")?),
            user_id: UserId::new(row.try_get("user_id")?),
            report_type: row.try_get("type")?,
            status: row.try_get("status")?,
            location: row.try_get("location")?,
            description: row.try_get("description")?,
            created_at: row.try_get("created_at")?,
            user_name: row.try_get("user_name")?,
            user_email: row.try_get("user_email")?,
        })
    }
}

/// Per-status report count.
#[derive(Debug, Clone)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

/// Per-type report count.
#[derive(Debug, Clone)]
pub struct TypeCount {
    pub report_type: String,
    pub count: i64,
}

/// Aggregated report statistics.
#[derive(Debug, Clone)]
pub struct ReportStats {
    pub by_status: Vec<StatusCount>,
    pub by_type: Vec<TypeCount>,
    pub total: i64,
}

/// Store for report records.
pub struct ReportStore {
    pool: PgPool,
}

impl ReportStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a new report. The row always starts in `pending`.
    pub async fn insert(&self, report: &NewReport) -> Result<ReportRow, DbError> {
        sqlx::query_as::<_, ReportRow>(
            r#"
            INSERT INTO reports (user_id, type, location, description)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, type, status, location, description, created_at
            "#,
        )
        .bind(report.user_id.value())
        .bind(report.report_type.as_str())
        .bind(&report.location)
        .bind(&report.description)
        .fetch_one(&self.pool)
        .await
        .map_err(DbError::Query)
    }

    pub async fn list_by_user(&self, user_id: UserId) -> Result<Vec<ReportRow>, DbError> {
        sqlx::query_as::<_, ReportRow>(
            r#"
            SELECT id, user_id, type, status, location, description, created_at
            FROM reports
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id.value())
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::Query)
    }

    /// Reports that still need attention (pending or in progress), oldest
    /// first so the longest-waiting emergencies surface on top.
    pub async fn list_open(&self) -> Result<Vec<ReportRow>, DbError> {
        sqlx::query_as::<_, ReportRow>(
            r#"
            SELECT id, user_id, type, status, location, description, created_at
            FROM reports
            WHERE status IN ('pending', 'in_progress')
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::Query)
    }

    /// All reports with the reporter's name and email, newest first.
    pub async fn list_all_with_reporter(
        &self,
    ) -> Result<Vec<ReportWithReporterRow>, DbError> {
        sqlx::query_as::<_, ReportWithReporterRow>(
            r#"
            SELECT r.id, r.user_id, r.type, r.status, r.location, r.description,
                   r.created_at, u.name AS user_name, u.email AS user_email
            FROM reports r
            LEFT JOIN users u ON u.id = r.user_id
            ORDER BY r.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::Query)
    }

    /// Writes the given status unconditionally.
    ///
    /// There is no precondition on the current status; concurrent writers are
    /// last-write-wins at the store. Returns the updated row, or `None` when
    /// no report has the given id.
    pub async fn set_status(
        &self,
        id: ReportId,
        status: ReportStatus,
    ) -> Result<Option<ReportRow>, DbError> {
        sqlx::query_as::<_, ReportRow>(
            r#"
            UPDATE reports
            SET status = $2
            WHERE id = $1
            RETURNING id, user_id, type, status, location, description, created_at
            "#,
        )
        .bind(id.value())
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(DbError::Query)
    }

    pub async fn stats(&self) -> Result<ReportStats, DbError> {
        use sqlx::Row;

        let status_rows = sqlx::query(
            r#"
            SELECT status, COUNT(*) AS count
            FROM reports
            GROUP BY status
            ORDER BY status ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::Query)?;

        let by_status = status_rows
            .into_iter()
            .map(|row| {
                Ok(StatusCount {
                    status: row.try_get("status")?,
                    count: row.try_get("count")?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()
            .map_err(DbError::Query)?;

        let type_rows = sqlx::query(
            r#"
            SELECT type, COUNT(*) AS count
            FROM reports
            GROUP BY type
            ORDER BY type ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::Query)?;

        let by_type = type_rows
            .into_iter()
            .map(|row| {
                Ok(TypeCount {
                    report_type: row.try_get("type")?,
                    count: row.try_get("count")?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()
            .map_err(DbError::Query)?;

        let total = sqlx::query_scalar(r#"SELECT COUNT(*) FROM reports"#)
            .fetch_one(&self.pool)
            .await
            .map_err(DbError::Query)?;

        Ok(ReportStats {
            by_status,
            by_type,
            total,
        })
    }
}
