use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::work_session::WorkSession;
use chrono::{DateTime, Utc};

#[async_trait::async_trait]
pub trait WorkSessionRepository: Send + Sync {
    /// Any row for this code, open or closed.
    async fn find_by_code(&self, code: &str) -> Result<Option<WorkSession>, AppError>;
    /// The open row for this code, if one exists.
    async fn find_active(&self, code: &str) -> Result<Option<WorkSession>, AppError>;
    /// Insert a fresh open row. A duplicate code fails with
    /// `AppError::CodeAlreadyUsed`, whichever writer got there first wins.
    async fn start_session(&self, code: &str, started_at: DateTime<Utc>) -> Result<WorkSession, AppError>;
    /// Close the open row for this code. `None` means there was none to
    /// close; concurrent closers are serialized so at most one gets the row.
    async fn end_session(&self, code: &str, ended_at: DateTime<Utc>) -> Result<Option<WorkSession>, AppError>;
}

#[async_trait::async_trait]
impl WorkSessionRepository for PostgresRepository {
    async fn find_by_code(&self, code: &str) -> Result<Option<WorkSession>, AppError> {
        Ok(sqlx::query_as::<_, WorkSession>(
            r#"
            SELECT id, code, start_time, end_time, total_ms
            FROM work_session
            WHERE code = $1
            LIMIT 1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn find_active(&self, code: &str) -> Result<Option<WorkSession>, AppError> {
        Ok(sqlx::query_as::<_, WorkSession>(
            r#"
            SELECT id, code, start_time, end_time, total_ms
            FROM work_session
            WHERE code = $1
              AND end_time IS NULL
            LIMIT 1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn start_session(&self, code: &str, started_at: DateTime<Utc>) -> Result<WorkSession, AppError> {
        sqlx::query_as::<_, WorkSession>(
            r#"
            INSERT INTO work_session (code, start_time)
            VALUES ($1, $2)
            RETURNING id, code, start_time, end_time, total_ms
            "#,
        )
        .bind(code)
        .bind(started_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            // The unique constraint on code is the source of truth for
            // one-row-per-code; losing the insert race means the code was
            // already used, not a server fault.
            sqlx::Error::Database(db) if db.is_unique_violation() => AppError::CodeAlreadyUsed,
            _ => AppError::db("Failed to insert work session", e),
        })
    }

    async fn end_session(&self, code: &str, ended_at: DateTime<Utc>) -> Result<Option<WorkSession>, AppError> {
        // The `end_time IS NULL` guard makes the close conditional: of two
        // concurrent closers only one matches the row, the other sees zero
        // rows and reports "no active session".
        Ok(sqlx::query_as::<_, WorkSession>(
            r#"
            UPDATE work_session
            SET end_time = $2,
                total_ms = (EXTRACT(EPOCH FROM ($2::timestamptz - start_time)) * 1000)::BIGINT
            WHERE code = $1
              AND end_time IS NULL
            RETURNING id, code, start_time, end_time, total_ms
            "#,
        )
        .bind(code)
        .bind(ended_at)
        .fetch_optional(&self.pool)
        .await?)
    }
}
