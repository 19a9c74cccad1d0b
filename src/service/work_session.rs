use crate::database::work_session::WorkSessionRepository;
use crate::error::app_error::AppError;
use crate::models::work_session::WorkSession;
use chrono::Utc;

pub struct WorkSessionService<'a, R: WorkSessionRepository> {
    repository: &'a R,
}

impl<'a, R: WorkSessionRepository> WorkSessionService<'a, R> {
    pub fn new(repository: &'a R) -> Self {
        WorkSessionService { repository }
    }

    /// Clock in. A code is single-use: any existing row for it, open or
    /// closed, rejects the start.
    pub async fn start(&self, code: Option<&str>) -> Result<WorkSession, AppError> {
        let code = require_code(code)?;

        // Check order matches the client contract: a used code reads as
        // "invalid code", an open one as "already active". The second guard
        // is unreachable while the first covers every row, and both are
        // read-then-write: when two starts race past them, the unique
        // constraint in start_session decides the winner.
        if self.repository.find_by_code(code).await?.is_some() {
            return Err(AppError::CodeAlreadyUsed);
        }
        if self.repository.find_active(code).await?.is_some() {
            return Err(AppError::SessionAlreadyActive);
        }

        self.repository.start_session(code, Utc::now()).await
    }

    /// Clock out. Closes the open row for the code, stamping end time and
    /// total duration in one conditional write.
    pub async fn end(&self, code: Option<&str>) -> Result<WorkSession, AppError> {
        let code = require_code(code)?;

        self.repository
            .end_session(code, Utc::now())
            .await?
            .ok_or(AppError::NoActiveSession)
    }

    /// The open session for a code, if any. "Nothing active" is a `None`,
    /// never an error.
    pub async fn active(&self, code: &str) -> Result<Option<WorkSession>, AppError> {
        self.repository.find_active(code).await
    }
}

fn require_code(code: Option<&str>) -> Result<&str, AppError> {
    match code {
        Some(code) if !code.is_empty() => Ok(code),
        _ => Err(AppError::MissingCode),
    }
}
