use crate::database::work_session::WorkSessionRepository;
use crate::error::app_error::AppError;
use crate::models::work_session::WorkSession;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

/// In-memory stand-in for the Postgres store. Every mutation runs under one
/// lock so the mock exhibits the same write-time guarantees as the real
/// table: a duplicate code fails the insert, and only one closer can match
/// the open row.
pub struct MockRepository {
    sessions: Mutex<Vec<WorkSession>>,
}

impl MockRepository {
    pub fn new() -> Self {
        MockRepository {
            sessions: Mutex::new(Vec::new()),
        }
    }

    pub async fn row_count(&self, code: &str) -> usize {
        self.sessions.lock().await.iter().filter(|s| s.code == code).count()
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl WorkSessionRepository for MockRepository {
    async fn find_by_code(&self, code: &str) -> Result<Option<WorkSession>, AppError> {
        let sessions = self.sessions.lock().await;
        Ok(sessions.iter().find(|s| s.code == code).cloned())
    }

    async fn find_active(&self, code: &str) -> Result<Option<WorkSession>, AppError> {
        let sessions = self.sessions.lock().await;
        Ok(sessions.iter().find(|s| s.code == code && s.is_open()).cloned())
    }

    async fn start_session(&self, code: &str, started_at: DateTime<Utc>) -> Result<WorkSession, AppError> {
        let mut sessions = self.sessions.lock().await;
        if sessions.iter().any(|s| s.code == code) {
            return Err(AppError::CodeAlreadyUsed);
        }

        let session = WorkSession {
            id: Uuid::new_v4(),
            code: code.to_string(),
            start_time: started_at,
            end_time: None,
            total_ms: None,
        };
        sessions.push(session.clone());
        Ok(session)
    }

    async fn end_session(&self, code: &str, ended_at: DateTime<Utc>) -> Result<Option<WorkSession>, AppError> {
        let mut sessions = self.sessions.lock().await;
        let Some(session) = sessions.iter_mut().find(|s| s.code == code && s.is_open()) else {
            return Ok(None);
        };

        session.end_time = Some(ended_at);
        session.total_ms = Some((ended_at - session.start_time).num_milliseconds());
        Ok(Some(session.clone()))
    }
}
