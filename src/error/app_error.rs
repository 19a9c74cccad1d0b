use rocket::http::{ContentType, Status};
use rocket::response::Responder;
use rocket::{Request, Response};
use std::io::Cursor;
use thiserror::Error;
use tracing::error;

/// Every failure a handler can produce. Client-facing messages are Spanish
/// and part of the HTTP contract; database and configuration sources are
/// logged server-side and never leak past the generic message.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("El código es obligatorio")]
    MissingCode,
    #[error("El código no es válido, ya fue utilizado anteriormente")]
    CodeAlreadyUsed,
    #[error("Ya tienes una jornada activa")]
    SessionAlreadyActive,
    #[error("No tienes una jornada activa")]
    NoActiveSession,
    #[error("Error en el servidor")]
    Db {
        message: String,
        #[source]
        source: sqlx::error::Error,
    },
    #[error("Error en el servidor")]
    ConfigurationError {
        message: String,
        #[source]
        source: figment::Error,
    },
}

impl AppError {
    pub fn db(message: impl Into<String>, source: sqlx::error::Error) -> Self {
        Self::Db {
            message: message.into(),
            source,
        }
    }
}

impl From<&AppError> for Status {
    fn from(e: &AppError) -> Self {
        match e {
            AppError::MissingCode => Status::BadRequest,
            // 404 rather than 409: the reuse of a code is reported as "no
            // such valid code", matching the client contract.
            AppError::CodeAlreadyUsed => Status::NotFound,
            AppError::SessionAlreadyActive => Status::Conflict,
            AppError::NoActiveSession => Status::NotFound,
            AppError::Db { .. } => Status::InternalServerError,
            AppError::ConfigurationError { .. } => Status::InternalServerError,
        }
    }
}

impl<'r> Responder<'r, 'static> for AppError {
    fn respond_to(self, req: &Request<'_>) -> rocket::response::Result<'static> {
        let method = req.method();
        let uri = req.uri();

        let request_id = req
            .local_cache(|| None::<crate::middleware::RequestId>)
            .as_ref()
            .map(|r| r.0.as_str())
            .unwrap_or("unknown");

        error!(
            error = ?self,
            request_id = %request_id,
            method = %method,
            uri = %uri,
            "request failed"
        );

        let status = Status::from(&self);
        let body = serde_json::json!({ "error": self.to_string() }).to_string();

        Response::build()
            .status(status)
            .header(ContentType::JSON)
            .sized_body(body.len(), Cursor::new(body))
            .ok()
    }
}

impl From<figment::Error> for AppError {
    fn from(e: figment::Error) -> Self {
        AppError::ConfigurationError {
            message: "Failed to read configuration".to_string(),
            source: e,
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::db("Database error", e)
    }
}
