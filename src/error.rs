use log::error;
use rocket::http::Status;
use rocket::response::{Responder, Response};
use rocket::serde::json::Json;
use rocket::Request;

/// Errors from the coffee journal. Every data-access path returns these, so
/// "nothing there" (`Ok(None)` / empty) never looks like "lookup failed".
#[derive(Debug, thiserror::Error)]
pub enum JournalError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("database is not configured")]
    Unconfigured,

    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("schema setup failed: {0}")]
    Setup(String),
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    ServiceUnavailable(String),
    DatabaseError(String),
    InternalServerError(String),
}

impl ApiError {
    pub fn status(&self) -> Status {
        match self {
            ApiError::BadRequest(_) => Status::BadRequest,
            ApiError::NotFound(_) => Status::NotFound,
            ApiError::ServiceUnavailable(_) => Status::ServiceUnavailable,
            ApiError::DatabaseError(_) => Status::InternalServerError,
            ApiError::InternalServerError(_) => Status::InternalServerError,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::NotFound(msg)
            | ApiError::ServiceUnavailable(msg)
            | ApiError::DatabaseError(msg)
            | ApiError::InternalServerError(msg) => msg,
        }
    }
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, req: &'r Request<'_>) -> rocket::response::Result<'static> {
        let status = self.status();
        let body = Json(serde_json::json!({ "error": self.message() }));

        Response::build_from(body.respond_to(req)?)
            .status(status)
            .ok()
    }
}

impl From<JournalError> for ApiError {
    fn from(err: JournalError) -> Self {
        match err {
            JournalError::Validation(msg) => ApiError::BadRequest(msg),
            JournalError::NotFound(msg) => ApiError::NotFound(msg),
            JournalError::Unconfigured => {
                ApiError::ServiceUnavailable("Database is not configured".to_string())
            }
            // The cause stays in the log; callers get a generic message
            JournalError::Database(e) => {
                error!("Database error: {e}");
                ApiError::DatabaseError("Database operation failed".to_string())
            }
            JournalError::Setup(msg) => {
                error!("Schema setup failed: {msg}");
                ApiError::InternalServerError("Database setup failed".to_string())
            }
        }
    }
}

/// Parses a path id, rejecting anything that is not a positive integer
pub fn parse_id(raw: &str) -> Result<i32, ApiError> {
    raw.trim()
        .parse::<i32>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| ApiError::BadRequest(format!("Invalid id '{raw}'")))
}
