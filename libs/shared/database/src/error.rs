use reqwest::StatusCode;
use thiserror::Error;

use shared_models::error::AppError;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Request to store failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unique constraint violated: {0}")]
    Conflict(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("API error ({status}): {message}")]
    Api { status: StatusCode, message: String },

    #[error("Unexpected row shape: {0}")]
    Decode(#[from] serde_json::Error),
}

impl DatabaseError {
    pub fn from_status(status: StatusCode, message: String) -> Self {
        match status.as_u16() {
            409 => DatabaseError::Conflict(message),
            404 => DatabaseError::NotFound(message),
            _ => DatabaseError::Api { status, message },
        }
    }
}

impl From<DatabaseError> for AppError {
    fn from(err: DatabaseError) -> Self {
        AppError::Database(err.to_string())
    }
}
