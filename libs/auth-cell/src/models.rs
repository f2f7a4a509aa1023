use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use shared_database::DatabaseError;
use shared_models::auth::Role;
use shared_models::error::AppError;
use shared_utils::jwt::TokenError;

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Who an account is, as returned by registration and credential checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub id: Uuid,
    pub name: String,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub id: Uuid,
    pub name: String,
    pub role: Role,
    pub token: String,
}

/// Row shape read back when checking a password; never leaves this crate.
#[derive(Debug, Deserialize)]
pub(crate) struct CredentialRecord {
    pub id: Uuid,
    pub name: String,
    pub password: String,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0} already exists")]
    DuplicateEmail(Role),

    // Deliberately identical for unknown email and wrong password.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Could not issue session token: {0}")]
    Token(#[from] TokenError),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::DuplicateEmail(_) => AppError::Conflict(err.to_string()),
            AuthError::InvalidCredentials => AppError::Auth(err.to_string()),
            AuthError::Hashing(_) | AuthError::Token(_) => AppError::Internal(err.to_string()),
            AuthError::Database(db) => db.into(),
        }
    }
}
