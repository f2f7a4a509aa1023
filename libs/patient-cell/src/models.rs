use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use auth_cell::AuthError;
use shared_database::DatabaseError;
use shared_models::error::AppError;

pub const PATIENT_COLUMNS: &str = "id,name,email,phone,age,gender,appointments";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub age: i32,
    pub gender: String,
    #[serde(default)]
    pub appointments: Vec<Uuid>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterPatientRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub age: i32,
    pub gender: String,
}

/// Registration input after boundary validation.
#[derive(Debug, Clone)]
pub struct NewPatient {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub age: i32,
    pub gender: String,
}

#[derive(Debug, Error)]
pub enum PatientError {
    #[error("Patient not found")]
    NotFound,

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<PatientError> for AppError {
    fn from(err: PatientError) -> Self {
        match err {
            PatientError::NotFound => AppError::NotFound(err.to_string()),
            PatientError::Auth(auth) => auth.into(),
            PatientError::Database(db) => db.into(),
        }
    }
}
