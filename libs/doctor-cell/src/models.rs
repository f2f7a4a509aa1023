use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use appointment_cell::{AppointmentError, AppointmentStatus};
use auth_cell::AuthError;
use shared_database::DatabaseError;
use shared_models::error::AppError;

/// Every doctor column except the password hash.
pub const DOCTOR_COLUMNS: &str =
    "id,name,email,specialization,experience,phone,appointments,status,role,shift";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub specialization: String,
    pub experience: i32,
    pub phone: String,
    #[serde(default)]
    pub appointments: Vec<Uuid>,
    #[serde(default)]
    pub status: DoctorStatus,
    #[serde(default)]
    pub role: DoctorRole,
    pub shift: Option<Shift>,
}

/// Availability, independent of any single appointment's status.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum DoctorStatus {
    #[default]
    Available,
    Busy,
    OffDuty,
}

impl DoctorStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DoctorStatus::Available => "available",
            DoctorStatus::Busy => "busy",
            DoctorStatus::OffDuty => "off-duty",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DoctorRole {
    #[default]
    Doctor,
    Admin,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Shift {
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterDoctorRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub specialization: String,
    pub experience: i32,
    pub phone: String,
}

/// Registration input after boundary validation.
#[derive(Debug, Clone)]
pub struct NewDoctor {
    pub name: String,
    pub email: String,
    pub password: String,
    pub specialization: String,
    pub experience: i32,
    pub phone: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDoctorRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub specialization: Option<String>,
    pub experience: Option<i32>,
    pub phone: Option<String>,
    pub shift_start: Option<String>,
    pub shift_end: Option<String>,
}

/// Sparse profile update. `shift`, when present, replaces the stored shift whole.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DoctorProfileChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub specialization: Option<String>,
    pub experience: Option<i32>,
    pub phone: Option<String>,
    pub shift: Option<Shift>,
}

impl DoctorProfileChanges {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DoctorStatusResponse {
    pub status: DoctorStatus,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentDecisionResponse {
    pub doctor_status: DoctorStatus,
    pub appointment_status: AppointmentStatus,
}

#[derive(Debug, Error)]
pub enum DoctorError {
    #[error("Doctor not found")]
    NotFound,

    #[error("Doctor or Appointment not found")]
    DoctorOrAppointmentNotFound,

    #[error("Doctor already exists")]
    DuplicateEmail,

    #[error("No fields to update")]
    NoChanges,

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Appointment(#[from] AppointmentError),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<DoctorError> for AppError {
    fn from(err: DoctorError) -> Self {
        match err {
            DoctorError::NotFound | DoctorError::DoctorOrAppointmentNotFound => {
                AppError::NotFound(err.to_string())
            }
            DoctorError::DuplicateEmail => AppError::Conflict(err.to_string()),
            DoctorError::NoChanges => AppError::ValidationError(err.to_string()),
            DoctorError::Auth(auth) => auth.into(),
            DoctorError::Appointment(appointment) => appointment.into(),
            DoctorError::Database(db) => db.into(),
        }
    }
}
