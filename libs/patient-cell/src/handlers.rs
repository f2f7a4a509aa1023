use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};

use auth_cell::{Identity, LoginRequest, LoginResponse};
use shared_models::error::AppError;
use shared_models::response::ApiResponse;
use shared_utils::extractor::json_body;
use shared_utils::validation::{
    parse_id, require_non_negative, require_present, require_text, validate_email,
};
use shared_utils::AppState;

use crate::models::{NewPatient, Patient, RegisterPatientRequest};
use crate::services::PatientService;

impl TryFrom<RegisterPatientRequest> for NewPatient {
    type Error = AppError;

    fn try_from(request: RegisterPatientRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: require_text("name", &request.name)?.to_string(),
            email: validate_email(&request.email)?,
            password: require_present("password", &request.password)?.to_string(),
            phone: require_text("phone", &request.phone)?.to_string(),
            age: require_non_negative("age", request.age)?,
            gender: require_text("gender", &request.gender)?.to_string(),
        })
    }
}

#[axum::debug_handler]
pub async fn register_patient(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RegisterPatientRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Identity>>, AppError> {
    let patient = NewPatient::try_from(json_body(payload)?)?;
    let identity = PatientService::new(&state).register(patient).await?;

    Ok(Json(ApiResponse::with_message(identity, "Patient registered successfully")))
}

#[axum::debug_handler]
pub async fn login_patient(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<LoginResponse>>, AppError> {
    let request = json_body(payload)?;
    let email = validate_email(&request.email)?;
    let password = require_present("password", &request.password)?;

    let session = PatientService::new(&state).login(&email, password).await?;

    Ok(Json(ApiResponse::with_message(session, "Patient logged in successfully")))
}

#[axum::debug_handler]
pub async fn get_patient_profile(
    State(state): State<Arc<AppState>>,
    Path(patient_id): Path<String>,
) -> Result<Json<ApiResponse<Patient>>, AppError> {
    let patient_id = parse_id("patient id", &patient_id)?;
    let patient = PatientService::new(&state).get_profile(patient_id).await?;

    Ok(Json(ApiResponse::data(patient)))
}
