use std::sync::Arc;

use axum::{
    extract::{rejection::{JsonRejection, QueryRejection}, Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::debug;

use shared_models::auth::{Role, User};
use shared_models::error::AppError;
use shared_models::response::ApiResponse;
use shared_utils::extractor::{json_body, require_role};
use shared_utils::validation::{parse_date, parse_id, parse_time_of_day};
use shared_utils::AppState;

use crate::models::{
    Appointment, AppointmentListQuery, AppointmentView, CreateAppointmentRequest, NewAppointment,
};
use crate::services::AppointmentBookingService;

impl TryFrom<CreateAppointmentRequest> for NewAppointment {
    type Error = AppError;

    fn try_from(request: CreateAppointmentRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            doctor_id: parse_id("doctorId", &request.doctor_id)?,
            patient_id: parse_id("patientId", &request.patient_id)?,
            date: parse_date(&request.date)?,
            time: parse_time_of_day("time", &request.time)?,
            problem: request
                .problem
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty()),
            emergency: request.emergency.unwrap_or(false),
        })
    }
}

fn parse_role(raw: Option<&str>) -> Result<Role, AppError> {
    raw.unwrap_or_default()
        .parse::<Role>()
        .map_err(|_| AppError::ValidationError(
            "Invalid role. It must be either 'Doctor' or 'Patient'.".to_string(),
        ))
}

#[axum::debug_handler]
pub async fn create_appointment(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    payload: Result<Json<CreateAppointmentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Appointment>>), AppError> {
    let request = NewAppointment::try_from(json_body(payload)?)?;
    debug!("{} {} is booking an appointment", user.role, user.id);

    let appointment = AppointmentBookingService::new(&state)
        .create_appointment(request)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::data(appointment))))
}

#[axum::debug_handler]
pub async fn get_appointments(
    State(state): State<Arc<AppState>>,
    query: Result<Query<AppointmentListQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<AppointmentView>>>, AppError> {
    let Query(query) = query.map_err(|rejection| AppError::ValidationError(rejection.body_text()))?;

    let role = parse_role(query.role.as_deref())?;
    let user_id = parse_id("id", query.id.as_deref().unwrap_or_default())?;

    let appointments = AppointmentBookingService::new(&state)
        .list_for_user(role, user_id)
        .await?;

    Ok(Json(ApiResponse::data(appointments)))
}

#[axum::debug_handler]
pub async fn get_all_appointments(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
) -> Result<Json<ApiResponse<Vec<AppointmentView>>>, AppError> {
    require_role(&user, Role::Doctor)?;

    let appointments = AppointmentBookingService::new(&state).list_all().await?;

    Ok(Json(ApiResponse::data(appointments)))
}

#[axum::debug_handler]
pub async fn delete_appointment(
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let appointment_id = parse_id("appointment id", &appointment_id)?;

    AppointmentBookingService::new(&state)
        .delete_appointment(appointment_id)
        .await?;

    Ok(Json(ApiResponse::message("Appointment deleted successfully.")))
}
