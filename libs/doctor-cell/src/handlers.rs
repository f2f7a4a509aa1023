use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};

use appointment_cell::Decision;
use auth_cell::{Identity, LoginRequest, LoginResponse};
use shared_models::error::AppError;
use shared_models::response::ApiResponse;
use shared_utils::extractor::json_body;
use shared_utils::validation::{
    parse_id, parse_time_of_day, require_non_negative, require_present, require_text,
    validate_email,
};
use shared_utils::AppState;

use crate::models::{
    AppointmentDecisionResponse, Doctor, DoctorProfileChanges, DoctorStatus, DoctorStatusResponse,
    NewDoctor, RegisterDoctorRequest, Shift, UpdateDoctorRequest,
};
use crate::services::{AppointmentDecisionService, AvailabilityService, DoctorService};

impl TryFrom<RegisterDoctorRequest> for NewDoctor {
    type Error = AppError;

    fn try_from(request: RegisterDoctorRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: require_text("name", &request.name)?.to_string(),
            email: validate_email(&request.email)?,
            password: require_present("password", &request.password)?.to_string(),
            specialization: require_text("specialization", &request.specialization)?.to_string(),
            experience: require_non_negative("experience", request.experience)?,
            phone: require_text("phone", &request.phone)?.to_string(),
        })
    }
}

/// Blank strings count as "not supplied".
fn supplied(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl TryFrom<UpdateDoctorRequest> for DoctorProfileChanges {
    type Error = AppError;

    fn try_from(request: UpdateDoctorRequest) -> Result<Self, Self::Error> {
        let shift_start = supplied(request.shift_start)
            .map(|t| parse_time_of_day("shiftStart", &t))
            .transpose()?;
        let shift_end = supplied(request.shift_end)
            .map(|t| parse_time_of_day("shiftEnd", &t))
            .transpose()?;
        let shift = (shift_start.is_some() || shift_end.is_some()).then(|| Shift {
            start: shift_start,
            end: shift_end,
        });

        Ok(Self {
            name: supplied(request.name),
            email: supplied(request.email).map(|e| validate_email(&e)).transpose()?,
            password: request.password.filter(|p| !p.trim().is_empty()),
            specialization: supplied(request.specialization),
            experience: request
                .experience
                .map(|e| require_non_negative("experience", e))
                .transpose()?,
            phone: supplied(request.phone),
            shift,
        })
    }
}

#[axum::debug_handler]
pub async fn register_doctor(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RegisterDoctorRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Identity>>, AppError> {
    let doctor = NewDoctor::try_from(json_body(payload)?)?;
    let identity = DoctorService::new(&state).register(doctor).await?;

    Ok(Json(ApiResponse::with_message(identity, "Doctor registered successfully")))
}

#[axum::debug_handler]
pub async fn login_doctor(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<LoginResponse>>, AppError> {
    let request = json_body(payload)?;
    let email = validate_email(&request.email)?;
    let password = require_present("password", &request.password)?;

    let session = DoctorService::new(&state).login(&email, password).await?;

    Ok(Json(ApiResponse::with_message(session, "Doctor logged in successfully")))
}

#[axum::debug_handler]
pub async fn get_all_doctors(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<Doctor>>>, AppError> {
    let doctors = DoctorService::new(&state).list_doctors().await?;
    Ok(Json(ApiResponse::data(doctors)))
}

#[axum::debug_handler]
pub async fn get_doctor_profile(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<String>,
) -> Result<Json<ApiResponse<Doctor>>, AppError> {
    let doctor_id = parse_id("doctor id", &doctor_id)?;
    let doctor = DoctorService::new(&state).get_profile(doctor_id).await?;

    Ok(Json(ApiResponse::data(doctor)))
}

#[axum::debug_handler]
pub async fn update_doctor_profile(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<String>,
    payload: Result<Json<UpdateDoctorRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Doctor>>, AppError> {
    let doctor_id = parse_id("doctor id", &doctor_id)?;
    let changes = DoctorProfileChanges::try_from(json_body(payload)?)?;

    let doctor = DoctorService::new(&state)
        .update_profile(doctor_id, changes)
        .await?;

    Ok(Json(ApiResponse::with_message(doctor, "Doctor profile updated successfully")))
}

async fn change_status(
    state: &AppState,
    doctor_id: &str,
    status: DoctorStatus,
    message: &str,
) -> Result<Json<ApiResponse<DoctorStatusResponse>>, AppError> {
    let doctor_id = parse_id("doctor id", doctor_id)?;
    let availability = AvailabilityService::new(state);

    let status = match status {
        DoctorStatus::OffDuty => availability.set_off_duty(doctor_id).await?,
        other => availability.set_status(doctor_id, other).await?,
    };

    Ok(Json(ApiResponse::with_message(DoctorStatusResponse { status }, message)))
}

#[axum::debug_handler]
pub async fn set_available(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<String>,
) -> Result<Json<ApiResponse<DoctorStatusResponse>>, AppError> {
    change_status(&state, &doctor_id, DoctorStatus::Available, "Doctor is now available").await
}

#[axum::debug_handler]
pub async fn set_busy(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<String>,
) -> Result<Json<ApiResponse<DoctorStatusResponse>>, AppError> {
    change_status(&state, &doctor_id, DoctorStatus::Busy, "Doctor is now busy").await
}

#[axum::debug_handler]
pub async fn set_off_duty(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<String>,
) -> Result<Json<ApiResponse<DoctorStatusResponse>>, AppError> {
    change_status(
        &state,
        &doctor_id,
        DoctorStatus::OffDuty,
        "Doctor is now off-duty and all appointments are marked as pending",
    )
    .await
}

async fn decide(
    state: &AppState,
    (doctor_id, appointment_id): (String, String),
    decision: Decision,
) -> Result<Json<ApiResponse<AppointmentDecisionResponse>>, AppError> {
    let doctor_id = parse_id("doctor id", &doctor_id)?;
    let appointment_id = parse_id("appointment id", &appointment_id)?;

    let outcome = AppointmentDecisionService::new(state)
        .decide(doctor_id, appointment_id, decision)
        .await?;

    let message = match decision {
        Decision::Accept => "Appointment accepted",
        Decision::Reject => "Appointment rejected",
    };
    Ok(Json(ApiResponse::with_message(outcome, message)))
}

#[axum::debug_handler]
pub async fn accept_appointment(
    State(state): State<Arc<AppState>>,
    Path(ids): Path<(String, String)>,
) -> Result<Json<ApiResponse<AppointmentDecisionResponse>>, AppError> {
    decide(&state, ids, Decision::Accept).await
}

#[axum::debug_handler]
pub async fn reject_appointment(
    State(state): State<Arc<AppState>>,
    Path(ids): Path<(String, String)>,
) -> Result<Json<ApiResponse<AppointmentDecisionResponse>>, AppError> {
    decide(&state, ids, Decision::Reject).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn lone_shift_start_leaves_end_empty() {
        let changes = DoctorProfileChanges::try_from(UpdateDoctorRequest {
            shift_start: Some("09:00".to_string()),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(
            changes.shift,
            Some(Shift { start: Some("09:00".to_string()), end: None })
        );
        assert_eq!(changes.name, None);
    }

    #[test]
    fn blank_fields_are_ignored() {
        let changes = DoctorProfileChanges::try_from(UpdateDoctorRequest {
            name: Some("  ".to_string()),
            phone: Some(String::new()),
            ..Default::default()
        })
        .unwrap();

        assert!(changes.is_empty());
    }

    #[test]
    fn update_rejects_bad_values() {
        assert_matches!(
            DoctorProfileChanges::try_from(UpdateDoctorRequest {
                shift_end: Some("25:99".to_string()),
                ..Default::default()
            }),
            Err(AppError::ValidationError(_))
        );
        assert_matches!(
            DoctorProfileChanges::try_from(UpdateDoctorRequest {
                experience: Some(-1),
                ..Default::default()
            }),
            Err(AppError::ValidationError(_))
        );
    }

    #[test]
    fn registration_normalises_email() {
        let doctor = NewDoctor::try_from(RegisterDoctorRequest {
            name: "Dr. X".to_string(),
            email: " DX@Clinic.com ".to_string(),
            password: "pw".to_string(),
            specialization: "Cardiology".to_string(),
            experience: 10,
            phone: "555-0100".to_string(),
        })
        .unwrap();

        assert_eq!(doctor.email, "dx@clinic.com");
    }

    #[test]
    fn passwords_keep_surrounding_whitespace() {
        let doctor = NewDoctor::try_from(RegisterDoctorRequest {
            name: "Dr. X".to_string(),
            email: "dx@clinic.com".to_string(),
            password: "  secret  ".to_string(),
            specialization: "Cardiology".to_string(),
            experience: 10,
            phone: "555-0100".to_string(),
        })
        .unwrap();
        assert_eq!(doctor.password, "  secret  ");

        let changes = DoctorProfileChanges::try_from(UpdateDoctorRequest {
            password: Some(" new pass ".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(changes.password.as_deref(), Some(" new pass "));
    }
}
