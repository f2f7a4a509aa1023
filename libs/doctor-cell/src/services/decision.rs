use tracing::debug;
use uuid::Uuid;

use appointment_cell::{AppointmentBookingService, AppointmentLifecycleService, Decision};
use shared_utils::AppState;

use crate::models::{AppointmentDecisionResponse, DoctorError};
use crate::services::DoctorService;

/// A doctor's answer to a pending request. Only the appointment changes;
/// the doctor's availability is reported back as it stands.
pub struct AppointmentDecisionService {
    doctors: DoctorService,
    bookings: AppointmentBookingService,
    lifecycle: AppointmentLifecycleService,
}

impl AppointmentDecisionService {
    pub fn new(state: &AppState) -> Self {
        Self {
            doctors: DoctorService::new(state),
            bookings: AppointmentBookingService::new(state),
            lifecycle: AppointmentLifecycleService::new(state),
        }
    }

    pub async fn decide(
        &self,
        doctor_id: Uuid,
        appointment_id: Uuid,
        decision: Decision,
    ) -> Result<AppointmentDecisionResponse, DoctorError> {
        let doctor = self.doctors.find_doctor(doctor_id).await?;
        let appointment = self.bookings.find_appointment(appointment_id).await?;

        let (Some(doctor), Some(_)) = (doctor, appointment) else {
            debug!("Decision on {} by {}: doctor or appointment missing", appointment_id, doctor_id);
            return Err(DoctorError::DoctorOrAppointmentNotFound);
        };

        let appointment = self.lifecycle.apply_decision(appointment_id, decision).await?;

        Ok(AppointmentDecisionResponse {
            doctor_status: doctor.status,
            appointment_status: appointment.status,
        })
    }
}
