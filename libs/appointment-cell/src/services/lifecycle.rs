use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use shared_database::SupabaseClient;
use shared_utils::AppState;

use crate::models::{Appointment, AppointmentError, AppointmentStatus, Decision};

/// Status writes on existing appointments.
///
/// Writes are unconditional: a decision is applied whatever the current
/// status is, and the doctor's own availability is never consulted.
pub struct AppointmentLifecycleService {
    supabase: Arc<SupabaseClient>,
}

impl AppointmentLifecycleService {
    pub fn new(state: &AppState) -> Self {
        Self {
            supabase: state.db.clone(),
        }
    }

    pub async fn set_status(
        &self,
        appointment_id: Uuid,
        status: AppointmentStatus,
    ) -> Result<Appointment, AppointmentError> {
        debug!("Setting appointment {} to {}", appointment_id, status);

        let filter = format!("id=eq.{}", appointment_id);
        let mut rows: Vec<Appointment> = self.supabase
            .update("appointments", &filter, json!({ "status": status }))
            .await?;

        let appointment = rows.pop().ok_or(AppointmentError::NotFound)?;
        info!("Appointment {} is now {}", appointment.id, appointment.status);
        Ok(appointment)
    }

    pub async fn apply_decision(
        &self,
        appointment_id: Uuid,
        decision: Decision,
    ) -> Result<Appointment, AppointmentError> {
        self.set_status(appointment_id, decision.target_status()).await
    }

    /// Sends every `Scheduled` appointment of the doctor back to `Pending`.
    /// Pending and Rejected appointments are untouched. Returns how many moved.
    pub async fn reset_scheduled_to_pending(&self, doctor_id: Uuid) -> Result<usize, AppointmentError> {
        let filter = format!(
            "doctor_id=eq.{}&status=eq.{}",
            doctor_id,
            AppointmentStatus::Scheduled
        );
        let rows: Vec<Appointment> = self.supabase
            .update("appointments", &filter, json!({ "status": AppointmentStatus::Pending }))
            .await?;

        info!("Reset {} scheduled appointments of doctor {} to pending", rows.len(), doctor_id);
        Ok(rows.len())
    }
}
