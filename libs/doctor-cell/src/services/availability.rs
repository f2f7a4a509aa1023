use std::sync::Arc;

use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use appointment_cell::AppointmentLifecycleService;
use shared_database::SupabaseClient;
use shared_utils::AppState;

use crate::models::{DoctorError, DoctorStatus};

#[derive(serde::Deserialize)]
struct StatusRow {
    status: DoctorStatus,
}

pub struct AvailabilityService {
    supabase: Arc<SupabaseClient>,
    lifecycle: AppointmentLifecycleService,
}

impl AvailabilityService {
    pub fn new(state: &AppState) -> Self {
        Self {
            supabase: state.db.clone(),
            lifecycle: AppointmentLifecycleService::new(state),
        }
    }

    /// Overwrites the doctor's status whatever it was before.
    pub async fn set_status(&self, doctor_id: Uuid, status: DoctorStatus) -> Result<DoctorStatus, DoctorError> {
        let filter = format!("id=eq.{}&select=status", doctor_id);
        let mut rows: Vec<StatusRow> = self.supabase
            .update("doctors", &filter, json!({ "status": status }))
            .await?;

        let row = rows.pop().ok_or(DoctorError::NotFound)?;
        info!("Doctor {} is now {}", doctor_id, row.status.as_str());
        Ok(row.status)
    }

    /// Marks the doctor off-duty, then sends their scheduled appointments
    /// back to pending. The two writes are not atomic.
    pub async fn set_off_duty(&self, doctor_id: Uuid) -> Result<DoctorStatus, DoctorError> {
        let status = self.set_status(doctor_id, DoctorStatus::OffDuty).await?;

        let moved = self.lifecycle.reset_scheduled_to_pending(doctor_id).await.map_err(|e| {
            warn!("Doctor {} is off-duty but the appointment reset failed: {}", doctor_id, e);
            e
        })?;
        info!("Doctor {} went off-duty, {} appointments back to pending", doctor_id, moved);

        Ok(status)
    }
}
