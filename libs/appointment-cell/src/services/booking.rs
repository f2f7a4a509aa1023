use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{debug, info};
use uuid::Uuid;

use shared_database::SupabaseClient;
use shared_models::auth::Role;
use shared_utils::AppState;

use crate::models::{
    Appointment, AppointmentError, AppointmentStatus, AppointmentView, NewAppointment,
};
use crate::services::references::{self, Owner};

/// Columns for a populated appointment: the row plus a narrowed doctor and patient.
pub const APPOINTMENT_VIEW_SELECT: &str =
    "*,doctor:doctors(id,name,specialization),patient:patients(id,name,email)";

pub struct AppointmentBookingService {
    supabase: Arc<SupabaseClient>,
}

impl AppointmentBookingService {
    pub fn new(state: &AppState) -> Self {
        Self {
            supabase: state.db.clone(),
        }
    }

    async fn exists(&self, table: &str, id: Uuid) -> Result<bool, AppointmentError> {
        let query = format!("id=eq.{}&select=id", id);
        let rows: Vec<Value> = self.supabase.select(table, &query).await?;
        Ok(!rows.is_empty())
    }

    pub async fn find_appointment(&self, appointment_id: Uuid) -> Result<Option<Appointment>, AppointmentError> {
        let query = format!("id=eq.{}", appointment_id);
        let mut rows: Vec<Appointment> = self.supabase.select("appointments", &query).await?;
        Ok(rows.pop())
    }

    /// Books a new appointment in `Pending` and links it from both parties.
    ///
    /// Both parties are checked before the insert. The two link updates that
    /// follow are separate writes with no rollback: if one fails, or the party
    /// disappears in between (reported as not found), the appointment row
    /// stays but is missing from that party's list.
    pub async fn create_appointment(&self, request: NewAppointment) -> Result<Appointment, AppointmentError> {
        debug!(
            "Booking appointment for patient {} with doctor {} on {} {}",
            request.patient_id, request.doctor_id, request.date, request.time
        );

        if !self.exists(Owner::Doctor.table(), request.doctor_id).await? {
            return Err(AppointmentError::DoctorNotFound);
        }
        if !self.exists(Owner::Patient.table(), request.patient_id).await? {
            return Err(AppointmentError::PatientNotFound);
        }

        let row = json!({
            "doctor_id": request.doctor_id,
            "patient_id": request.patient_id,
            "date": request.date.format("%Y-%m-%d").to_string(),
            "time": request.time,
            "problem": request.problem,
            "emergency": request.emergency,
            "status": AppointmentStatus::Pending,
        });

        let appointment: Appointment = self.supabase.insert("appointments", row).await?;

        if !references::push(&self.supabase, Owner::Doctor, appointment.doctor_id, appointment.id).await? {
            return Err(AppointmentError::DoctorNotFound);
        }
        if !references::push(&self.supabase, Owner::Patient, appointment.patient_id, appointment.id).await? {
            return Err(AppointmentError::PatientNotFound);
        }

        info!("Appointment {} booked", appointment.id);
        Ok(appointment)
    }

    pub async fn list_for_user(&self, role: Role, user_id: Uuid) -> Result<Vec<AppointmentView>, AppointmentError> {
        debug!("Listing appointments for {} {}", role, user_id);

        let column = match role {
            Role::Doctor => "doctor_id",
            Role::Patient => "patient_id",
        };
        let query = format!("{}=eq.{}&select={}", column, user_id, APPOINTMENT_VIEW_SELECT);

        Ok(self.supabase.select("appointments", &query).await?)
    }

    /// Every appointment, emergencies first, then soonest date first.
    pub async fn list_all(&self) -> Result<Vec<AppointmentView>, AppointmentError> {
        debug!("Listing all appointments");

        let query = format!("select={}&order=emergency.desc,date.asc", APPOINTMENT_VIEW_SELECT);
        Ok(self.supabase.select("appointments", &query).await?)
    }

    /// Unlinks the appointment from both parties, then deletes it.
    pub async fn delete_appointment(&self, appointment_id: Uuid) -> Result<(), AppointmentError> {
        debug!("Deleting appointment {}", appointment_id);

        let appointment = self
            .find_appointment(appointment_id)
            .await?
            .ok_or(AppointmentError::NotFound)?;

        references::pull(&self.supabase, Owner::Doctor, appointment.doctor_id, appointment.id).await?;
        references::pull(&self.supabase, Owner::Patient, appointment.patient_id, appointment.id).await?;

        let filter = format!("id=eq.{}", appointment_id);
        let deleted: Vec<Appointment> = self.supabase.delete("appointments", &filter).await?;
        if deleted.is_empty() {
            return Err(AppointmentError::NotFound);
        }

        info!("Appointment {} deleted", appointment_id);
        Ok(())
    }
}
