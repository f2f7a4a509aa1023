use std::sync::Arc;

use serde_json::{json, Map, Value};
use tracing::{debug, info};
use uuid::Uuid;

use auth_cell::{CredentialService, Identity, LoginResponse, PasswordService};
use shared_database::{DatabaseError, SupabaseClient};
use shared_models::auth::Role;
use shared_utils::AppState;

use crate::models::{
    Doctor, DoctorError, DoctorProfileChanges, DoctorRole, DoctorStatus, NewDoctor, DOCTOR_COLUMNS,
};

pub struct DoctorService {
    supabase: Arc<SupabaseClient>,
    credentials: CredentialService,
}

impl DoctorService {
    pub fn new(state: &AppState) -> Self {
        Self {
            supabase: state.db.clone(),
            credentials: CredentialService::new(state),
        }
    }

    pub async fn register(&self, doctor: NewDoctor) -> Result<Identity, DoctorError> {
        let mut profile = Map::new();
        profile.insert("name".into(), json!(doctor.name));
        profile.insert("specialization".into(), json!(doctor.specialization));
        profile.insert("experience".into(), json!(doctor.experience));
        profile.insert("phone".into(), json!(doctor.phone));
        profile.insert("status".into(), json!(DoctorStatus::Available));
        profile.insert("role".into(), json!(DoctorRole::Doctor));
        profile.insert("appointments".into(), json!([]));

        let identity = self.credentials
            .register(Role::Doctor, &doctor.email, profile, &doctor.password)
            .await?;

        Ok(identity)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, DoctorError> {
        Ok(self.credentials.login(Role::Doctor, email, password).await?)
    }

    pub async fn list_doctors(&self) -> Result<Vec<Doctor>, DoctorError> {
        let query = format!("select={}&order=name.asc", DOCTOR_COLUMNS);
        let doctors: Vec<Doctor> = self.supabase.select("doctors", &query).await?;

        debug!("Found {} doctors", doctors.len());
        Ok(doctors)
    }

    pub async fn find_doctor(&self, doctor_id: Uuid) -> Result<Option<Doctor>, DoctorError> {
        let query = format!("id=eq.{}&select={}", doctor_id, DOCTOR_COLUMNS);
        let mut rows: Vec<Doctor> = self.supabase.select("doctors", &query).await?;

        Ok(rows.pop())
    }

    pub async fn get_profile(&self, doctor_id: Uuid) -> Result<Doctor, DoctorError> {
        self.find_doctor(doctor_id).await?.ok_or(DoctorError::NotFound)
    }

    /// Applies only the supplied fields. A new password is hashed before it
    /// is written.
    pub async fn update_profile(
        &self,
        doctor_id: Uuid,
        changes: DoctorProfileChanges,
    ) -> Result<Doctor, DoctorError> {
        if changes.is_empty() {
            return Err(DoctorError::NoChanges);
        }

        let mut update = Map::new();
        if let Some(name) = changes.name {
            update.insert("name".into(), json!(name));
        }
        if let Some(email) = changes.email {
            update.insert("email".into(), json!(email));
        }
        if let Some(password) = changes.password {
            update.insert("password".into(), json!(PasswordService::hash_password(&password)?));
        }
        if let Some(specialization) = changes.specialization {
            update.insert("specialization".into(), json!(specialization));
        }
        if let Some(experience) = changes.experience {
            update.insert("experience".into(), json!(experience));
        }
        if let Some(phone) = changes.phone {
            update.insert("phone".into(), json!(phone));
        }
        if let Some(shift) = changes.shift {
            update.insert("shift".into(), json!(shift));
        }

        debug!("Updating doctor {} fields: {:?}", doctor_id, update.keys().collect::<Vec<_>>());

        let filter = format!("id=eq.{}&select={}", doctor_id, DOCTOR_COLUMNS);
        let mut rows: Vec<Doctor> = self.supabase
            .update("doctors", &filter, Value::Object(update))
            .await
            .map_err(|e| match e {
                DatabaseError::Conflict(_) => DoctorError::DuplicateEmail,
                other => DoctorError::Database(other),
            })?;

        let doctor = rows.pop().ok_or(DoctorError::NotFound)?;
        info!("Doctor {} profile updated", doctor.id);
        Ok(doctor)
    }
}
