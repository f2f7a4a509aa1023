use std::sync::Arc;

use serde_json::{json, Map};
use tracing::debug;
use uuid::Uuid;

use auth_cell::{CredentialService, Identity, LoginResponse};
use shared_database::SupabaseClient;
use shared_models::auth::Role;
use shared_utils::AppState;

use crate::models::{NewPatient, Patient, PatientError, PATIENT_COLUMNS};

pub struct PatientService {
    supabase: Arc<SupabaseClient>,
    credentials: CredentialService,
}

impl PatientService {
    pub fn new(state: &AppState) -> Self {
        Self {
            supabase: state.db.clone(),
            credentials: CredentialService::new(state),
        }
    }

    pub async fn register(&self, patient: NewPatient) -> Result<Identity, PatientError> {
        let mut profile = Map::new();
        profile.insert("name".into(), json!(patient.name));
        profile.insert("phone".into(), json!(patient.phone));
        profile.insert("age".into(), json!(patient.age));
        profile.insert("gender".into(), json!(patient.gender));
        profile.insert("appointments".into(), json!([]));

        Ok(self.credentials
            .register(Role::Patient, &patient.email, profile, &patient.password)
            .await?)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, PatientError> {
        Ok(self.credentials.login(Role::Patient, email, password).await?)
    }

    pub async fn get_profile(&self, patient_id: Uuid) -> Result<Patient, PatientError> {
        debug!("Fetching patient profile {}", patient_id);

        let query = format!("id=eq.{}&select={}", patient_id, PATIENT_COLUMNS);
        let mut rows: Vec<Patient> = self.supabase.select("patients", &query).await?;

        rows.pop().ok_or(PatientError::NotFound)
    }
}
