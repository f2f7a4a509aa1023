use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use shared_database::{DatabaseError, SupabaseClient};
use shared_models::auth::Role;
use shared_utils::jwt::issue_token;
use shared_utils::AppState;

use crate::models::{AuthError, CredentialRecord, Identity, LoginResponse};
use crate::services::password::PasswordService;

/// Table holding the accounts for a role.
pub fn accounts_table(role: Role) -> &'static str {
    match role {
        Role::Doctor => "doctors",
        Role::Patient => "patients",
    }
}

pub struct CredentialService {
    supabase: Arc<SupabaseClient>,
    token_secret: String,
}

impl CredentialService {
    pub fn new(state: &AppState) -> Self {
        Self {
            supabase: state.db.clone(),
            token_secret: state.config.token_secret.clone(),
        }
    }

    async fn find_by_email(&self, role: Role, email: &str) -> Result<Option<CredentialRecord>, AuthError> {
        let query = format!(
            "email=eq.{}&select=id,name,password",
            urlencoding::encode(email)
        );
        let mut rows: Vec<CredentialRecord> = self.supabase
            .select(accounts_table(role), &query)
            .await?;

        Ok(rows.pop())
    }

    /// Stores a new account. `profile` carries the role-specific columns;
    /// `email` and the hashed password are added here.
    pub async fn register(
        &self,
        role: Role,
        email: &str,
        mut profile: Map<String, Value>,
        raw_password: &str,
    ) -> Result<Identity, AuthError> {
        debug!("Registering {} account for: {}", role, email);

        if self.find_by_email(role, email).await?.is_some() {
            return Err(AuthError::DuplicateEmail(role));
        }

        profile.insert("email".to_string(), Value::String(email.to_string()));
        profile.insert(
            "password".to_string(),
            Value::String(PasswordService::hash_password(raw_password)?),
        );

        // Two concurrent registrations can both pass the lookup above;
        // the unique index on email settles it.
        let record: CredentialRecord = self.supabase
            .insert(accounts_table(role), Value::Object(profile))
            .await
            .map_err(|e| match e {
                DatabaseError::Conflict(_) => AuthError::DuplicateEmail(role),
                other => AuthError::Database(other),
            })?;

        info!("{} account created with ID: {}", role, record.id);

        Ok(Identity {
            id: record.id,
            name: record.name,
            role,
        })
    }

    pub async fn verify(&self, role: Role, email: &str, raw_password: &str) -> Result<Identity, AuthError> {
        let Some(record) = self.find_by_email(role, email).await? else {
            debug!("No {} account for {}", role, email);
            return Err(AuthError::InvalidCredentials);
        };

        if !PasswordService::verify_password(raw_password, &record.password)? {
            warn!("Password mismatch for {} account {}", role, record.id);
            return Err(AuthError::InvalidCredentials);
        }

        Ok(Identity {
            id: record.id,
            name: record.name,
            role,
        })
    }

    pub async fn login(&self, role: Role, email: &str, raw_password: &str) -> Result<LoginResponse, AuthError> {
        let identity = self.verify(role, email, raw_password).await?;
        let token = issue_token(&identity.id.to_string(), role, &self.token_secret)?;

        info!("{} {} logged in", role, identity.id);

        Ok(LoginResponse {
            id: identity.id,
            name: identity.name,
            role,
            token,
        })
    }
}
