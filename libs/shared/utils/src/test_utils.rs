use std::sync::Arc;
use chrono::{Duration, Utc};
use serde_json::json;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::{Role, User};

use crate::jwt::issue_token_at;
use crate::state::AppState;

pub struct TestConfig {
    pub jwt_secret: String,
    pub supabase_url: String,
    pub supabase_service_key: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            supabase_url: "http://localhost:54321".to_string(),
            supabase_service_key: "test-service-key".to_string(),
        }
    }
}

impl TestConfig {
    /// Points the store handle at a mock server.
    pub fn with_store_url(url: impl Into<String>) -> Self {
        Self {
            supabase_url: url.into(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_service_key: self.supabase_service_key.clone(),
            token_secret: self.jwt_secret.clone(),
            port: 0,
        }
    }

    pub fn to_state(&self) -> Arc<AppState> {
        Arc::new(AppState::new(self.to_app_config()))
    }
}

pub struct TestUser {
    pub id: String,
    pub role: Role,
}

impl TestUser {
    pub fn new(role: Role) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
        }
    }

    pub fn doctor() -> Self {
        Self::new(Role::Doctor)
    }

    pub fn patient() -> Self {
        Self::new(Role::Patient)
    }

    pub fn to_user(&self) -> User {
        User {
            id: self.id.clone(),
            role: self.role,
        }
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    /// Token issued `age_hours` ago; anything past the session lifetime is expired.
    pub fn create_test_token(user: &TestUser, secret: &str, age_hours: Option<i64>) -> String {
        let issued_at = Utc::now() - Duration::hours(age_hours.unwrap_or(0));
        issue_token_at(&user.id, user.role, secret, issued_at.timestamp())
            .expect("test secret is non-empty")
    }

    pub fn create_expired_token(user: &TestUser, secret: &str) -> String {
        Self::create_test_token(user, secret, Some(25))
    }

    pub fn create_invalid_signature_token(user: &TestUser) -> String {
        Self::create_test_token(user, "wrong-secret", None)
    }

    pub fn create_malformed_token() -> String {
        "invalid.token.format".to_string()
    }
}

pub struct MockStoreResponses;

impl MockStoreResponses {
    pub fn doctor_row(id: &str, email: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": "Dr. X",
            "email": email,
            "specialization": "Cardiology",
            "experience": 10,
            "phone": "555-0100",
            "appointments": [],
            "status": "available",
            "role": "doctor",
            "shift": null
        })
    }

    pub fn patient_row(id: &str, email: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": "Y",
            "email": email,
            "phone": "555-0199",
            "age": 34,
            "gender": "female",
            "appointments": []
        })
    }

    pub fn appointment_row(id: &str, doctor_id: &str, patient_id: &str, status: &str) -> serde_json::Value {
        json!({
            "id": id,
            "doctor_id": doctor_id,
            "patient_id": patient_id,
            "date": "2025-06-01",
            "time": "10:00",
            "problem": null,
            "emergency": false,
            "status": status,
            "created_at": "2025-05-01T00:00:00Z"
        })
    }

    pub fn error_response(message: &str, code: &str) -> serde_json::Value {
        json!({
            "message": message,
            "code": code
        })
    }
}
