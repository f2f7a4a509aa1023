use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
    http::{header::AUTHORIZATION, Request},
    middleware::Next,
    response::Response,
    body::Body,
};

use shared_models::auth::{Role, User};
use shared_models::error::AppError;

use crate::jwt::{validate_token, TokenError};
use crate::state::AppState;

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        let message = match err {
            TokenError::Missing => "Bearer token is missing.",
            TokenError::Malformed(_) => "Invalid or malformed token.",
            TokenError::Expired => "Token has expired.",
        };
        AppError::Auth(message.to_string())
    }
}

/// Pulls the token out of an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header_value: &str) -> Result<&str, AppError> {
    let mut parts = header_value.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some(scheme), Some(token)) if scheme.eq_ignore_ascii_case("bearer") => Ok(token),
        _ => Err(AppError::Auth("Bearer token is missing.".to_string())),
    }
}

pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| AppError::Auth("Authorization token is missing.".to_string()))?;

    let auth_value = auth_header
        .to_str()
        .map_err(|_| AppError::Auth("Invalid or malformed token.".to_string()))?;

    let token = bearer_token(auth_value)?;
    let user = validate_token(token, &state.config.token_secret)?;

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// Turns a body rejection into a 400 with the usual envelope.
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::ValidationError(rejection.body_text()))
}

pub fn require_role(user: &User, role: Role) -> Result<(), AppError> {
    if user.role == role {
        return Ok(());
    }

    let who = match role {
        Role::Doctor => "doctors",
        Role::Patient => "patients",
    };
    Err(AppError::Forbidden(format!("Forbidden: Only {} can access this resource.", who)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use axum::{
        http::StatusCode,
        middleware,
        routing::get,
        Extension, Router,
    };
    use tower::ServiceExt;

    use crate::jwt::issue_token;
    use crate::test_utils::{JwtTestUtils, TestConfig, TestUser};

    fn app(state: Arc<AppState>) -> Router {
        Router::new()
            .route("/me", get(|Extension(user): Extension<User>| async move { user.id }))
            .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
            .with_state(state)
    }

    async fn call(state: Arc<AppState>, auth: Option<&str>) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().uri("/me");
        if let Some(value) = auth {
            builder = builder.header(AUTHORIZATION, value);
        }
        let response = app(state)
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::String(
            String::from_utf8_lossy(&bytes).into_owned(),
        ));
        (status, body)
    }

    #[tokio::test]
    async fn missing_header_is_rejected() {
        let state = TestConfig::default().to_state();
        let (status, body) = call(state, None).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Authorization token is missing.");
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn header_without_token_is_rejected() {
        let state = TestConfig::default().to_state();
        let (status, body) = call(state, Some("Bearer")).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Bearer token is missing.");
    }

    #[tokio::test]
    async fn malformed_token_is_rejected() {
        let state = TestConfig::default().to_state();
        let token = JwtTestUtils::create_malformed_token();
        let (status, body) = call(state, Some(&format!("Bearer {}", token))).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid or malformed token.");
    }

    #[tokio::test]
    async fn token_signed_with_another_secret_is_rejected() {
        let state = TestConfig::default().to_state();
        let token = JwtTestUtils::create_invalid_signature_token(&TestUser::doctor());
        let (status, body) = call(state, Some(&format!("Bearer {}", token))).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid or malformed token.");
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        let state = TestConfig::default().to_state();
        let token = JwtTestUtils::create_expired_token(&TestUser::patient(), &state.config.token_secret);
        let (status, body) = call(state, Some(&format!("Bearer {}", token))).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Token has expired.");
    }

    #[tokio::test]
    async fn valid_token_reaches_handler() {
        let state = TestConfig::default().to_state();
        let token = issue_token("doctor-1", Role::Doctor, &state.config.token_secret).unwrap();
        let (status, body) = call(state, Some(&format!("Bearer {}", token))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::Value::String("doctor-1".to_string()));
    }

    #[test]
    fn require_role_forbids_other_roles() {
        let patient = User { id: "p".to_string(), role: Role::Patient };

        assert!(require_role(&patient, Role::Patient).is_ok());
        assert_matches!(
            require_role(&patient, Role::Doctor),
            Err(AppError::Forbidden(msg)) if msg == "Forbidden: Only doctors can access this resource."
        );
    }
}
