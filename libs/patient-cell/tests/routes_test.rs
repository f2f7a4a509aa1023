use axum::{
    body::Body,
    http::{header::{AUTHORIZATION, CONTENT_TYPE}, Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use auth_cell::PasswordService;
use patient_cell::patient_routes;
use shared_models::auth::Role;
use shared_utils::jwt::{issue_token, validate_token};
use shared_utils::test_utils::{MockStoreResponses, TestConfig};

async fn send(router: axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_register_patient_returns_identity() {
    let server = MockServer::start().await;
    let state = TestConfig::with_store_url(server.uri()).to_state();
    let patient_id = Uuid::new_v4();

    let mut stored = MockStoreResponses::patient_row(&patient_id.to_string(), "y@mail.com");
    stored["password"] = json!("$argon2id$stored");

    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/patients"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([stored])))
        .expect(1)
        .mount(&server)
        .await;

    let (status, body) = send(
        patient_routes(state),
        post_json("/register", json!({
            "name": "Y",
            "email": "y@mail.com",
            "password": "pw",
            "phone": "555-0199",
            "age": 34,
            "gender": "female"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Patient registered successfully");
    assert_eq!(body["data"], json!({"id": patient_id, "name": "Y", "role": "Patient"}));
}

#[tokio::test]
async fn test_register_patient_with_missing_field_is_bad_request() {
    let state = TestConfig::default().to_state();

    let (status, body) = send(
        patient_routes(state),
        post_json("/register", json!({"name": "Y", "email": "y@mail.com"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["errors"], json!([]));
}

#[tokio::test]
async fn test_login_patient_issues_patient_session() {
    let server = MockServer::start().await;
    let state = TestConfig::with_store_url(server.uri()).to_state();
    let patient_id = Uuid::new_v4();

    let mut stored = MockStoreResponses::patient_row(&patient_id.to_string(), "y@mail.com");
    stored["password"] = json!(PasswordService::hash_password("pw").unwrap());

    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .and(query_param("email", "eq.y@mail.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([stored])))
        .mount(&server)
        .await;

    let (status, body) = send(
        patient_routes(state.clone()),
        post_json("/login", json!({"email": "Y@mail.com", "password": "pw"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Patient logged in successfully");
    let token = body["data"]["token"].as_str().unwrap();
    let user = validate_token(token, &state.config.token_secret).unwrap();
    assert_eq!(user.id, patient_id.to_string());
    assert_eq!(user.role, Role::Patient);
}

#[tokio::test]
async fn test_unknown_patient_profile_is_not_found() {
    let server = MockServer::start().await;
    let state = TestConfig::with_store_url(server.uri()).to_state();

    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let token = issue_token(&Uuid::new_v4().to_string(), Role::Doctor, &state.config.token_secret).unwrap();
    let request = Request::get(format!("/profile/{}", Uuid::new_v4()))
        .header(AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(patient_routes(state), request).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Patient not found");
}

#[tokio::test]
async fn test_login_checks_the_password_exactly_as_typed() {
    let server = MockServer::start().await;
    let state = TestConfig::with_store_url(server.uri()).to_state();

    let mut stored = MockStoreResponses::patient_row(&Uuid::new_v4().to_string(), "y@mail.com");
    stored["password"] = json!(PasswordService::hash_password("  pw  ").unwrap());

    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([stored])))
        .mount(&server)
        .await;

    let (status, _) = send(
        patient_routes(state.clone()),
        post_json("/login", json!({"email": "y@mail.com", "password": "pw"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        patient_routes(state),
        post_json("/login", json!({"email": "y@mail.com", "password": "  pw  "})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}
