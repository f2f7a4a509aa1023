use std::sync::Arc;

use axum::{
    Router,
    routing::{get, patch, post},
    middleware,
};

use shared_utils::extractor::auth_middleware;
use shared_utils::AppState;

use crate::handlers;

pub fn doctor_routes(state: Arc<AppState>) -> Router {
    let public_routes = Router::new()
        .route("/register", post(handlers::register_doctor))
        .route("/login", post(handlers::login_doctor));

    let protected_routes = Router::new()
        .route("/update/{doctor_id}", post(handlers::update_doctor_profile))
        .route("/getAlldoctors", get(handlers::get_all_doctors))
        .route("/profile/{doctor_id}", get(handlers::get_doctor_profile))
        .route("/doctor/{doctor_id}/available", patch(handlers::set_available))
        .route("/doctor/{doctor_id}/busy", patch(handlers::set_busy))
        .route("/doctor/{doctor_id}/off-duty", patch(handlers::set_off_duty))
        .route(
            "/doctor/{doctor_id}/appointment/{appointment_id}/accept",
            patch(handlers::accept_appointment),
        )
        .route(
            "/doctor/{doctor_id}/appointment/{appointment_id}/reject",
            patch(handlers::reject_appointment),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
