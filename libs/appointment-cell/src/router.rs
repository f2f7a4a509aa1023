use std::sync::Arc;

use axum::{
    Router,
    routing::{delete, get, post},
    middleware,
};

use shared_utils::extractor::auth_middleware;
use shared_utils::AppState;

use crate::handlers;

pub fn appointment_routes(state: Arc<AppState>) -> Router {
    // Every appointment route requires a session
    Router::new()
        .route("/appointment", post(handlers::create_appointment))
        .route("/appointment/{id}", delete(handlers::delete_appointment))
        .route("/appointments", get(handlers::get_appointments))
        .route("/appointments/all", get(handlers::get_all_appointments))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
