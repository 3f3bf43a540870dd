pub mod appointments;
pub mod command;
pub mod health;
pub mod interactions;
pub mod patients;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use chrono::{Local, NaiveDateTime};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Reference time for relative expressions: the clinic's wall clock.
pub(crate) fn clinic_now() -> NaiveDateTime {
    Local::now().naive_local()
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health::health))
        .route("/api/voice/process-command", post(command::process_command))
        .route("/api/appointments", get(appointments::list_appointments))
        .route("/api/appointments/create", post(appointments::create_appointment))
        .route("/api/patients", get(patients::list_patients))
        .route("/api/patients/query", post(patients::query_patient))
        .route("/api/interactions", get(interactions::list_interactions))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
