use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::{Appointment, AppointmentFilter};
use crate::state::AppState;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

// GET /api/appointments
#[derive(Deserialize)]
pub struct AppointmentsQuery {
    pub date: Option<String>,
    pub patient: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Serialize)]
pub struct AppointmentsResponse {
    appointments: Vec<Appointment>,
}

pub async fn list_appointments(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AppointmentsQuery>,
) -> Result<Json<AppointmentsResponse>, AppError> {
    let on_date = query
        .date
        .as_deref()
        .filter(|d| !d.is_empty())
        .map(|d| {
            NaiveDate::parse_from_str(d, "%Y-%m-%d")
                .map_err(|_| AppError::BadRequest(format!("invalid date: {d}")))
        })
        .transpose()?;

    let filter = AppointmentFilter {
        on_date,
        limit: Some(query.limit.unwrap_or(50).clamp(1, 500)),
        ..AppointmentFilter::default()
    }
    .for_patient(query.patient.as_deref().filter(|p| !p.trim().is_empty()));

    let appointments = state.store.list_appointments(&filter)?;
    Ok(Json(AppointmentsResponse { appointments }))
}

// POST /api/appointments/create
#[derive(Deserialize)]
pub struct CreateAppointmentRequest {
    pub patient_name: String,
    pub doctor_name: Option<String>,
    pub appointment_time: String,
    pub notes: Option<String>,
}

#[derive(Serialize)]
pub struct CreateAppointmentResponse {
    appointment_id: String,
    status: &'static str,
}

pub async fn create_appointment(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateAppointmentRequest>,
) -> Result<Json<CreateAppointmentResponse>, AppError> {
    let patient = body.patient_name.trim();
    if patient.is_empty() {
        return Err(AppError::BadRequest("patient_name is required".to_string()));
    }

    let at = parse_datetime(body.appointment_time.trim()).ok_or_else(|| {
        AppError::BadRequest(format!("invalid appointment_time: {}", body.appointment_time))
    })?;

    let doctor = body
        .doctor_name
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or(state.config.default_doctor.as_str());

    let appointment = Appointment::scheduled(patient, doctor, at, body.notes, super::clinic_now());
    state.store.create_appointment(&appointment)?;

    tracing::info!(
        appointment_id = %appointment.id,
        patient = patient,
        doctor = doctor,
        "appointment created"
    );

    Ok(Json(CreateAppointmentResponse {
        appointment_id: appointment.id,
        status: "created",
    }))
}

fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_datetime_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(14, 0, 0)
            .unwrap();
        for s in ["2024-01-02T14:00:00", "2024-01-02T14:00", "2024-01-02 14:00:00", "2024-01-02 14:00"] {
            assert_eq!(parse_datetime(s), Some(expected), "{s}");
        }
        assert_eq!(parse_datetime("tomorrow at 2"), None);
    }
}
