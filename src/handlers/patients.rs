use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::{Patient, PatientRecord};
use crate::state::AppState;

// GET /api/patients
#[derive(Serialize)]
pub struct PatientsResponse {
    patients: Vec<Patient>,
}

pub async fn list_patients(
    State(state): State<Arc<AppState>>,
) -> Result<Json<PatientsResponse>, AppError> {
    let patients = state.store.list_patients()?;
    Ok(Json(PatientsResponse { patients }))
}

// POST /api/patients/query
#[derive(Deserialize)]
pub struct PatientQuery {
    pub patient_name: String,
}

#[derive(Serialize)]
pub struct PatientResponse {
    patient: PatientRecord,
}

pub async fn query_patient(
    State(state): State<Arc<AppState>>,
    Json(body): Json<PatientQuery>,
) -> Result<Json<PatientResponse>, AppError> {
    let name = body.patient_name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("patient_name is required".to_string()));
    }

    match state.store.find_patient(name, super::clinic_now())? {
        Some(patient) => Ok(Json(PatientResponse { patient })),
        None => Err(AppError::NotFound(format!("patient {name}"))),
    }
}
