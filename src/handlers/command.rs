use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::{Command, Payload, SlotName};
use crate::services::assistant;
use crate::state::AppState;

// POST /api/voice/process-command
#[derive(Deserialize)]
pub struct CommandRequest {
    pub text: String,
}

#[derive(Serialize)]
pub struct CommandResponse {
    command: String,
    interpretation: Command,
    confidence: f32,
    response: String,
    data: Option<Payload>,
    missing: Vec<SlotName>,
    timestamp: String,
}

pub async fn process_command(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CommandRequest>,
) -> Result<Json<CommandResponse>, AppError> {
    let text = body.text.trim();
    if text.is_empty() {
        return Err(AppError::BadRequest("text must not be empty".to_string()));
    }

    let now = super::clinic_now();
    let (command, response) = assistant::process_command(&state, text, now);

    Ok(Json(CommandResponse {
        command: text.to_string(),
        confidence: command.confidence,
        missing: command.missing_required.iter().copied().collect(),
        interpretation: command,
        response: response.text,
        data: response.payload,
        timestamp: now.format("%Y-%m-%dT%H:%M:%S").to_string(),
    }))
}
