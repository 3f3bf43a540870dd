use std::sync::Arc;

use chrono::NaiveDateTime;

use crate::db::queries;
use crate::models::{Command, Response};
use crate::state::AppState;

/// Handles one command utterance end to end and records it in the
/// interaction log. Logging failures never change the reply.
pub fn process_command(state: &Arc<AppState>, text: &str, now: NaiveDateTime) -> (Command, Response) {
    let (command, response) = state.interpreter.respond(text, now, state.store.as_ref());

    tracing::info!(
        intent = command.intent.as_str(),
        confidence = command.confidence,
        missing = ?command.missing_required,
        "processed command"
    );

    let logged = state
        .db
        .lock()
        .map_err(|_| anyhow::anyhow!("database connection lock poisoned"))
        .and_then(|db| {
            queries::log_interaction(
                &db,
                text,
                command.intent.as_str(),
                &response.text,
                command.confidence,
            )
        });
    if let Err(e) = logged {
        tracing::warn!(error = %e, "failed to log interaction");
    }

    (command, response)
}
