use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::models::SlotName;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),
}

impl From<anyhow::Error> for AppError {
    fn from(e: anyhow::Error) -> Self {
        AppError::Internal(format!("{e:#}"))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = serde_json::json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

pub const CLARIFICATION: &str = "I'm sorry, I didn't understand that command. \
Try asking me to book an appointment (\"Book an appointment for John Doe at 3 PM tomorrow\"), \
show patient information (\"Show last visit for Ahmed Raza\"), \
list appointments (\"Show today's appointments\") or list patients (\"List all patients\").";

/// Reasons a command could not be carried out. The display text is the
/// reply read back to the user.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CommandError {
    #[error("{}", CLARIFICATION)]
    UnclassifiedIntent,

    #[error("I need the {} to {}. Please say it again with the {}.", join_labels(.slots), .action, join_labels(.slots))]
    MissingSlot {
        slots: Vec<SlotName>,
        action: &'static str,
    },

    #[error("I couldn't work out the date or time from \"{0}\". Could you restate it, for example \"tomorrow at 3 PM\"?")]
    DateTimeUnresolvable(String),

    #[error("I couldn't find a patient record for {0}.")]
    EntityNotFound(String),

    #[error("Sorry, something went wrong while handling that request. Please try again.")]
    Store(String),
}

impl CommandError {
    /// Underlying cause for failures that should be logged.
    pub fn cause(&self) -> Option<&str> {
        match self {
            CommandError::Store(cause) => Some(cause),
            _ => None,
        }
    }
}

fn join_labels(slots: &[SlotName]) -> String {
    let labels: Vec<&str> = slots.iter().map(SlotName::label).collect();
    match labels.as_slice() {
        [] => String::new(),
        [one] => one.to_string(),
        [init @ .., last] => format!("{} and {last}", init.join(", ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_slot_message_names_each_field() {
        let err = CommandError::MissingSlot {
            slots: vec![SlotName::PatientName, SlotName::DateTime],
            action: "book an appointment",
        };
        assert_eq!(
            err.to_string(),
            "I need the patient name and appointment time to book an appointment. \
             Please say it again with the patient name and appointment time."
        );
    }

    #[test]
    fn test_join_labels() {
        assert_eq!(join_labels(&[SlotName::PatientName]), "patient name");
        assert_eq!(
            join_labels(&[SlotName::PatientName, SlotName::DoctorName, SlotName::DateTime]),
            "patient name, doctor's name and appointment time"
        );
    }

    #[test]
    fn test_store_error_hides_cause() {
        let err = CommandError::Store("disk I/O error".to_string());
        assert!(!err.to_string().contains("disk"));
        assert_eq!(err.cause(), Some("disk I/O error"));
    }
}
