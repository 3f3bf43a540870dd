use std::env;

use chrono::NaiveTime;

use crate::services::nlp::classifier::{default_vocabulary, IntentVocabulary};
use crate::services::nlp::datetime::MeridiemPolicy;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub default_doctor: String,
    pub default_appointment_time: NaiveTime,
    pub meridiem: MeridiemPolicy,
    pub seed_demo_data: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "assistx.db".to_string()),
            default_doctor: env::var("DEFAULT_DOCTOR")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| "Dr. Smith".to_string()),
            default_appointment_time: env::var("DEFAULT_APPOINTMENT_TIME")
                .ok()
                .and_then(|v| NaiveTime::parse_from_str(&v, "%H:%M").ok())
                .unwrap_or_else(default_time),
            meridiem: env::var("PM_HOURS")
                .ok()
                .and_then(|v| MeridiemPolicy::parse(&v))
                .unwrap_or_default(),
            seed_demo_data: env::var("SEED_DEMO_DATA")
                .map(|v| !matches!(v.to_lowercase().as_str(), "0" | "false" | "no"))
                .unwrap_or(true),
        }
    }

    pub fn interpreter_config(&self) -> InterpreterConfig {
        InterpreterConfig {
            default_doctor: self.default_doctor.clone(),
            default_time: self.default_appointment_time,
            meridiem: self.meridiem,
            vocabulary: default_vocabulary(),
        }
    }
}

/// Read-only settings for the command interpreter, built once at startup.
#[derive(Clone, Debug)]
pub struct InterpreterConfig {
    pub default_doctor: String,
    /// Time of day used when a date is given without one.
    pub default_time: NaiveTime,
    pub meridiem: MeridiemPolicy,
    pub vocabulary: Vec<IntentVocabulary>,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            default_doctor: "Dr. Smith".to_string(),
            default_time: default_time(),
            meridiem: MeridiemPolicy::default(),
            vocabulary: default_vocabulary(),
        }
    }
}

fn default_time() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default()
}
