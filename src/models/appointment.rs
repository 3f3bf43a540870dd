use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Appointment {
    pub id: String,
    pub patient_name: String,
    pub doctor_name: String,
    pub appointment_time: NaiveDateTime,
    pub notes: Option<String>,
    pub status: AppointmentStatus,
    pub created_at: NaiveDateTime,
}

impl Appointment {
    /// A freshly booked appointment with a new id.
    pub fn scheduled(
        patient_name: &str,
        doctor_name: &str,
        appointment_time: NaiveDateTime,
        notes: Option<String>,
        now: NaiveDateTime,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            patient_name: patient_name.to_string(),
            doctor_name: doctor_name.to_string(),
            appointment_time,
            notes,
            status: AppointmentStatus::Scheduled,
            created_at: now,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "completed" => AppointmentStatus::Completed,
            "cancelled" => AppointmentStatus::Cancelled,
            _ => AppointmentStatus::Scheduled,
        }
    }
}

/// Selection criteria for listing appointments. Cancelled appointments are never listed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppointmentFilter {
    pub on_date: Option<NaiveDate>,
    pub patient_name: Option<String>,
    pub after: Option<NaiveDateTime>,
    pub limit: Option<i64>,
}

impl AppointmentFilter {
    pub fn upcoming(now: NaiveDateTime) -> Self {
        Self {
            after: Some(now),
            ..Self::default()
        }
    }

    pub fn on(date: NaiveDate) -> Self {
        Self {
            on_date: Some(date),
            ..Self::default()
        }
    }

    pub fn for_patient(mut self, name: Option<&str>) -> Self {
        self.patient_name = name.map(str::to_string);
        self
    }
}
