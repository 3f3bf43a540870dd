use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::Appointment;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    pub id: i64,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub medical_history: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Visit {
    pub id: i64,
    pub patient_name: String,
    pub doctor_name: String,
    pub visit_date: NaiveDateTime,
    pub diagnosis: Option<String>,
    pub treatment: Option<String>,
    pub notes: Option<String>,
}

/// A patient together with their visit history and future bookings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientRecord {
    #[serde(flatten)]
    pub patient: Patient,
    pub recent_visits: Vec<Visit>,
    pub upcoming_appointments: Vec<Appointment>,
}

impl PatientRecord {
    pub fn last_visit(&self) -> Option<&Visit> {
        self.recent_visits.first()
    }

    pub fn next_appointment(&self) -> Option<&Appointment> {
        self.upcoming_appointments.first()
    }
}
