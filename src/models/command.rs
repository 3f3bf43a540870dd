use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{Appointment, Intent, Patient, PatientRecord};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SlotName {
    PatientName,
    DoctorName,
    #[serde(rename = "datetime")]
    DateTime,
    Notes,
}

impl SlotName {
    /// How the slot is named when talking to the user.
    pub fn label(&self) -> &'static str {
        match self {
            SlotName::PatientName => "patient name",
            SlotName::DoctorName => "doctor's name",
            SlotName::DateTime => "appointment time",
            SlotName::Notes => "notes",
        }
    }
}

/// An absolute point in time produced by the date/time resolver.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolvedDateTime {
    pub at: NaiveDateTime,
    /// True when the date or the time of day was defaulted rather than stated.
    pub inferred: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum SlotValue {
    Text(String),
    DateTime(ResolvedDateTime),
}

impl SlotValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            SlotValue::Text(s) => Some(s),
            SlotValue::DateTime(_) => None,
        }
    }

    pub fn as_datetime(&self) -> Option<&ResolvedDateTime> {
        match self {
            SlotValue::DateTime(dt) => Some(dt),
            SlotValue::Text(_) => None,
        }
    }
}

pub type Slots = BTreeMap<SlotName, SlotValue>;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Command {
    pub intent: Intent,
    pub slots: Slots,
    pub confidence: f32,
    pub missing_required: BTreeSet<SlotName>,
    /// Temporal phrase that was present but could not be resolved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unresolved_datetime: Option<String>,
    #[serde(skip)]
    pub utterance: String,
}

impl Command {
    pub fn text(&self, slot: SlotName) -> Option<&str> {
        self.slots.get(&slot).and_then(SlotValue::as_text)
    }

    pub fn datetime(&self) -> Option<&ResolvedDateTime> {
        self.slots.get(&SlotName::DateTime).and_then(SlotValue::as_datetime)
    }
}

/// Structured data returned alongside the reply text for query and list intents.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Payload {
    Patient(Box<PatientRecord>),
    Appointments(Vec<Appointment>),
    Patients(Vec<Patient>),
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Response {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Payload>,
}

impl Response {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            payload: None,
        }
    }
}
