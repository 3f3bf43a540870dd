use serde::{Deserialize, Serialize};

use super::SlotName;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    BookAppointment,
    QueryPatient,
    ListAppointments,
    ListPatients,
    Unknown,
}

impl Intent {
    /// Classifiable intents in tie-break priority order, highest first.
    pub const PRIORITY: [Intent; 4] = [
        Intent::BookAppointment,
        Intent::QueryPatient,
        Intent::ListAppointments,
        Intent::ListPatients,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::BookAppointment => "book_appointment",
            Intent::QueryPatient => "query_patient",
            Intent::ListAppointments => "list_appointments",
            Intent::ListPatients => "list_patients",
            Intent::Unknown => "unknown",
        }
    }

    /// Slots that must be present before the command can be executed.
    pub fn required_slots(&self) -> &'static [SlotName] {
        match self {
            Intent::BookAppointment => &[SlotName::PatientName, SlotName::DateTime],
            Intent::QueryPatient => &[SlotName::PatientName],
            _ => &[],
        }
    }

    /// Slots the extractor looks for when handling this intent.
    pub fn sought_slots(&self) -> &'static [SlotName] {
        match self {
            Intent::BookAppointment => &[
                SlotName::PatientName,
                SlotName::DoctorName,
                SlotName::DateTime,
                SlotName::Notes,
            ],
            Intent::QueryPatient | Intent::ListPatients => &[SlotName::PatientName],
            Intent::ListAppointments => &[SlotName::PatientName, SlotName::DateTime],
            Intent::Unknown => &[],
        }
    }

    /// Short phrase used when asking the user to repeat missing details.
    pub fn action_phrase(&self) -> &'static str {
        match self {
            Intent::BookAppointment => "book an appointment",
            Intent::QueryPatient => "look up a patient",
            Intent::ListAppointments => "list appointments",
            Intent::ListPatients => "list patients",
            Intent::Unknown => "help with that",
        }
    }
}
