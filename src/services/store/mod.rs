pub mod sqlite;

use chrono::NaiveDateTime;

use crate::models::{Appointment, AppointmentFilter, Patient, PatientRecord};

/// Data-access collaborator the command interpreter executes against.
pub trait ClinicStore: Send + Sync {
    fn create_appointment(&self, appointment: &Appointment) -> anyhow::Result<()>;

    /// Looks a patient up by (partial, case-insensitive) name. Upcoming
    /// appointments are those after `now`.
    fn find_patient(&self, name: &str, now: NaiveDateTime)
        -> anyhow::Result<Option<PatientRecord>>;

    fn list_appointments(&self, filter: &AppointmentFilter) -> anyhow::Result<Vec<Appointment>>;

    fn list_patients(&self) -> anyhow::Result<Vec<Patient>>;
}
