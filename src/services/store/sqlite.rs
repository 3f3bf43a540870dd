use std::sync::{Arc, Mutex, MutexGuard};

use chrono::NaiveDateTime;
use rusqlite::Connection;

use super::ClinicStore;
use crate::db::queries;
use crate::models::{Appointment, AppointmentFilter, Patient, PatientRecord};

const RECENT_VISITS: i64 = 5;

/// [`ClinicStore`] over the shared SQLite connection.
#[derive(Clone)]
pub struct SqliteStore {
    db: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    pub fn new(db: Arc<Mutex<Connection>>) -> Self {
        Self { db }
    }

    fn conn(&self) -> anyhow::Result<MutexGuard<'_, Connection>> {
        self.db
            .lock()
            .map_err(|_| anyhow::anyhow!("database connection lock poisoned"))
    }
}

impl ClinicStore for SqliteStore {
    fn create_appointment(&self, appointment: &Appointment) -> anyhow::Result<()> {
        let conn = self.conn()?;
        queries::create_appointment(&conn, appointment)
    }

    fn find_patient(
        &self,
        name: &str,
        now: NaiveDateTime,
    ) -> anyhow::Result<Option<PatientRecord>> {
        let conn = self.conn()?;
        let Some(patient) = queries::find_patient_by_name(&conn, name)? else {
            return Ok(None);
        };

        let recent_visits = queries::recent_visits(&conn, patient.id, RECENT_VISITS)?;
        let upcoming_appointments = queries::list_appointments(
            &conn,
            &AppointmentFilter::upcoming(now).for_patient(Some(patient.name.as_str())),
        )?;

        Ok(Some(PatientRecord {
            patient,
            recent_visits,
            upcoming_appointments,
        }))
    }

    fn list_appointments(&self, filter: &AppointmentFilter) -> anyhow::Result<Vec<Appointment>> {
        let conn = self.conn()?;
        queries::list_appointments(&conn, filter)
    }

    fn list_patients(&self) -> anyhow::Result<Vec<Patient>> {
        let conn = self.conn()?;
        queries::list_patients(&conn)
    }
}
