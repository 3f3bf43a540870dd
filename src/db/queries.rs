use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection};

use crate::models::{Appointment, AppointmentFilter, AppointmentStatus, Interaction, Patient, Visit};

const TIMESTAMP: &str = "%Y-%m-%d %H:%M:%S";

fn format_ts(at: NaiveDateTime) -> String {
    at.format(TIMESTAMP).to_string()
}

fn parse_ts(s: &str) -> anyhow::Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, TIMESTAMP).map_err(|e| {
        tracing::warn!(value = s, error = %e, "invalid stored timestamp");
        anyhow::anyhow!("invalid stored timestamp {s:?}: {e}")
    })
}

// ── Patients ──

pub struct NewPatient<'a> {
    pub name: &'a str,
    pub phone: Option<&'a str>,
    pub email: Option<&'a str>,
    pub date_of_birth: Option<NaiveDate>,
    pub medical_history: &'a [&'a str],
}

pub fn insert_patient(conn: &Connection, patient: &NewPatient) -> anyhow::Result<i64> {
    let history = serde_json::to_string(patient.medical_history)?;
    let dob = patient.date_of_birth.map(|d| d.format("%Y-%m-%d").to_string());

    conn.execute(
        "INSERT INTO patients (name, phone, email, date_of_birth, medical_history)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![patient.name, patient.phone, patient.email, dob, history],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn count_patients(conn: &Connection) -> anyhow::Result<i64> {
    let count = conn.query_row("SELECT COUNT(*) FROM patients", [], |row| row.get(0))?;
    Ok(count)
}

pub fn list_patients(conn: &Connection) -> anyhow::Result<Vec<Patient>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, phone, email, date_of_birth, medical_history
         FROM patients ORDER BY name ASC",
    )?;

    let rows = stmt.query_map([], |row| Ok(parse_patient_row(row)))?;

    let mut patients = vec![];
    for row in rows {
        patients.push(row??);
    }
    Ok(patients)
}

/// Case-insensitive partial match on name. An exact match is preferred over
/// a partial one.
pub fn find_patient_by_name(conn: &Connection, name: &str) -> anyhow::Result<Option<Patient>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, phone, email, date_of_birth, medical_history
         FROM patients
         WHERE name LIKE '%' || ?1 || '%'
         ORDER BY lower(name) = lower(?1) DESC, name ASC
         LIMIT 1",
    )?;

    let result = stmt.query_row(params![name.trim()], |row| Ok(parse_patient_row(row)));

    match result {
        Ok(patient) => Ok(Some(patient?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn parse_patient_row(row: &rusqlite::Row) -> anyhow::Result<Patient> {
    let dob: Option<String> = row.get(4)?;
    let history_json: String = row.get(5)?;

    Ok(Patient {
        id: row.get(0)?,
        name: row.get(1)?,
        phone: row.get(2)?,
        email: row.get(3)?,
        date_of_birth: dob.and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok()),
        medical_history: serde_json::from_str(&history_json).unwrap_or_default(),
    })
}

// ── Visits ──

pub struct NewVisit<'a> {
    pub patient_id: i64,
    pub doctor_name: &'a str,
    pub visit_date: NaiveDateTime,
    pub diagnosis: Option<&'a str>,
    pub treatment: Option<&'a str>,
    pub notes: Option<&'a str>,
}

pub fn insert_visit(conn: &Connection, visit: &NewVisit) -> anyhow::Result<i64> {
    conn.execute(
        "INSERT INTO visits (patient_id, doctor_name, visit_date, diagnosis, treatment, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            visit.patient_id,
            visit.doctor_name,
            format_ts(visit.visit_date),
            visit.diagnosis,
            visit.treatment,
            visit.notes,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Newest first.
pub fn recent_visits(conn: &Connection, patient_id: i64, limit: i64) -> anyhow::Result<Vec<Visit>> {
    let mut stmt = conn.prepare(
        "SELECT v.id, p.name, v.doctor_name, v.visit_date, v.diagnosis, v.treatment, v.notes
         FROM visits v JOIN patients p ON p.id = v.patient_id
         WHERE v.patient_id = ?1
         ORDER BY v.visit_date DESC
         LIMIT ?2",
    )?;

    let rows = stmt.query_map(params![patient_id, limit], |row| Ok(parse_visit_row(row)))?;

    let mut visits = vec![];
    for row in rows {
        visits.push(row??);
    }
    Ok(visits)
}

fn parse_visit_row(row: &rusqlite::Row) -> anyhow::Result<Visit> {
    let visit_date: String = row.get(3)?;

    Ok(Visit {
        id: row.get(0)?,
        patient_name: row.get(1)?,
        doctor_name: row.get(2)?,
        visit_date: parse_ts(&visit_date)?,
        diagnosis: row.get(4)?,
        treatment: row.get(5)?,
        notes: row.get(6)?,
    })
}

// ── Appointments ──

pub fn create_appointment(conn: &Connection, appt: &Appointment) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO appointments (id, patient_name, doctor_name, appointment_time, notes, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            appt.id,
            appt.patient_name,
            appt.doctor_name,
            format_ts(appt.appointment_time),
            appt.notes,
            appt.status.as_str(),
            format_ts(appt.created_at),
        ],
    )?;
    Ok(())
}

/// Soonest first. Cancelled appointments are excluded.
pub fn list_appointments(
    conn: &Connection,
    filter: &AppointmentFilter,
) -> anyhow::Result<Vec<Appointment>> {
    let on_date = filter.on_date.map(|d| d.format("%Y-%m-%d").to_string());
    let after = filter.after.map(format_ts);
    let limit = filter.limit.unwrap_or(-1);

    let mut stmt = conn.prepare(
        "SELECT id, patient_name, doctor_name, appointment_time, notes, status, created_at
         FROM appointments
         WHERE status != 'cancelled'
           AND (?1 IS NULL OR date(appointment_time) = ?1)
           AND (?2 IS NULL OR patient_name LIKE '%' || ?2 || '%')
           AND (?3 IS NULL OR appointment_time > ?3)
         ORDER BY appointment_time ASC
         LIMIT ?4",
    )?;

    let rows = stmt.query_map(params![on_date, filter.patient_name, after, limit], |row| {
        Ok(parse_appointment_row(row))
    })?;

    let mut appointments = vec![];
    for row in rows {
        appointments.push(row??);
    }
    Ok(appointments)
}

fn parse_appointment_row(row: &rusqlite::Row) -> anyhow::Result<Appointment> {
    let appointment_time: String = row.get(3)?;
    let status: String = row.get(5)?;
    let created_at: String = row.get(6)?;

    Ok(Appointment {
        id: row.get(0)?,
        patient_name: row.get(1)?,
        doctor_name: row.get(2)?,
        appointment_time: parse_ts(&appointment_time)?,
        notes: row.get(4)?,
        status: AppointmentStatus::parse(&status),
        created_at: parse_ts(&created_at)?,
    })
}

// ── Interactions ──

pub fn log_interaction(
    conn: &Connection,
    transcription: &str,
    intent: &str,
    response: &str,
    confidence: f32,
) -> anyhow::Result<i64> {
    conn.execute(
        "INSERT INTO interactions (transcription, intent, response, confidence)
         VALUES (?1, ?2, ?3, ?4)",
        params![transcription, intent, response, f64::from(confidence)],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Newest first.
pub fn recent_interactions(conn: &Connection, limit: i64) -> anyhow::Result<Vec<Interaction>> {
    let mut stmt = conn.prepare(
        "SELECT id, transcription, intent, response, confidence, created_at
         FROM interactions ORDER BY id DESC LIMIT ?1",
    )?;

    let rows = stmt.query_map(params![limit], |row| {
        let confidence: f64 = row.get(4)?;
        Ok(Interaction {
            id: row.get(0)?,
            transcription: row.get(1)?,
            intent: row.get(2)?,
            response: row.get(3)?,
            confidence: confidence as f32,
            created_at: row.get(5)?,
        })
    })?;

    let mut interactions = vec![];
    for row in rows {
        interactions.push(row?);
    }
    Ok(interactions)
}
