//! Demo records for a fresh database.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rusqlite::Connection;

use super::queries::{self, NewPatient, NewVisit};
use crate::models::Appointment;

struct DemoPatient {
    name: &'static str,
    phone: &'static str,
    email: &'static str,
    born: (i32, u32, u32),
    history: &'static [&'static str],
}

const PATIENTS: &[DemoPatient] = &[
    DemoPatient {
        name: "Ahmed Raza",
        phone: "555-0101",
        email: "ahmed.raza@email.com",
        born: (1985, 3, 15),
        history: &["Hypertension", "Diabetes Type 2"],
    },
    DemoPatient {
        name: "Fatima Ali",
        phone: "555-0102",
        email: "fatima.ali@email.com",
        born: (1992, 7, 22),
        history: &["Asthma", "Allergies"],
    },
    DemoPatient {
        name: "Omar Khan",
        phone: "555-0103",
        email: "omar.khan@email.com",
        born: (1978, 11, 8),
        history: &["Back Pain", "Arthritis"],
    },
    DemoPatient {
        name: "Zara Ahmed",
        phone: "555-0104",
        email: "zara.ahmed@email.com",
        born: (1990, 5, 30),
        history: &["Migraine", "Anxiety"],
    },
    DemoPatient {
        name: "Hassan Shah",
        phone: "555-0105",
        email: "hassan.shah@email.com",
        born: (1982, 12, 12),
        history: &["High Cholesterol"],
    },
];

// (patient index, doctor, days ago, diagnosis, treatment, notes)
const VISITS: &[(usize, &str, i64, &str, &str, &str)] = &[
    (0, "Dr. Smith", 30, "Hypertension checkup", "Medication adjustment", "Blood pressure stable"),
    (1, "Dr. Johnson", 15, "Asthma follow-up", "Inhaler prescription", "Symptoms improved"),
    (2, "Dr. Brown", 7, "Back pain evaluation", "Physical therapy recommended", "MRI scheduled"),
];

// (patient, doctor, offset from now, notes)
fn demo_appointments() -> [(&'static str, &'static str, Duration, &'static str); 3] {
    [
        ("Zara Ahmed", "Dr. Wilson", Duration::hours(2), "Migraine consultation"),
        ("Hassan Shah", "Dr. Davis", Duration::days(1), "Cholesterol follow-up"),
        ("Ahmed Raza", "Dr. Smith", Duration::days(3), "Regular checkup"),
    ]
}

/// Inserts demo patients, visits and appointments relative to `now`.
/// Does nothing when patients already exist. Returns whether data was added.
pub fn populate_demo_data(conn: &Connection, now: NaiveDateTime) -> anyhow::Result<bool> {
    if queries::count_patients(conn)? > 0 {
        return Ok(false);
    }

    let mut ids = Vec::with_capacity(PATIENTS.len());
    for p in PATIENTS {
        let (y, m, d) = p.born;
        let id = queries::insert_patient(
            conn,
            &NewPatient {
                name: p.name,
                phone: Some(p.phone),
                email: Some(p.email),
                date_of_birth: NaiveDate::from_ymd_opt(y, m, d),
                medical_history: p.history,
            },
        )?;
        ids.push(id);
    }

    for &(idx, doctor, days_ago, diagnosis, treatment, notes) in VISITS {
        let Some(&patient_id) = ids.get(idx) else { continue };
        queries::insert_visit(
            conn,
            &NewVisit {
                patient_id,
                doctor_name: doctor,
                visit_date: now - Duration::days(days_ago),
                diagnosis: Some(diagnosis),
                treatment: Some(treatment),
                notes: Some(notes),
            },
        )?;
    }

    for (patient, doctor, offset, notes) in demo_appointments() {
        let appt = Appointment::scheduled(patient, doctor, now + offset, Some(notes.to_string()), now);
        queries::create_appointment(conn, &appt)?;
    }

    tracing::info!(
        patients = PATIENTS.len(),
        visits = VISITS.len(),
        "populated demo data"
    );
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_db;
    use crate::models::AppointmentFilter;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_seed_once() {
        let conn = init_db(":memory:").unwrap();
        assert!(populate_demo_data(&conn, now()).unwrap());
        assert!(!populate_demo_data(&conn, now()).unwrap());

        assert_eq!(queries::count_patients(&conn).unwrap(), 5);
        let upcoming = queries::list_appointments(&conn, &AppointmentFilter::upcoming(now())).unwrap();
        let names: Vec<&str> = upcoming.iter().map(|a| a.patient_name.as_str()).collect();
        assert_eq!(names, vec!["Zara Ahmed", "Hassan Shah", "Ahmed Raza"]);
    }

    #[test]
    fn test_seeded_visits_link_to_patients() {
        let conn = init_db(":memory:").unwrap();
        populate_demo_data(&conn, now()).unwrap();

        let ahmed = queries::find_patient_by_name(&conn, "Ahmed Raza").unwrap().unwrap();
        let visits = queries::recent_visits(&conn, ahmed.id, 5).unwrap();
        assert_eq!(visits.len(), 1);
        assert_eq!(visits[0].doctor_name, "Dr. Smith");
        assert_eq!(visits[0].visit_date, now() - Duration::days(30));
    }
}
