//! Turns one utterance into a typed [`Command`], runs it against the store
//! and renders the reply.

use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime};

use super::classifier::IntentClassifier;
use super::datetime::DateTimeResolver;
use super::extractor::EntityExtractor;
use crate::config::InterpreterConfig;
use crate::errors::CommandError;
use crate::models::{
    Appointment, AppointmentFilter, Command, Intent, Patient, PatientRecord, Payload, Response,
    SlotName, SlotValue, Slots,
};
use crate::services::store::ClinicStore;

const LISTED_APPOINTMENTS: usize = 5;
const LISTED_PATIENTS: usize = 10;

/// What a successfully executed command produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Booked(Appointment),
    PatientFound(Box<PatientRecord>),
    Appointments {
        list: Vec<Appointment>,
        on_date: Option<NaiveDate>,
    },
    Patients(Vec<Patient>),
}

pub struct CommandInterpreter {
    config: InterpreterConfig,
    classifier: IntentClassifier,
    extractor: EntityExtractor,
    resolver: DateTimeResolver,
}

impl CommandInterpreter {
    pub fn new(config: InterpreterConfig) -> anyhow::Result<Self> {
        let classifier = IntentClassifier::new(&config.vocabulary)?;
        let resolver = DateTimeResolver::new(config.meridiem, config.default_time);
        Ok(Self {
            config,
            classifier,
            extractor: EntityExtractor::new(),
            resolver,
        })
    }

    /// Classifies `text`, extracts and resolves its slots and records which
    /// required slots are still missing. Never touches the store.
    pub fn interpret(&self, text: &str, now: NaiveDateTime) -> Command {
        let (intent, confidence) = self.classifier.classify(text);

        let mut slots = Slots::new();
        let mut unresolved_datetime = None;

        for (name, raw) in self.extractor.extract(text, intent) {
            if name != SlotName::DateTime {
                slots.insert(name, SlotValue::Text(raw));
                continue;
            }
            match self.resolver.resolve(&raw, now) {
                Ok(resolved) => {
                    slots.insert(name, SlotValue::DateTime(resolved));
                }
                Err(failure) => {
                    tracing::debug!(phrase = %raw, %failure, "could not resolve temporal phrase");
                    unresolved_datetime = Some(raw);
                }
            }
        }

        if intent == Intent::BookAppointment {
            slots
                .entry(SlotName::DoctorName)
                .or_insert_with(|| SlotValue::Text(self.config.default_doctor.clone()));
        }

        let missing_required: BTreeSet<SlotName> = intent
            .required_slots()
            .iter()
            .filter(|slot| !slots.contains_key(*slot))
            .copied()
            .collect();

        tracing::debug!(
            intent = intent.as_str(),
            confidence,
            missing = ?missing_required,
            "interpreted command"
        );

        Command {
            intent,
            slots,
            confidence,
            missing_required,
            unresolved_datetime,
            utterance: text.to_string(),
        }
    }

    /// Runs a complete command against `store`. Incomplete or unknown commands
    /// are rejected without calling the store.
    pub fn execute(
        &self,
        command: &Command,
        store: &dyn ClinicStore,
        now: NaiveDateTime,
    ) -> Result<Outcome, CommandError> {
        validate(command)?;

        match command.intent {
            Intent::BookAppointment => {
                let (Some(patient), Some(when)) =
                    (command.text(SlotName::PatientName), command.datetime())
                else {
                    return Err(missing(command, Intent::BookAppointment.required_slots()));
                };
                let doctor = command
                    .text(SlotName::DoctorName)
                    .unwrap_or(self.config.default_doctor.as_str());
                let notes = command
                    .text(SlotName::Notes)
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("Booked via voice command: {}", command.utterance));

                let appointment = Appointment::scheduled(patient, doctor, when.at, Some(notes), now);
                store.create_appointment(&appointment).map_err(store_failure)?;
                Ok(Outcome::Booked(appointment))
            }
            Intent::QueryPatient => {
                let Some(name) = command.text(SlotName::PatientName) else {
                    return Err(missing(command, Intent::QueryPatient.required_slots()));
                };
                match store.find_patient(name, now).map_err(store_failure)? {
                    Some(record) => Ok(Outcome::PatientFound(Box::new(record))),
                    None => Err(CommandError::EntityNotFound(name.to_string())),
                }
            }
            Intent::ListAppointments => {
                let on_date = command.datetime().map(|dt| dt.at.date());
                let filter = match on_date {
                    Some(date) => AppointmentFilter::on(date),
                    None => AppointmentFilter::upcoming(now),
                }
                .for_patient(command.text(SlotName::PatientName));

                let list = store.list_appointments(&filter).map_err(store_failure)?;
                Ok(Outcome::Appointments { list, on_date })
            }
            Intent::ListPatients => {
                let mut patients = store.list_patients().map_err(store_failure)?;
                if let Some(name) = command.text(SlotName::PatientName) {
                    let needle = name.to_lowercase();
                    patients.retain(|p| p.name.to_lowercase().contains(&needle));
                }
                Ok(Outcome::Patients(patients))
            }
            Intent::Unknown => Err(CommandError::UnclassifiedIntent),
        }
    }

    /// Renders the reply for an execution result. Pure and deterministic.
    pub fn format_response(
        &self,
        command: &Command,
        result: &Result<Outcome, CommandError>,
    ) -> Response {
        let outcome = match result {
            Ok(outcome) => outcome,
            Err(err) => return Response::plain(err.to_string()),
        };

        match outcome {
            Outcome::Booked(appointment) => {
                let mut text = format!(
                    "Appointment booked successfully for {} with {} on {}. Appointment ID: {}",
                    appointment.patient_name,
                    appointment.doctor_name,
                    spoken_datetime(appointment.appointment_time),
                    appointment.id,
                );
                if appointment.appointment_time < appointment.created_at {
                    text.push_str(". Note that this time has already passed.");
                } else if command.datetime().is_some_and(|dt| dt.inferred) {
                    text.push_str(". Let me know if you meant a different time.");
                }
                Response::plain(text)
            }
            Outcome::PatientFound(record) => Response {
                text: patient_summary(record),
                payload: Some(Payload::Patient(record.clone())),
            },
            Outcome::Appointments { list, on_date } => Response {
                text: appointment_summary(list, *on_date),
                payload: Some(Payload::Appointments(list.clone())),
            },
            Outcome::Patients(patients) => Response {
                text: patient_list_summary(patients),
                payload: Some(Payload::Patients(patients.clone())),
            },
        }
    }

    /// Interprets, executes and formats in one go. Failures become replies.
    pub fn respond(
        &self,
        text: &str,
        now: NaiveDateTime,
        store: &dyn ClinicStore,
    ) -> (Command, Response) {
        let command = self.interpret(text, now);
        let result = self.execute(&command, store, now);

        if let Some(cause) = result.as_ref().err().and_then(CommandError::cause) {
            tracing::error!(intent = command.intent.as_str(), error = %cause, "store call failed");
        }

        let response = self.format_response(&command, &result);
        (command, response)
    }
}

fn validate(command: &Command) -> Result<(), CommandError> {
    if command.intent == Intent::Unknown {
        return Err(CommandError::UnclassifiedIntent);
    }

    // A temporal phrase was heard but could not be pinned down.
    if let Some(phrase) = &command.unresolved_datetime {
        let only_time_missing = command.missing_required.iter().all(|s| *s == SlotName::DateTime);
        if only_time_missing {
            return Err(CommandError::DateTimeUnresolvable(phrase.clone()));
        }
    }

    if !command.missing_required.is_empty() {
        return Err(CommandError::MissingSlot {
            slots: command.missing_required.iter().copied().collect(),
            action: command.intent.action_phrase(),
        });
    }
    Ok(())
}

fn missing(command: &Command, required: &[SlotName]) -> CommandError {
    CommandError::MissingSlot {
        slots: required
            .iter()
            .filter(|s| !command.slots.contains_key(*s))
            .copied()
            .collect(),
        action: command.intent.action_phrase(),
    }
}

fn store_failure(err: anyhow::Error) -> CommandError {
    CommandError::Store(format!("{err:#}"))
}

fn spoken_datetime(at: NaiveDateTime) -> String {
    at.format("%Y-%m-%d at %I:%M %p").to_string()
}

fn patient_summary(record: &PatientRecord) -> String {
    let patient = &record.patient;
    let phone = patient.phone.as_deref().unwrap_or("not on file");

    let (last_visit, diagnosis) = match record.last_visit() {
        Some(visit) => (
            format!("{} with {}", visit.visit_date.format("%Y-%m-%d"), visit.doctor_name),
            visit.diagnosis.clone().unwrap_or_else(|| "not recorded".to_string()),
        ),
        None => ("no previous visits".to_string(), "none".to_string()),
    };

    let next = match record.next_appointment() {
        Some(appt) => format!(
            "{} with {}",
            spoken_datetime(appt.appointment_time),
            appt.doctor_name
        ),
        None => "none scheduled".to_string(),
    };

    format!(
        "Patient: {}\nPhone: {phone}\nLast visit: {last_visit}\nDiagnosis: {diagnosis}\nNext appointment: {next}",
        patient.name
    )
}

fn appointment_summary(list: &[Appointment], on_date: Option<NaiveDate>) -> String {
    if list.is_empty() {
        return match on_date {
            Some(date) => format!("No appointments scheduled for {}.", date.format("%Y-%m-%d")),
            None => "No appointments scheduled.".to_string(),
        };
    }

    let noun = if list.len() == 1 { "appointment" } else { "appointments" };
    let mut text = match on_date {
        Some(date) => format!("You have {} {noun} on {}:", list.len(), date.format("%Y-%m-%d")),
        None => format!("You have {} upcoming {noun}:", list.len()),
    };
    for appt in list.iter().take(LISTED_APPOINTMENTS) {
        text.push_str(&format!(
            "\n- {} with {} on {}",
            appt.patient_name,
            appt.doctor_name,
            spoken_datetime(appt.appointment_time)
        ));
    }
    text
}

fn patient_list_summary(patients: &[Patient]) -> String {
    if patients.is_empty() {
        return "No patients in the database.".to_string();
    }

    let noun = if patients.len() == 1 { "patient" } else { "patients" };
    let mut text = format!("You have {} {noun} registered:", patients.len());
    for patient in patients.iter().take(LISTED_PATIENTS) {
        match &patient.phone {
            Some(phone) => text.push_str(&format!("\n- {} ({phone})", patient.name)),
            None => text.push_str(&format!("\n- {}", patient.name)),
        }
    }
    text
}
