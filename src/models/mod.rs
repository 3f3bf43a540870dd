pub mod appointment;
pub mod command;
pub mod intent;
pub mod interaction;
pub mod patient;

pub use appointment::{Appointment, AppointmentFilter, AppointmentStatus};
pub use command::{Command, Payload, ResolvedDateTime, Response, SlotName, SlotValue, Slots};
pub use intent::Intent;
pub use interaction::Interaction;
pub use patient::{Patient, PatientRecord, Visit};
