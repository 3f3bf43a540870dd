//! Rule-based command understanding: intent classification, slot
//! extraction and date/time resolution.

pub mod classifier;
pub mod datetime;
pub mod extractor;
pub mod interpreter;

pub use interpreter::{CommandInterpreter, Outcome};
