use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::config::AppConfig;
use crate::services::nlp::CommandInterpreter;
use crate::services::store::ClinicStore;

pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
    pub config: AppConfig,
    pub interpreter: CommandInterpreter,
    pub store: Box<dyn ClinicStore>,
}
