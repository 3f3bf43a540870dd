use std::sync::{Arc, Mutex};

use tracing_subscriber::EnvFilter;

use assistx::config::AppConfig;
use assistx::db;
use assistx::handlers;
use assistx::services::nlp::CommandInterpreter;
use assistx::services::store::sqlite::SqliteStore;
use assistx::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;
    if config.seed_demo_data {
        let now = chrono::Local::now().naive_local();
        if db::seed::populate_demo_data(&conn, now)? {
            tracing::info!("seeded demo data into {}", config.database_url);
        }
    }
    let db = Arc::new(Mutex::new(conn));

    let interpreter = CommandInterpreter::new(config.interpreter_config())?;
    tracing::info!(
        default_doctor = %config.default_doctor,
        default_time = %config.default_appointment_time,
        "command interpreter ready"
    );

    let state = Arc::new(AppState {
        db: db.clone(),
        config: config.clone(),
        interpreter,
        store: Box::new(SqliteStore::new(db)),
    });

    let app = handlers::router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
