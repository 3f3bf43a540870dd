use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{NaiveDateTime, NaiveTime};
use serde_json::{json, Value};
use tower::ServiceExt;

use assistx::config::AppConfig;
use assistx::db;
use assistx::handlers;
use assistx::models::{Appointment, AppointmentFilter, Patient, PatientRecord};
use assistx::services::nlp::datetime::MeridiemPolicy;
use assistx::services::nlp::CommandInterpreter;
use assistx::services::store::sqlite::SqliteStore;
use assistx::services::store::ClinicStore;
use assistx::state::AppState;

// ── Mock Stores ──

/// Counts calls and fails every one of them when `fail` is set.
struct CountingStore {
    calls: Arc<AtomicUsize>,
    fail: bool,
}

impl CountingStore {
    fn touch(&self) -> anyhow::Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        anyhow::ensure!(!self.fail, "disk I/O error");
        Ok(())
    }
}

impl ClinicStore for CountingStore {
    fn create_appointment(&self, _appointment: &Appointment) -> anyhow::Result<()> {
        self.touch()
    }

    fn find_patient(
        &self,
        _name: &str,
        _now: NaiveDateTime,
    ) -> anyhow::Result<Option<PatientRecord>> {
        self.touch()?;
        Ok(None)
    }

    fn list_appointments(&self, _filter: &AppointmentFilter) -> anyhow::Result<Vec<Appointment>> {
        self.touch()?;
        Ok(vec![])
    }

    fn list_patients(&self) -> anyhow::Result<Vec<Patient>> {
        self.touch()?;
        Ok(vec![])
    }
}

// ── Helpers ──

fn test_config() -> AppConfig {
    AppConfig {
        port: 8000,
        database_url: ":memory:".to_string(),
        default_doctor: "Dr. Smith".to_string(),
        default_appointment_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        meridiem: MeridiemPolicy::default(),
        seed_demo_data: true,
    }
}

fn build_state(store: Option<Box<dyn ClinicStore>>) -> Arc<AppState> {
    let config = test_config();
    let conn = db::init_db(":memory:").unwrap();
    let now = chrono::Local::now().naive_local();
    db::seed::populate_demo_data(&conn, now).unwrap();
    let db = Arc::new(Mutex::new(conn));

    let store = store.unwrap_or_else(|| Box::new(SqliteStore::new(db.clone())));
    Arc::new(AppState {
        db,
        interpreter: CommandInterpreter::new(config.interpreter_config()).unwrap(),
        config,
        store,
    })
}

fn test_state() -> Arc<AppState> {
    build_state(None)
}

fn counting_state(fail: bool) -> (Arc<AppState>, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let store = CountingStore {
        calls: Arc::clone(&calls),
        fail,
    };
    (build_state(Some(Box::new(store))), calls)
}

fn test_app(state: Arc<AppState>) -> Router {
    handlers::router(state)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let body = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

async fn command(app: &Router, text: &str) -> Value {
    let (status, json) = send(
        app,
        post_json("/api/voice/process-command", json!({ "text": text })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{json}");
    json
}

// ── Health ──

#[tokio::test]
async fn test_health() {
    let app = test_app(test_state());
    let (status, json) = send(&app, get("/api/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    assert!(json["timestamp"].is_string());
}

// ── Voice Commands ──

#[tokio::test]
async fn test_book_by_voice_then_list() {
    let app = test_app(test_state());

    let json = command(&app, "Book an appointment for Sarah Johnson at 2 PM tomorrow").await;
    assert_eq!(json["interpretation"]["intent"], "book_appointment");
    assert_eq!(json["interpretation"]["slots"]["patient_name"], "Sarah Johnson");
    assert_eq!(json["interpretation"]["slots"]["doctor_name"], "Dr. Smith");
    assert_eq!(json["interpretation"]["slots"]["datetime"]["inferred"], false);
    assert!(json["interpretation"]["slots"]["datetime"]["at"]
        .as_str()
        .unwrap()
        .ends_with("T14:00:00"));
    assert_eq!(json["missing"], json!([]));
    assert!(json["data"].is_null());
    let reply = json["response"].as_str().unwrap();
    assert!(reply.starts_with("Appointment booked successfully for Sarah Johnson with Dr. Smith"));

    let (status, json) = send(&app, get("/api/appointments?patient=Sarah")).await;
    assert_eq!(status, StatusCode::OK);
    let appointments = json["appointments"].as_array().unwrap();
    assert_eq!(appointments.len(), 1);
    assert_eq!(appointments[0]["status"], "scheduled");
    assert_eq!(
        appointments[0]["notes"],
        "Booked via voice command: Book an appointment for Sarah Johnson at 2 PM tomorrow"
    );
}

#[tokio::test]
async fn test_query_patient_by_voice() {
    let app = test_app(test_state());

    let json = command(&app, "Show last visit for Ahmed Raza").await;
    assert_eq!(json["interpretation"]["intent"], "query_patient");
    assert_eq!(json["data"]["name"], "Ahmed Raza");
    assert_eq!(json["data"]["phone"], "555-0101");
    assert_eq!(json["data"]["recent_visits"][0]["doctor_name"], "Dr. Smith");

    let reply = json["response"].as_str().unwrap();
    assert!(reply.starts_with("Patient: Ahmed Raza\nPhone: 555-0101\nLast visit: "));
    assert!(reply.contains("Diagnosis: Hypertension checkup"));
}

#[tokio::test]
async fn test_list_patients_by_voice() {
    let app = test_app(test_state());

    let json = command(&app, "List all patients").await;
    assert_eq!(json["interpretation"]["intent"], "list_patients");
    assert_eq!(json["data"].as_array().unwrap().len(), 5);
    assert!(json["response"]
        .as_str()
        .unwrap()
        .starts_with("You have 5 patients registered:\n- Ahmed Raza (555-0101)"));
}

#[tokio::test]
async fn test_list_appointments_by_voice() {
    let app = test_app(test_state());

    let json = command(&app, "Show upcoming appointments").await;
    assert_eq!(json["interpretation"]["intent"], "list_appointments");
    assert_eq!(json["data"].as_array().unwrap().len(), 3);
    assert!(json["response"]
        .as_str()
        .unwrap()
        .starts_with("You have 3 upcoming appointments:\n- Zara Ahmed with Dr. Wilson"));
}

#[tokio::test]
async fn test_vague_booking_reports_missing_slots() {
    let (state, calls) = counting_state(false);
    let app = test_app(state);

    let json = command(&app, "Schedule something sometime").await;
    assert_eq!(json["interpretation"]["intent"], "book_appointment");
    assert_eq!(json["missing"], json!(["patient_name", "datetime"]));
    let reply = json["response"].as_str().unwrap();
    assert!(reply.contains("patient name"));
    assert!(reply.contains("time"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_gibberish_never_reaches_store() {
    let (state, calls) = counting_state(false);
    let app = test_app(state);

    let json = command(&app, "asdkj qwoeiru").await;
    assert_eq!(json["interpretation"]["intent"], "unknown");
    assert_eq!(json["confidence"], 0.0);
    assert!(json["response"]
        .as_str()
        .unwrap()
        .starts_with("I'm sorry, I didn't understand that command."));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_store_failure_gives_generic_reply() {
    let (state, calls) = counting_state(true);
    let app = test_app(state);

    let json = command(&app, "List all patients").await;
    let reply = json["response"].as_str().unwrap();
    assert!(reply.starts_with("Sorry, something went wrong"));
    assert!(!reply.contains("disk"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_empty_command_rejected() {
    let app = test_app(test_state());
    let (status, json) = send(
        &app,
        post_json("/api/voice/process-command", json!({ "text": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("text"));
}

#[tokio::test]
async fn test_commands_are_logged() {
    let app = test_app(test_state());

    command(&app, "List all patients").await;
    command(&app, "asdkj qwoeiru").await;

    let (status, json) = send(&app, get("/api/interactions?limit=10")).await;
    assert_eq!(status, StatusCode::OK);
    let log = json["interactions"].as_array().unwrap();
    assert_eq!(log.len(), 2);
    assert_eq!(log[0]["transcription"], "asdkj qwoeiru");
    assert_eq!(log[0]["intent"], "unknown");
    assert_eq!(log[1]["intent"], "list_patients");
}

// ── Appointments API ──

#[tokio::test]
async fn test_create_appointment() {
    let app = test_app(test_state());

    let (status, json) = send(
        &app,
        post_json(
            "/api/appointments/create",
            json!({
                "patient_name": "Fatima Ali",
                "doctor_name": "Dr. Johnson",
                "appointment_time": "2031-06-15T10:30:00",
                "notes": "Asthma review"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "created");
    let id = json["appointment_id"].as_str().unwrap().to_string();

    let (_, json) = send(&app, get("/api/appointments?date=2031-06-15")).await;
    let appointments = json["appointments"].as_array().unwrap();
    assert_eq!(appointments.len(), 1);
    assert_eq!(appointments[0]["id"], id.as_str());
    assert_eq!(appointments[0]["doctor_name"], "Dr. Johnson");
    assert_eq!(appointments[0]["appointment_time"], "2031-06-15T10:30:00");
}

#[tokio::test]
async fn test_create_appointment_defaults_doctor() {
    let app = test_app(test_state());

    let (status, _) = send(
        &app,
        post_json(
            "/api/appointments/create",
            json!({ "patient_name": "Omar Khan", "appointment_time": "2031-06-16 09:00" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, json) = send(&app, get("/api/appointments?date=2031-06-16")).await;
    assert_eq!(json["appointments"][0]["doctor_name"], "Dr. Smith");
}

#[tokio::test]
async fn test_create_appointment_validation() {
    let app = test_app(test_state());

    let (status, _) = send(
        &app,
        post_json(
            "/api/appointments/create",
            json!({ "patient_name": "Omar Khan", "appointment_time": "next blursday" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        post_json(
            "/api/appointments/create",
            json!({ "patient_name": " ", "appointment_time": "2031-06-16 09:00" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_appointments_bad_date() {
    let app = test_app(test_state());
    let (status, json) = send(&app, get("/api/appointments?date=15-06-2031")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("15-06-2031"));
}

// ── Patients API ──

#[tokio::test]
async fn test_list_patients() {
    let app = test_app(test_state());
    let (status, json) = send(&app, get("/api/patients")).await;
    assert_eq!(status, StatusCode::OK);

    let patients = json["patients"].as_array().unwrap();
    assert_eq!(patients.len(), 5);
    assert_eq!(patients[0]["name"], "Ahmed Raza");
    assert_eq!(
        patients[0]["medical_history"],
        json!(["Hypertension", "Diabetes Type 2"])
    );
}

#[tokio::test]
async fn test_query_patient() {
    let app = test_app(test_state());

    let (status, json) = send(
        &app,
        post_json("/api/patients/query", json!({ "patient_name": "omar" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["patient"]["name"], "Omar Khan");
    assert_eq!(
        json["patient"]["recent_visits"][0]["diagnosis"],
        "Back pain evaluation"
    );

    let (status, json) = send(
        &app,
        post_json("/api/patients/query", json!({ "patient_name": "Nobody Here" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().unwrap().contains("Nobody Here"));
}
