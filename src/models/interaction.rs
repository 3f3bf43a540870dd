use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    pub id: i64,
    pub transcription: String,
    pub intent: String,
    pub response: String,
    pub confidence: f32,
    pub created_at: String,
}
