use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::db::queries;
use crate::errors::AppError;
use crate::models::Interaction;
use crate::state::AppState;

// GET /api/interactions
#[derive(Deserialize)]
pub struct InteractionsQuery {
    pub limit: Option<i64>,
}

#[derive(Serialize)]
pub struct InteractionsResponse {
    interactions: Vec<Interaction>,
}

pub async fn list_interactions(
    State(state): State<Arc<AppState>>,
    Query(query): Query<InteractionsQuery>,
) -> Result<Json<InteractionsResponse>, AppError> {
    let limit = query.limit.unwrap_or(20).clamp(1, 100);
    let interactions = {
        let db = state
            .db
            .lock()
            .map_err(|_| AppError::Internal("database connection lock poisoned".to_string()))?;
        queries::recent_interactions(&db, limit)?
    };
    Ok(Json(InteractionsResponse { interactions }))
}
