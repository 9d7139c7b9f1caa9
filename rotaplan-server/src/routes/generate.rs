//! Lineup generation endpoints
//!
//! POST /api/generate runs the search on a blocking worker and answers with
//! the finished lineup in one round trip; GET /api/generate/progress exposes
//! the attempt counter so a client can poll while the search runs.

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::Ordering;
use std::sync::Arc;

use rotaplan_core::{
    generate_lineup_with_progress, Formation, Roster, SearchConfig, SeasonHistory,
};

use crate::state::ServerState;

/// Generation request
#[derive(Deserialize)]
pub struct GenerateRequest {
    pub roster: Roster,
    /// A supported field size (5/6/7/9/11)...
    pub field_size: Option<usize>,
    /// ...or an explicit position list
    pub positions: Option<Vec<String>>,
    #[serde(default)]
    pub season: SeasonHistory,
    pub quarters: Option<u8>,
    pub max_attempts: Option<usize>,
    pub seed: Option<u64>,
}

type ApiError = (StatusCode, Json<Value>);

/// One-shot generate: request in, lineup plus violations out
pub async fn post_generate(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<Value>, ApiError> {
    let formation = resolve_formation(&req).map_err(bad_request)?;

    let mut config = SearchConfig::default();
    if let Some(quarters) = req.quarters {
        config.quarters = quarters;
    }
    if let Some(max_attempts) = req.max_attempts {
        config.max_attempts = max_attempts;
    }
    config.seed = req.seed;

    state.budget.store(config.max_attempts, Ordering::Relaxed);
    state.progress.store(0, Ordering::Relaxed);
    state.running.store(true, Ordering::Relaxed);

    let progress = state.progress.clone();
    let roster = req.roster;
    let season = req.season;
    let result = tokio::task::spawn_blocking(move || {
        generate_lineup_with_progress(&roster, &formation, &season, &config, &progress)
    })
    .await;

    state.running.store(false, Ordering::Relaxed);

    match result {
        Ok(Ok(lineup)) => {
            let clean = lineup.is_clean();
            Ok(Json(json!({ "clean": clean, "lineup": lineup })))
        }
        Ok(Err(err)) => Err(bad_request(err)),
        Err(err) => {
            tracing::error!("generation worker failed: {}", err);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "generation worker failed" })),
            ))
        }
    }
}

/// Attempt-counter polling while a generation runs
pub async fn get_progress(State(state): State<Arc<ServerState>>) -> Json<Value> {
    Json(json!({
        "running": state.running.load(Ordering::Relaxed),
        "attempts": state.progress.load(Ordering::Relaxed),
        "budget": state.budget.load(Ordering::Relaxed),
    }))
}

fn resolve_formation(req: &GenerateRequest) -> Result<Formation, String> {
    match (&req.positions, req.field_size) {
        (Some(positions), _) => {
            Formation::custom("custom", positions.clone()).map_err(|e| e.to_string())
        }
        (None, Some(size)) => Formation::for_field_size(size)
            .ok_or_else(|| format!("unsupported field size {}; expected one of 5/6/7/9/11", size)),
        (None, None) => Err("request needs a field_size or a positions list".to_string()),
    }
}

fn bad_request<E: std::fmt::Display>(err: E) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": err.to_string() })),
    )
}
