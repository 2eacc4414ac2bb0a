//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::error::Result;
use crate::state::AppState;

#[derive(Serialize)]
pub struct Health {
    pub ok: bool,
    pub db: &'static str,
}

/// Health check: verifies database connectivity with a trivial query.
pub async fn health(State(state): State<AppState>) -> Result<Json<Health>> {
    state.db.ping().await?;
    Ok(Json(Health { ok: true, db: "up" }))
}
