//! Operational HTTP endpoints.
//!
//! - `/healthz`    : liveness
//! - `/v1/servers` : connected backends and their occupancy, as JSON

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::app_state::AppState;
use crate::relay::Destination;

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub async fn servers(State(state): State<AppState>) -> Json<Value> {
    let servers: Vec<Value> = state
        .directory()
        .links()
        .iter()
        .map(|l| json!({ "name": l.name(), "occupancy": l.occupancy() }))
        .collect();
    Json(json!({ "servers": servers }))
}
