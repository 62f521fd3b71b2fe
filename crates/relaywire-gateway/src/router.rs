//! Axum router wiring (HTTP -> WS upgrade).
//!
//! - `/v1/backend` : backend link upgrade
//! - `/healthz`    : liveness
//! - `/v1/servers` : directory snapshot

use axum::{routing::get, Router};

use crate::{app_state::AppState, ops, transport};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/v1/backend", get(transport::ws::backend_upgrade))
        .route("/healthz", get(ops::healthz))
        .route("/v1/servers", get(ops::servers))
        .with_state(state)
}
