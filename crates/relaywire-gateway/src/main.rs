//! relaywire gateway
//!
//! - Backend endpoint: /v1/backend?server=...
//! - Channel frames decoded once, dispatched by action
//! - Byte-exact forwarding to occupied backends

use std::net::SocketAddr;

use tracing_subscriber::{fmt, EnvFilter};

use relaywire_core::protocol::CHANNEL;
use relaywire_gateway::{app_state, config, router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::var("RELAYWIRE_CONFIG").unwrap_or_else(|_| config::DEFAULT_PATH.to_string());
    let cfg = config::load_from_file(&path)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.log.filter));
    fmt().with_env_filter(filter).init();

    let listen: SocketAddr = cfg.gateway.listen.parse()?;

    let state = app_state::AppState::new(cfg)?;
    let app = router::build_router(state);

    tracing::info!(%listen, channel = CHANNEL, "relaywire-gateway starting");
    let listener = tokio::net::TcpListener::bind(listen).await?;

    axum::serve(listener, app).await?;
    Ok(())
}
