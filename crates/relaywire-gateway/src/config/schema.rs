use std::collections::HashSet;
use std::net::SocketAddr;

use serde::Deserialize;

use relaywire_core::error::{RelayError, Result};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    pub version: u32,

    #[serde(default)]
    pub gateway: GatewaySection,

    /// Backends allowed to connect. Empty accepts any name.
    #[serde(default)]
    pub servers: Vec<ServerConfig>,

    #[serde(default)]
    pub resolver: ResolverSection,

    #[serde(default)]
    pub log: LogSection,
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(RelayError::Config(format!(
                "unsupported config version {}",
                self.version
            )));
        }

        self.gateway.validate()?;

        let mut seen = HashSet::new();
        for s in &self.servers {
            if s.name.trim().is_empty() {
                return Err(RelayError::Config("servers[].name must not be empty".into()));
            }
            if !seen.insert(s.name.as_str()) {
                return Err(RelayError::Config(format!("duplicate server name: {}", s.name)));
            }
        }

        if self.resolver.cache_capacity == 0 {
            return Err(RelayError::Config(
                "resolver.cache_capacity must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Whether a backend may register under `name`.
    pub fn allows_server(&self, name: &str) -> bool {
        self.servers.is_empty() || self.servers.iter().any(|s| s.name == name)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewaySection {
    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default = "default_ping_interval_ms")]
    pub ping_interval_ms: u64,

    #[serde(default = "default_idle_timeout_ms")]
    pub idle_timeout_ms: u64,

    #[serde(default = "default_max_frame_bytes")]
    pub max_frame_bytes: usize,

    /// Per-link outbound queue length.
    #[serde(default = "default_outbound_queue")]
    pub outbound_queue: usize,
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            ping_interval_ms: default_ping_interval_ms(),
            idle_timeout_ms: default_idle_timeout_ms(),
            max_frame_bytes: default_max_frame_bytes(),
            outbound_queue: default_outbound_queue(),
        }
    }
}

impl GatewaySection {
    pub fn validate(&self) -> Result<()> {
        if self.listen.parse::<SocketAddr>().is_err() {
            return Err(RelayError::Config(format!(
                "gateway.listen must be a socket address, got '{}'",
                self.listen
            )));
        }
        if !(5000..=120000).contains(&self.ping_interval_ms) {
            return Err(RelayError::Config(
                "gateway.ping_interval_ms must be between 5000 and 120000".into(),
            ));
        }
        if !(10000..=600000).contains(&self.idle_timeout_ms) {
            return Err(RelayError::Config(
                "gateway.idle_timeout_ms must be between 10000 and 600000".into(),
            ));
        }
        if self.idle_timeout_ms <= self.ping_interval_ms {
            return Err(RelayError::Config(
                "gateway.idle_timeout_ms must be greater than ping_interval_ms".into(),
            ));
        }
        if !(1024..=16 * 1024 * 1024).contains(&self.max_frame_bytes) {
            return Err(RelayError::Config(
                "gateway.max_frame_bytes must be between 1024 and 16777216".into(),
            ));
        }
        if !(1..=65536).contains(&self.outbound_queue) {
            return Err(RelayError::Config(
                "gateway.outbound_queue must be between 1 and 65536".into(),
            ));
        }
        Ok(())
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_ping_interval_ms() -> u64 {
    20000
}
fn default_idle_timeout_ms() -> u64 {
    60000
}
fn default_max_frame_bytes() -> usize {
    1024 * 1024
}
fn default_outbound_queue() -> usize {
    1024
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResolverSection {
    /// Distinct raw action strings remembered by the symbol cache.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

impl Default for ResolverSection {
    fn default() -> Self {
        Self {
            cache_capacity: default_cache_capacity(),
        }
    }
}

fn default_cache_capacity() -> usize {
    256
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogSection {
    /// `EnvFilter` directives, used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

fn default_log_filter() -> String {
    "info".into()
}
