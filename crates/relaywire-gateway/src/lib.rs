//! relaywire gateway library entry.
//!
//! This crate wires the backend transport, the server directory, the action
//! dispatcher and the built-in handlers into the proxy tier. It is intended to
//! be consumed by the binary (`main.rs`) and by integration tests.

pub mod actions;
pub mod app_state;
pub mod config;
pub mod dispatch;
pub mod ops;
pub mod relay;
pub mod router;
pub mod services;
pub mod transport;
