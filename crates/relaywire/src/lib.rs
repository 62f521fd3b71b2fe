//! Top-level facade crate for relaywire.
//!
//! Re-exports the protocol core and the gateway library so users can depend on a single crate.

pub mod core {
    pub use relaywire_core::*;
}

pub mod gateway {
    pub use relaywire_gateway::*;
}
