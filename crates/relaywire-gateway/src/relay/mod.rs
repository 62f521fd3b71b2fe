//! Relay runtime: backend directory, forwarding engine, and the per-message
//! context handed to action handlers.

mod ctx;
mod directory;
mod forward;
mod link;

pub use ctx::RelayCtx;
pub use directory::{Directory, ServerDirectory};
pub use forward::{Delivery, ForwardReport, Forwarder};
pub use link::{BackendLink, Destination, Peer};
