//! Built-in action handlers.

mod fanout;
mod occupancy;
mod targeted;

pub use fanout::{Fanout, FanoutService};
pub use occupancy::PlayerCountService;
pub use targeted::{JoinServerService, SendToServerService};
