use async_trait::async_trait;

use relaywire_core::error::Result;
use relaywire_core::protocol::MessageReader;

use crate::actions::ProxyAction;
use crate::dispatch::ActionHandler;
use crate::relay::RelayCtx;

/// Records the session count a backend reports for itself.
///
/// The count is applied to the link the message arrived on, not to the
/// self-declared origin name.
#[derive(Default)]
pub struct PlayerCountService;

impl PlayerCountService {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ActionHandler for PlayerCountService {
    fn action(&self) -> ProxyAction {
        ProxyAction::PlayerCount
    }

    async fn handle(&self, ctx: RelayCtx, mut msg: MessageReader<ProxyAction>) -> Result<()> {
        let count = msg.read_i32()?;

        if msg.origin_server() != ctx.server() {
            tracing::warn!(
                link = ctx.server(),
                origin = msg.origin_server(),
                "player count origin differs from link name"
            );
        }

        let Ok(count) = usize::try_from(count) else {
            tracing::warn!(link = ctx.server(), count, "ignoring negative player count");
            return Ok(());
        };
        ctx.link().set_occupancy(count);
        tracing::debug!(link = ctx.server(), count, "occupancy updated");
        Ok(())
    }
}
