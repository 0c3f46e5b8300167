use mrsim_types::{Address, Message};

use crate::context::WorkerContext;

/// Sends a zero-size heartbeat to the master on `config.heartbeat_interval`
/// until the job finishes.
pub async fn run(ctx: WorkerContext) {
    while !ctx.finished.get() {
        let _ = ctx.platform.send(
            ctx.host,
            ctx.master_host,
            Address::Master,
            Message::Heartbeat(ctx.wid),
            0.0,
        );
        ctx.platform.sleep(ctx.config.heartbeat_interval).await;
    }
}
