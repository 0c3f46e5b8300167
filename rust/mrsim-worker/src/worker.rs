use tracing::info;

use mrsim_types::{Address, Message};

use crate::context::WorkerContext;
use crate::error::WorkerResult;
use crate::{data_node, heartbeat, listen};

/// Spawns a worker process's three actors onto the kernel: the task-tracker
/// (`listen`), the data-node, and the heartbeat loop. When the heartbeat
/// loop observes the job has finished it signals the other two to stop,
/// mirroring the original's `worker()` shutdown sequence.
pub fn spawn(ctx: WorkerContext) -> WorkerResult<()> {
    ctx.platform.spawn(listen::run(ctx.clone()))?;
    ctx.platform.spawn(data_node::run(ctx.clone()))?;

    let top = ctx.clone();
    ctx.platform.spawn(async move {
        heartbeat::run(top.clone()).await;

        info!("worker {} shutting down", top.wid);
        let _ = top.platform.send(
            top.host,
            top.host,
            Address::DataNode(top.wid),
            Message::Finish,
            0.0,
        );
        let _ = top.platform.send(
            top.host,
            top.host,
            Address::TaskTracker(top.wid),
            Message::Finish,
            0.0,
        );
    })?;

    Ok(())
}
