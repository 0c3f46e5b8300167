use mrsim_types::{Address, Message};

use crate::compute;
use crate::context::WorkerContext;

/// Task-tracker loop: receives `Task` assignments on this worker's mailbox
/// and spawns a fresh compute actor for each one, until `Finish`.
pub async fn run(ctx: WorkerContext) {
    let addr = Address::TaskTracker(ctx.wid);
    loop {
        match ctx.platform.recv(addr).await {
            Message::Task(ti, handle) => {
                let child = ctx.clone();
                let _ = ctx.platform.spawn(async move {
                    compute::run(child, ti, handle).await;
                });
            }
            Message::Finish => break,
            _ => {}
        }
    }
}
