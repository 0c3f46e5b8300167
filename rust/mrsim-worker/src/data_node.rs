use mrsim_types::{Address, Message};

use crate::context::WorkerContext;

/// Answers data requests against this worker's locally stored chunks and
/// map output. Each request is served without blocking the listen loop, via
/// a detached send — matching the original's one-process-per-request
/// `send-data` spawn.
pub async fn run(ctx: WorkerContext) {
    let addr = Address::DataNode(ctx.wid);
    loop {
        match ctx.platform.recv(addr).await {
            Message::GetChunk { reply_to } => {
                reply(&ctx, reply_to, ctx.config.chunk_size);
            }
            Message::GetInterPairs {
                rid,
                already_copied,
                reply_to,
            } => {
                let produced = ctx.map_output.get(ctx.wid, rid);
                let delta = (produced - already_copied).max(0.0);
                reply(&ctx, reply_to, delta);
            }
            Message::Finish => break,
            _ => {}
        }
    }
}

fn reply(ctx: &WorkerContext, reply_to: Address, size: f64) {
    let requester = requester_worker(reply_to);
    let to_host = requester.map(|w| ctx.host_of(w)).unwrap_or(ctx.host);
    let _ = ctx
        .platform
        .send(ctx.host, to_host, reply_to, Message::Data(size), size);
}

fn requester_worker(addr: Address) -> Option<mrsim_types::WorkerId> {
    match addr {
        Address::TaskReply(wid, _) => Some(wid),
        _ => None,
    }
}
