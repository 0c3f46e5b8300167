use std::cell::Cell;
use std::rc::Rc;

use mrsim_platform::{HostId, Platform};
use mrsim_types::{Address, Message, Phase, TaskCostFn, WorkerId};
use tracing::info;

use crate::error::MasterResult;
use crate::log::TaskLog;
use crate::state::MasterState;

/// Caller-supplied override for `choose_map_task`/`choose_reduce_task`,
/// mirroring the embedded API's `set_scheduler_f(phase, wid) -> task_id`.
/// `None` means "use the default locality-first policy".
pub type SchedulerFn = Rc<dyn Fn(Phase, WorkerId) -> Option<mrsim_types::TaskId>>;

pub struct MasterContext {
    pub platform: Platform,
    pub host: HostId,
    pub worker_hosts: Rc<Vec<HostId>>,
    pub state: Rc<MasterState>,
    pub finished: Rc<Cell<bool>>,
    pub task_cost_f: TaskCostFn,
    pub scheduler_f: Option<SchedulerFn>,
    pub task_log: Rc<TaskLog>,
}

impl MasterContext {
    fn host_of(&self, wid: WorkerId) -> HostId {
        self.worker_hosts[wid.0]
    }
}

/// Runs the master's top-level loop: one message from `MASTER_MAILBOX` at a
/// time, dispatched by kind, until every map and reduce task is done.
pub async fn run(ctx: MasterContext) -> MasterResult<()> {
    print_config(&ctx);
    info!("JOB BEGIN");

    while ctx.state.tasks_pending_total() > 0 {
        match ctx.platform.recv(Address::Master).await {
            Message::Heartbeat(wid) => on_heartbeat(&ctx, wid).await,
            Message::TaskDone(ti, handle) => on_task_done(&ctx, ti, handle).await,
            _ => {}
        }
    }

    ctx.finished.set(true);
    for wid in 0..ctx.worker_hosts.len() {
        let wid = WorkerId(wid);
        let _ = ctx.platform.send(
            ctx.host,
            ctx.host_of(wid),
            Address::TaskTracker(wid),
            Message::Finish,
            0.0,
        );
    }

    print_config(&ctx);
    print_stats(&ctx);
    info!("JOB END");
    Ok(())
}

async fn on_heartbeat(ctx: &MasterContext, wid: WorkerId) {
    let host = ctx.host_of(wid);
    let speed = ctx.platform.host(host).speed;
    let now = ctx.platform.now();

    if ctx.state.is_straggler(wid, speed) {
        ctx.state.mark_slow_tasks(wid, now);
        return;
    }

    if ctx.state.slots_available(Phase::Map, wid) > 0 {
        try_assign(ctx, Phase::Map, wid, now).await;
    }
    if ctx.state.slots_available(Phase::Reduce, wid) > 0 {
        try_assign(ctx, Phase::Reduce, wid, now).await;
    }
}

async fn try_assign(ctx: &MasterContext, phase: Phase, wid: WorkerId, now: f64) {
    let tid = match &ctx.scheduler_f {
        Some(f) => f(phase, wid),
        None => ctx.state.default_tid(phase, wid),
    };
    let Some(tid) = tid else { return };

    let Some((handle, info, task_type)) =
        ctx.state.assign(phase, tid, wid, &ctx.task_cost_f, now)
    else {
        return;
    };

    info!(
        "{} {} assigned to worker {} {}",
        phase.as_str().to_ascii_lowercase(),
        tid,
        wid,
        task_type.describe(),
    );
    ctx.task_log.start(handle, wid, now);

    let _ = ctx.platform.send(
        ctx.host,
        ctx.host_of(wid),
        Address::TaskTracker(wid),
        Message::Task(info, handle),
        0.0,
    );
}

async fn on_task_done(ctx: &MasterContext, ti: mrsim_types::TaskInfo, handle: mrsim_types::TaskHandle) {
    if !ctx.state.mark_done(ti.phase, ti.id) {
        return;
    }

    let now = ctx.platform.now();
    for (copy, sibling_wid) in ctx.state.finish_all_task_copies(ti.phase, ti.id) {
        let sibling_handle = mrsim_types::TaskHandle { phase: ti.phase, tid: ti.id, copy };
        if sibling_handle != handle {
            let _ = ctx.platform.send(
                ctx.host,
                ctx.host_of(sibling_wid),
                Address::TaskReply(sibling_wid, sibling_handle),
                Message::CancelTask,
                0.0,
            );
        }
        ctx.task_log.end(sibling_handle, ti.wid, now, ti.shuffle_end);
    }

    if ctx.state.tasks_pending_for(ti.phase) == 0 {
        info!("{} PHASE DONE", ti.phase);
    }
}

fn print_config(ctx: &MasterContext) {
    let config = ctx.state.config();
    info!("JOB CONFIGURATION:");
    info!("slots: {} map, {} reduce", config.map_slots, config.reduce_slots);
    info!("chunk replicas: {}", config.chunk_replicas);
    info!("chunk size: {:.0} MB", config.chunk_size / 1024.0 / 1024.0);
    info!("input chunks: {}", config.chunk_count);
    info!("maps: {}", config.number_of_maps);
    info!("reduces: {}", config.number_of_reduces);
    info!("workers: {}", config.number_of_workers);
    info!("grid power: {} flops", config.grid_cpu_power);
    info!("average power: {} flops/s", config.grid_average_speed);
    info!("heartbeat interval: {}s", config.heartbeat_interval);
}

fn print_stats(ctx: &MasterContext) {
    let stats = ctx.state.stats();
    info!("JOB STATISTICS:");
    info!("local maps: {}", stats.map_local);
    info!("non-local maps: {}", stats.map_remote);
    info!("speculative maps (local): {}", stats.map_spec_l);
    info!("speculative maps (remote): {}", stats.map_spec_r);
    info!("total non-local maps: {}", stats.total_non_local_maps());
    info!("total speculative maps: {}", stats.total_speculative_maps());
    info!("normal reduces: {}", stats.reduce_normal);
    info!("speculative reduces: {}", stats.reduce_spec);
}
