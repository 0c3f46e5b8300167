use futures::future::{select, Either};
use tracing::info;

use mrsim_kernel::ExecuteOutcome;
use mrsim_types::{
    Address, Message, Phase, TaskHandle, TaskId, TaskInfo, TaskStatus, WorkerId,
    SHUFFLE_POLL_INTERVAL_SECS,
};

use crate::context::WorkerContext;

/// Runs one task attempt end to end: fetch its input, execute it (racing
/// against a possible `CancelTask` from the master), record its effect on
/// shared state, and report completion — unless the job already finished
/// around it.
pub async fn run(ctx: WorkerContext, mut ti: TaskInfo, handle: TaskHandle) {
    let reply_to = Address::TaskReply(ctx.wid, handle);

    match ti.phase {
        Phase::Map => fetch_chunk(&ctx, &ti, reply_to).await,
        Phase::Reduce => shuffle(&ctx, &mut ti, reply_to).await,
    }

    // A sibling copy may have finished (and been marked Done) while this
    // attempt was still fetching its input; skip execution in that case.
    if ctx.status.get(ti.phase, ti.id) != TaskStatus::Done {
        let (task, _compute_handle) = ctx.platform.compute(ctx.host, ti.cpu_required);
        let cancel = ctx.platform.recv(reply_to);
        let outcome = match select(Box::pin(task), Box::pin(cancel)).await {
            Either::Left((outcome, _)) => outcome,
            Either::Right((_cancel_msg, _)) => ExecuteOutcome::Cancelled,
        };

        if ti.phase == Phase::Map && outcome == ExecuteOutcome::Completed {
            update_map_output(&ctx, ti.id);
        }

        info!(
            "{} {} {} on worker {}",
            ti.phase.as_str().to_ascii_lowercase(),
            ti.id,
            match outcome {
                ExecuteOutcome::Completed => "completed",
                ExecuteOutcome::Cancelled => "cancelled",
            },
            ctx.wid,
        );
    }

    ctx.slots.release(ti.phase, ti.wid);

    if !ctx.finished.get() {
        let _ = ctx.platform.send(
            ctx.host,
            ctx.master_host,
            Address::Master,
            Message::TaskDone(ti, handle),
            0.0,
        );
    }
}

/// Distributes this worker's freshly produced map output across every
/// reducer's row, per the user-supplied [`mrsim_types::MapOutputFn`].
fn update_map_output(ctx: &WorkerContext, mid: TaskId) {
    for rid in 0..ctx.config.number_of_reduces {
        let rid = TaskId(rid);
        let amount = (ctx.map_output_f)(mid, rid);
        ctx.map_output.add(ctx.wid, rid, amount);
    }
}

/// Requests the map task's input chunk from its owning data-node, unless it
/// is already local.
async fn fetch_chunk(ctx: &WorkerContext, ti: &TaskInfo, reply_to: Address) {
    if ti.src == ctx.wid {
        return;
    }
    let _ = ctx.platform.send(
        ctx.host,
        ctx.host_of(ti.src),
        Address::DataNode(ti.src),
        Message::GetChunk { reply_to },
        0.0,
    );
    ctx.platform.recv(reply_to).await;
}

/// Reducer-side shuffle: repeatedly sweeps every worker's data-node for
/// newly produced intermediate pairs destined for `ti.id`, until the total
/// expected output has been copied, or the reduce task is marked done by
/// someone else (a sibling speculative copy) mid-sweep.
async fn shuffle(ctx: &WorkerContext, ti: &mut TaskInfo, reply_to: Address) {
    let mut data_copied = vec![0.0_f64; ctx.config.number_of_workers];
    let mut total_copied = 0.0_f64;
    let mut must_copy = 0.0_f64;
    for mid in 0..ctx.config.number_of_maps {
        must_copy += (ctx.map_output_f)(TaskId(mid), ti.id);
    }

    while total_copied < must_copy {
        for wid in 0..ctx.config.number_of_workers {
            let wid = WorkerId(wid);
            if ctx.status.get(Phase::Reduce, ti.id) == TaskStatus::Done {
                return;
            }

            let available = ctx.map_output.get(wid, ti.id);
            if available > data_copied[wid.0] {
                let _ = ctx.platform.send(
                    ctx.host,
                    ctx.host_of(wid),
                    Address::DataNode(wid),
                    Message::GetInterPairs {
                        rid: ti.id,
                        already_copied: data_copied[wid.0],
                        reply_to,
                    },
                    0.0,
                );
                if let Message::Data(size) = ctx.platform.recv(reply_to).await {
                    data_copied[wid.0] += size;
                    total_copied += size;
                }
            }
        }
        ctx.platform.sleep(SHUFFLE_POLL_INTERVAL_SECS).await;
    }

    ti.shuffle_end = ctx.platform.now();
    info!("reduce {} shuffle complete on worker {}", ti.id, ctx.wid);
}

#[cfg(test)]
mod tests {
    use super::*;
    use mrsim_kernel::Kernel;
    use mrsim_platform::{Host, HostId, NetworkTopology, Platform};
    use mrsim_types::{Config, JobStatusTable, MapOutputTable, SlotTable, TaskHandle, WorkerId};
    use std::cell::Cell;
    use std::rc::Rc;

    fn sample_config() -> Config {
        Config {
            chunk_size: 1_000_000.0,
            chunk_count: 2,
            chunk_replicas: 1,
            map_slots: 2,
            reduce_slots: 2,
            number_of_reduces: 1,
            number_of_maps: 2,
            heartbeat_interval: 3.0,
            grid_cpu_power: 2e9,
            grid_average_speed: 1e9,
            number_of_workers: 2,
            cpu_required_map: 1e9,
            cpu_required_reduce: 1e9,
            map_output_size: 100.0,
        }
    }

    fn two_worker_ctx(platform: &Platform) -> (WorkerContext, WorkerContext) {
        let config = Rc::new(sample_config());
        let status = Rc::new(JobStatusTable::new(config.number_of_maps, config.number_of_reduces));
        let map_output = Rc::new(MapOutputTable::new(config.number_of_workers, config.number_of_reduces));
        let slots = Rc::new(SlotTable::new(config.number_of_workers, config.map_slots, config.reduce_slots));
        let worker_hosts = Rc::new(vec![HostId(1), HostId(2)]);
        let map_output_f: mrsim_types::MapOutputFn = Rc::new(|_, _| 50.0);
        let finished = Rc::new(Cell::new(false));

        let w0 = WorkerContext::new(
            WorkerId(0),
            HostId(1),
            HostId(0),
            platform.clone(),
            config.clone(),
            status.clone(),
            map_output.clone(),
            slots.clone(),
            worker_hosts.clone(),
            map_output_f.clone(),
            finished.clone(),
        );
        let w1 = WorkerContext::new(
            WorkerId(1),
            HostId(2),
            HostId(0),
            platform.clone(),
            config,
            status,
            map_output,
            slots,
            worker_hosts,
            map_output_f,
            finished,
        );
        (w0, w1)
    }

    #[test]
    fn remote_map_task_fetches_chunk_then_updates_map_output() {
        let mut kernel = Kernel::new();
        let hosts = vec![
            Host { id: HostId(0), name: "m".into(), speed: 1e9 },
            Host { id: HostId(1), name: "w0".into(), speed: 1e9 },
            Host { id: HostId(2), name: "w1".into(), speed: 1e9 },
        ];
        let platform = Platform::new(kernel.handle(), hosts, NetworkTopology::new(1e9));
        let (w0, w1) = two_worker_ctx(&platform);

        // w1 is the data-node owning the chunk for map task 0, assigned to w0.
        kernel.spawn(crate::data_node::run(w1.clone())).unwrap();
        let w1_platform = w1.platform.clone();
        let w1_wid = w1.wid;
        kernel
            .spawn(async move {
                w1_platform.sleep(5.0).await;
                w1_platform
                    .send(HostId(2), HostId(2), Address::DataNode(w1_wid), Message::Finish, 0.0)
                    .unwrap();
            })
            .unwrap();

        let ti = TaskInfo::new(Phase::Map, TaskId(0), WorkerId(1), WorkerId(0), 1e9);
        let handle = TaskHandle { phase: Phase::Map, tid: TaskId(0), copy: 0 };
        let map_output = w0.map_output.clone();
        kernel.spawn(run(w0, ti, handle)).unwrap();

        kernel.run().unwrap();
        assert_eq!(map_output.get(WorkerId(0), TaskId(0)), 50.0);
    }

    #[test]
    fn local_map_task_skips_the_chunk_fetch() {
        let mut kernel = Kernel::new();
        let hosts = vec![
            Host { id: HostId(0), name: "m".into(), speed: 1e9 },
            Host { id: HostId(1), name: "w0".into(), speed: 1e9 },
            Host { id: HostId(2), name: "w1".into(), speed: 1e9 },
        ];
        let platform = Platform::new(kernel.handle(), hosts, NetworkTopology::new(1e9));
        let (w0, _w1) = two_worker_ctx(&platform);

        let ti = TaskInfo::new(Phase::Map, TaskId(0), WorkerId(0), WorkerId(0), 1e9);
        let handle = TaskHandle { phase: Phase::Map, tid: TaskId(0), copy: 0 };
        let slots = w0.slots.clone();
        slots.acquire(Phase::Map, WorkerId(0));
        kernel.spawn(run(w0, ti, handle)).unwrap();

        kernel.run().unwrap();
        assert_eq!(slots.available(Phase::Map, WorkerId(0)), 2);
    }

    #[test]
    fn cancel_message_stops_execution_without_recording_map_output() {
        let mut kernel = Kernel::new();
        let hosts = vec![
            Host { id: HostId(0), name: "m".into(), speed: 1e9 },
            Host { id: HostId(1), name: "w0".into(), speed: 1e9 },
            Host { id: HostId(2), name: "w1".into(), speed: 1e9 },
        ];
        let platform = Platform::new(kernel.handle(), hosts, NetworkTopology::new(1e9));
        let (w0, _w1) = two_worker_ctx(&platform);

        let ti = TaskInfo::new(Phase::Map, TaskId(0), WorkerId(0), WorkerId(0), 1e9);
        let handle = TaskHandle { phase: Phase::Map, tid: TaskId(0), copy: 0 };
        let map_output = w0.map_output.clone();
        let p = w0.platform.clone();
        let wid = w0.wid;

        kernel.spawn(run(w0, ti, handle)).unwrap();
        kernel
            .spawn(async move {
                p.sleep(0.1).await;
                p.send(
                    HostId(0),
                    HostId(1),
                    Address::TaskReply(wid, handle),
                    Message::CancelTask,
                    0.0,
                )
                .unwrap();
            })
            .unwrap();

        kernel.run().unwrap();
        assert_eq!(map_output.get(WorkerId(0), TaskId(0)), 0.0);
    }
}
