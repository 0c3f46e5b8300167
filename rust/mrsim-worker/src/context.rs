use std::cell::Cell;
use std::rc::Rc;

use mrsim_platform::{HostId, Platform};
use mrsim_types::{Config, JobStatusTable, MapOutputFn, MapOutputTable, SlotTable, WorkerId};

/// Shared handle passed to every actor spawned for one worker process:
/// the heartbeat loop, the task-tracker, the data-node, and every per-task
/// compute actor. Cloning is cheap — everything behind it is `Rc`.
#[derive(Clone)]
pub struct WorkerContext {
    pub wid: WorkerId,
    pub host: HostId,
    pub master_host: HostId,
    pub platform: Platform,
    pub config: Rc<Config>,
    pub status: Rc<JobStatusTable>,
    pub map_output: Rc<MapOutputTable>,
    pub slots: Rc<SlotTable>,
    pub worker_hosts: Rc<Vec<HostId>>,
    pub map_output_f: MapOutputFn,
    pub finished: Rc<Cell<bool>>,
}

impl WorkerContext {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        wid: WorkerId,
        host: HostId,
        master_host: HostId,
        platform: Platform,
        config: Rc<Config>,
        status: Rc<JobStatusTable>,
        map_output: Rc<MapOutputTable>,
        slots: Rc<SlotTable>,
        worker_hosts: Rc<Vec<HostId>>,
        map_output_f: MapOutputFn,
        finished: Rc<Cell<bool>>,
    ) -> Self {
        Self {
            wid,
            host,
            master_host,
            platform,
            config,
            status,
            map_output,
            slots,
            worker_hosts,
            map_output_f,
            finished,
        }
    }

    pub fn host_of(&self, wid: WorkerId) -> HostId {
        self.worker_hosts[wid.0]
    }
}
