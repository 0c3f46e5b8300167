//! Embedded API: the `init()` / `set_*` / `run()` surface a driver program
//! uses to wire callbacks, a resolved deployment, and a job configuration
//! into one discrete-event simulation run.
//!
//! The CLI binary (`src/main.rs`) is one such driver; a library consumer
//! wanting a custom `task_cost_f`, `map_output_f`, `dfs_f`, or `scheduler_f`
//! is another.

mod error;
mod report;

use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;

use mrsim_config::{finalize, read_deploy_toml, read_job_config_file, read_platform_toml, resolve};
use mrsim_dfs::{write_chunks_log, ChunkOwnership, DefaultPlacement, DfsPlacement};
use mrsim_kernel::Kernel;
use mrsim_master::{MasterContext, MasterState, SchedulerFn, TaskLog};
use mrsim_types::{
    Config, JobStatusTable, MapOutputFn, MapOutputTable, Phase, SlotTable, TaskCostFn, WorkerId,
};
use mrsim_worker::WorkerContext;

pub use error::{SimError, SimResult};
pub use report::Report;

/// User-pluggable chunk placement, mirroring the embedded API's `dfs_f`.
/// Unlike the original's mutate-a-preallocated-matrix signature, this
/// returns a freshly built [`ChunkOwnership`] — the core never touches the
/// matrix again after placement runs either way, so returning one is the
/// more idiomatic shape for the same contract.
pub type DfsFn = Rc<dyn Fn(usize, usize, usize) -> ChunkOwnership>;

/// Fixed RNG seed for [`mrsim_dfs::ReplicaPicker`], so two runs of the same
/// job configuration produce identical remote-owner choices (§4.6 step 3).
const REPLICA_RNG_SEED: u64 = 12345;

/// Paths to the three input files and two output logs a run reads and
/// writes. All five are independently overridable so a driver can lay out a
/// scratch directory however it likes.
#[derive(Debug, Clone)]
pub struct RunPaths {
    pub platform: PathBuf,
    pub deploy: PathBuf,
    pub job_config: PathBuf,
    pub tasks_log: PathBuf,
    pub chunks_log: PathBuf,
}

impl Default for RunPaths {
    fn default() -> Self {
        Self {
            platform: "platform.toml".into(),
            deploy: "deploy.toml".into(),
            job_config: "job.conf".into(),
            tasks_log: "tasks.csv".into(),
            chunks_log: "chunks.log".into(),
        }
    }
}

/// Builder for one simulation run. Every callback has a usable default
/// derived from [`Config`] (§6), so a caller only needs `set_*` for the
/// behavior it actually wants to override.
#[derive(Default)]
pub struct Simulation {
    task_cost_f: Option<TaskCostFn>,
    map_output_f: Option<MapOutputFn>,
    dfs_f: Option<DfsFn>,
    scheduler_f: Option<SchedulerFn>,
}

impl Simulation {
    /// Installs defaults. Equivalent to `Simulation::default()`, named to
    /// match the embedded API's `init()` entry point.
    pub fn init() -> Self {
        Self::default()
    }

    pub fn set_task_cost_f(mut self, f: TaskCostFn) -> Self {
        self.task_cost_f = Some(f);
        self
    }

    pub fn set_map_output_f(mut self, f: MapOutputFn) -> Self {
        self.map_output_f = Some(f);
        self
    }

    pub fn set_dfs_f(mut self, f: DfsFn) -> Self {
        self.dfs_f = Some(f);
        self
    }

    pub fn set_scheduler_f(mut self, f: SchedulerFn) -> Self {
        self.scheduler_f = Some(f);
        self
    }

    /// Reads `paths`, resolves the deployment, spawns every actor onto a
    /// fresh kernel, and runs it to quiescence (§4.6).
    pub fn run(self, paths: &RunPaths) -> SimResult<Report> {
        let platform_desc = read_platform_toml(&paths.platform)?;
        let deploy_desc = read_deploy_toml(&paths.deploy)?;
        let raw_job = read_job_config_file(&paths.job_config)?;

        let mut kernel = Kernel::new();
        let deployment = resolve(kernel.handle(), &platform_desc, &deploy_desc)?;
        let config = Rc::new(finalize(
            &raw_job,
            deployment.worker_count(),
            deployment.grid_cpu_power(),
        ));

        let dfs_f = self.dfs_f.unwrap_or_else(|| {
            Rc::new(|chunks, workers, replicas| DefaultPlacement.place(chunks, workers, replicas))
        });
        let chunk_owners = dfs_f(
            config.number_of_maps,
            config.number_of_workers,
            config.chunk_replicas,
        );
        write_chunks_log(&paths.chunks_log, &chunk_owners)?;

        let status = Rc::new(JobStatusTable::new(
            config.number_of_maps,
            config.number_of_reduces,
        ));
        let map_output = Rc::new(MapOutputTable::new(
            config.number_of_workers,
            config.number_of_reduces,
        ));
        let slots = Rc::new(SlotTable::new(
            config.number_of_workers,
            config.map_slots,
            config.reduce_slots,
        ));
        let finished = Rc::new(Cell::new(false));
        let worker_hosts = Rc::new(deployment.worker_hosts.clone());

        let map_output_f = self
            .map_output_f
            .unwrap_or_else(|| default_map_output_f(&config));
        let task_cost_f = self
            .task_cost_f
            .unwrap_or_else(|| default_task_cost_f(&config));

        let task_log = Rc::new(TaskLog::create(&paths.tasks_log)?);

        let master_state = Rc::new(MasterState::new(
            config.clone(),
            status.clone(),
            slots.clone(),
            chunk_owners,
            REPLICA_RNG_SEED,
        ));

        for w in 0..deployment.worker_count() {
            let wid = WorkerId(w);
            let worker_ctx = WorkerContext::new(
                wid,
                deployment.host_for_worker(wid),
                deployment.master_host,
                deployment.platform.clone(),
                config.clone(),
                status.clone(),
                map_output.clone(),
                slots.clone(),
                worker_hosts.clone(),
                map_output_f.clone(),
                finished.clone(),
            );
            mrsim_worker::spawn(worker_ctx)?;
        }

        let master_ctx = MasterContext {
            platform: deployment.platform.clone(),
            host: deployment.master_host,
            worker_hosts,
            state: master_state.clone(),
            finished,
            task_cost_f,
            scheduler_f: self.scheduler_f,
            task_log,
        };
        deployment.platform.spawn(async move {
            if let Err(e) = mrsim_master::run(master_ctx).await {
                tracing::error!("master actor failed: {e}");
            }
        })?;

        kernel.run()?;

        Ok(Report::new(&config, master_state.stats(), kernel.now()))
    }
}

/// Default `task_cost_f`: `cpu_required_map`/`cpu_required_reduce` from
/// [`Config`], independent of which task or worker is asked (§6).
fn default_task_cost_f(config: &Rc<Config>) -> TaskCostFn {
    let config = config.clone();
    Rc::new(move |phase, _tid, _wid| match phase {
        Phase::Map => config.cpu_required_map,
        Phase::Reduce => config.cpu_required_reduce,
    })
}

/// Default `map_output_f`: an even split of `map_output_size` across every
/// reducer (§6).
fn default_map_output_f(config: &Rc<Config>) -> MapOutputFn {
    let config = config.clone();
    Rc::new(move |_mid, _rid| config.map_output_size / config.number_of_reduces.max(1) as f64)
}
