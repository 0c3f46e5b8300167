//! Shared domain vocabulary for the MapReduce cluster simulator: phases,
//! task lifecycle state, worker/task identifiers, the wire message enum and
//! the immutable job `Config`.

mod address;
mod config;
mod job;
mod message;
mod stats;
mod task;

use std::rc::Rc;

pub use address::Address;
pub use config::Config;
pub use job::{JobStatusTable, MapOutputTable, SlotTable};
pub use message::Message;
pub use stats::Stats;
pub use task::{TaskHandle, TaskInfo, TaskStatus, TaskType};

/// User-pluggable model of how much intermediate data map task `mid`
/// produces for reducer `rid`, in bytes. Deterministic and independent of
/// execution order, so both the producing worker (to populate
/// [`MapOutputTable`]) and a consuming reducer (to compute how much it must
/// eventually copy in total) can call it directly instead of coordinating
/// over a message.
pub type MapOutputFn = Rc<dyn Fn(TaskId, TaskId) -> f64>;

/// User-pluggable model of how many FLOPs task `tid` of `phase` requires when
/// run on worker `wid`. Lets a scenario vary cost by data locality or worker
/// heterogeneity instead of hardcoding `cpu_required_map`/`cpu_required_reduce`.
pub type TaskCostFn = Rc<dyn Fn(Phase, TaskId, WorkerId) -> f64>;

/// Maximum live copies (primary + speculative) of a single task.
pub const MAX_SPECULATIVE_COPIES: usize = 3;

/// Elapsed compute time, in virtual seconds, after which a task running on a
/// straggler becomes eligible for a speculative copy.
pub const STRAGGLER_THRESHOLD_SECS: f64 = 60.0;

/// Poll interval used by the reducer-side shuffle loop.
pub const SHUFFLE_POLL_INTERVAL_SECS: f64 = 5.0;

/// Fraction of the map phase that must complete before any reduce task is
/// dispatched.
pub const REDUCE_BACKPRESSURE_THRESHOLD: f64 = 0.9;

/// A job phase: map or reduce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Phase {
    Map,
    Reduce,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Map => "MAP",
            Phase::Reduce => "REDUCE",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Zero-based worker identifier, distinct from a host identifier in
/// `mrsim-platform` (a worker is a process deployed onto a host).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorkerId(pub usize);

impl std::fmt::Display for WorkerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Zero-based chunk or reduce-task identifier (the meaning depends on phase).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub usize);

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
