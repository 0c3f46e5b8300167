use crate::{Phase, TaskId, WorkerId};

/// Lifecycle state of a single map or reduce task. Monotonic: once `Done`,
/// no write may move it away from `Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TaskStatus {
    Pending,
    Tip,
    TipSlow,
    Done,
}

impl TaskStatus {
    pub fn is_done(self) -> bool {
        self == TaskStatus::Done
    }
}

/// Derived scheduling classification for a (task, candidate worker) pair.
/// Never stored; recomputed on demand by the scheduler. Ordinal order is the
/// preference order within a phase — `Ord` is derived from declaration order,
/// so `LOCAL < REMOTE < LOCAL_SPEC < REMOTE_SPEC` and `NORMAL < SPECULATIVE`
/// both read correctly as "lower is more preferred", with `NoTask` sorting
/// last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TaskType {
    Local,
    Normal,
    Remote,
    LocalSpec,
    Speculative,
    RemoteSpec,
    NoTask,
}

impl TaskType {
    /// Human-readable suffix matching the original tool's assignment log line.
    pub fn describe(self) -> &'static str {
        match self {
            TaskType::Remote => "(non-local)",
            TaskType::LocalSpec | TaskType::Speculative => "(speculative)",
            TaskType::RemoteSpec => "(non-local, speculative)",
            _ => "",
        }
    }
}

/// Slab index into the master's `task_list[phase][tid]` copy array, replacing
/// the original's raw task pointers. A `TaskHandle` becomes invalid once its
/// slot is cleared on completion or cancellation; holding on to a stale one
/// is a logic error in the owning crate, not a use-after-free, since the slab
/// never reuses a slot while a `TaskHandle` referencing it is still live in
/// `task_list`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle {
    pub phase: Phase,
    pub tid: TaskId,
    pub copy: usize,
}

/// Descriptor carried by every task message: `SMS-T` outbound, `SMS-TD`
/// inbound. Created by the master at assignment, owned by the in-flight
/// message, handed to the worker's compute actor, and returned attached to
/// the completion message.
#[derive(Debug, Clone)]
pub struct TaskInfo {
    pub phase: Phase,
    pub id: TaskId,
    /// DataNode that owns the task's input data (map: chunk source).
    pub src: WorkerId,
    /// Worker the task was assigned to.
    pub wid: WorkerId,
    pub cpu_required: f64,
    /// Wall clock (virtual) at which the reducer's shuffle finished; zero
    /// until set.
    pub shuffle_end: f64,
}

impl TaskInfo {
    pub fn new(phase: Phase, id: TaskId, src: WorkerId, wid: WorkerId, cpu_required: f64) -> Self {
        Self {
            phase,
            id,
            src,
            wid,
            cpu_required,
            shuffle_end: 0.0,
        }
    }
}
