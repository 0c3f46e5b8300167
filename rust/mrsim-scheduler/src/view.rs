use mrsim_types::{Phase, TaskId, TaskStatus, WorkerId};

/// Read-only view of job state the scheduler needs to classify and rank
/// candidate tasks. Implemented by the master's job-state owner so this
/// crate never depends on `mrsim-master`/`mrsim-dfs` directly — dependency
/// runs the other way, `mrsim-master` depends on this crate's policy
/// functions and implements `SchedulerView` over its own state.
pub trait SchedulerView {
    fn task_status(&self, phase: Phase, tid: TaskId) -> TaskStatus;
    fn task_instances(&self, phase: Phase, tid: TaskId) -> usize;
    fn is_chunk_owner(&self, chunk: TaskId, worker: WorkerId) -> bool;
    fn tasks_pending(&self, phase: Phase) -> usize;
    fn number_of_maps(&self) -> usize;
    fn number_of_reduces(&self) -> usize;
}
