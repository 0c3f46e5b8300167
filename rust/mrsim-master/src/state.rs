use std::cell::{Cell, RefCell};
use std::rc::Rc;

use mrsim_dfs::{ChunkOwnership, ReplicaPicker};
use mrsim_scheduler::SchedulerView;
use mrsim_types::{
    Config, JobStatusTable, Phase, SlotTable, Stats, TaskId, TaskStatus, WorkerId,
    MAX_SPECULATIVE_COPIES,
};

/// One live compute attempt the master is tracking for cancellation and
/// elapsed-time accounting. The original carries a raw `msg_task_t`; this
/// keeps only what the master itself needs to decide things later.
#[derive(Debug, Clone, Copy)]
pub struct TaskSlot {
    pub wid: WorkerId,
    /// Virtual clock at the moment this attempt was assigned. Stands in for
    /// the original's `compute_duration - remaining_computation`: this
    /// process has no introspection into a peer worker's in-flight compute,
    /// so elapsed time is approximated from assignment time rather than
    /// from the moment execution actually began (see DESIGN.md).
    pub assigned_at: f64,
}

/// Job state owned exclusively by the master actor: per-phase task status,
/// live-copy bookkeeping, slot accounting, and aggregate stats. Implements
/// [`SchedulerView`] directly so `mrsim-scheduler`'s policy functions can
/// read it without this crate depending back on `mrsim-master`.
pub struct MasterState {
    config: Rc<Config>,
    status: Rc<JobStatusTable>,
    slots: Rc<SlotTable>,
    chunk_owners: ChunkOwnership,
    replica_picker: RefCell<ReplicaPicker>,
    tasks_pending: Cell<(usize, usize)>,
    map_instances: RefCell<Vec<usize>>,
    reduce_instances: RefCell<Vec<usize>>,
    map_task_list: RefCell<Vec<[Option<TaskSlot>; MAX_SPECULATIVE_COPIES]>>,
    reduce_task_list: RefCell<Vec<[Option<TaskSlot>; MAX_SPECULATIVE_COPIES]>>,
    stats: RefCell<Stats>,
}

impl MasterState {
    pub fn new(
        config: Rc<Config>,
        status: Rc<JobStatusTable>,
        slots: Rc<SlotTable>,
        chunk_owners: ChunkOwnership,
        replica_seed: u64,
    ) -> Self {
        let map_task_list = vec![[None; MAX_SPECULATIVE_COPIES]; config.number_of_maps];
        let reduce_task_list = vec![[None; MAX_SPECULATIVE_COPIES]; config.number_of_reduces];
        let replica_picker = ReplicaPicker::new(replica_seed, config.chunk_replicas);
        Self {
            tasks_pending: Cell::new((config.number_of_maps, config.number_of_reduces)),
            map_instances: RefCell::new(vec![0; config.number_of_maps]),
            reduce_instances: RefCell::new(vec![0; config.number_of_reduces]),
            map_task_list: RefCell::new(map_task_list),
            reduce_task_list: RefCell::new(reduce_task_list),
            stats: RefCell::new(Stats::default()),
            replica_picker: RefCell::new(replica_picker),
            chunk_owners,
            config,
            status,
            slots,
        }
    }

    fn instances(&self, phase: Phase) -> &RefCell<Vec<usize>> {
        match phase {
            Phase::Map => &self.map_instances,
            Phase::Reduce => &self.reduce_instances,
        }
    }

    pub(crate) fn task_list(
        &self,
        phase: Phase,
    ) -> &RefCell<Vec<[Option<TaskSlot>; MAX_SPECULATIVE_COPIES]>> {
        match phase {
            Phase::Map => &self.map_task_list,
            Phase::Reduce => &self.reduce_task_list,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub(crate) fn status(&self) -> &JobStatusTable {
        &self.status
    }

    pub fn chunk_owners(&self) -> &ChunkOwnership {
        &self.chunk_owners
    }

    pub fn replica_picker(&self) -> &RefCell<ReplicaPicker> {
        &self.replica_picker
    }

    pub fn slots_available(&self, phase: Phase, wid: WorkerId) -> usize {
        self.slots.available(phase, wid)
    }

    pub fn slots(&self) -> &SlotTable {
        &self.slots
    }

    pub fn tasks_pending_total(&self) -> usize {
        let (m, r) = self.tasks_pending.get();
        m + r
    }

    pub fn tasks_pending_for(&self, phase: Phase) -> usize {
        let (m, r) = self.tasks_pending.get();
        match phase {
            Phase::Map => m,
            Phase::Reduce => r,
        }
    }

    fn decrement_pending(&self, phase: Phase) {
        let (mut m, mut r) = self.tasks_pending.get();
        match phase {
            Phase::Map => m -= 1,
            Phase::Reduce => r -= 1,
        }
        self.tasks_pending.set((m, r));
    }

    pub fn stats(&self) -> Stats {
        *self.stats.borrow()
    }

    pub(crate) fn record_stat(&self, task_type: mrsim_types::TaskType) {
        self.stats.borrow_mut().record(task_type);
    }

    pub(crate) fn bump_instances(&self, phase: Phase, tid: TaskId) {
        self.instances(phase).borrow_mut()[tid.0] += 1;
    }

    /// Records DONE for `(phase, tid)` unless it already was, decrementing
    /// `tasks_pending`. Returns whether this call was the winning, first
    /// completion.
    pub fn mark_done(&self, phase: Phase, tid: TaskId) -> bool {
        if self.status.get(phase, tid) == TaskStatus::Done {
            return false;
        }
        self.status.set(phase, tid, TaskStatus::Done);
        self.decrement_pending(phase);
        true
    }
}

impl SchedulerView for MasterState {
    fn task_status(&self, phase: Phase, tid: TaskId) -> TaskStatus {
        self.status.get(phase, tid)
    }

    fn task_instances(&self, phase: Phase, tid: TaskId) -> usize {
        self.instances(phase).borrow()[tid.0]
    }

    fn is_chunk_owner(&self, chunk: TaskId, worker: WorkerId) -> bool {
        self.chunk_owners.is_owner(chunk, worker)
    }

    fn tasks_pending(&self, phase: Phase) -> usize {
        self.tasks_pending_for(phase)
    }

    fn number_of_maps(&self) -> usize {
        self.config.number_of_maps
    }

    fn number_of_reduces(&self) -> usize {
        self.config.number_of_reduces
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::state;
    use super::*;

    #[test]
    fn new_state_starts_with_every_task_pending() {
        let s = state(4, 4, 2);
        assert_eq!(s.tasks_pending_total(), 6);
        assert_eq!(s.tasks_pending_for(Phase::Map), 4);
        assert_eq!(s.tasks_pending_for(Phase::Reduce), 2);
    }

    #[test]
    fn mark_done_is_idempotent_and_reports_the_winner() {
        let s = state(2, 1, 0);
        assert!(s.mark_done(Phase::Map, TaskId(0)));
        assert!(!s.mark_done(Phase::Map, TaskId(0)));
        assert_eq!(s.tasks_pending_for(Phase::Map), 0);
    }

    #[test]
    fn bump_instances_is_visible_through_scheduler_view() {
        let s = state(2, 1, 0);
        assert_eq!(s.task_instances(Phase::Map, TaskId(0)), 0);
        s.bump_instances(Phase::Map, TaskId(0));
        assert_eq!(s.task_instances(Phase::Map, TaskId(0)), 1);
    }
}
