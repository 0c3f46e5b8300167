use std::cell::RefCell;

use crate::{Phase, TaskId, TaskStatus, WorkerId};

/// Shared `task_status[phase][tid]` grid. The master is the only writer
/// (guarded internally against regressing a `Done` task); workers and the
/// scheduler read it — the original kept this in one process's shared
/// memory, and since every actor in this simulator runs on one logical
/// thread, an `Rc<JobStatusTable>` reproduces that directly rather than
/// routing every read through a message.
pub struct JobStatusTable {
    map: RefCell<Vec<TaskStatus>>,
    reduce: RefCell<Vec<TaskStatus>>,
}

impl JobStatusTable {
    pub fn new(number_of_maps: usize, number_of_reduces: usize) -> Self {
        Self {
            map: RefCell::new(vec![TaskStatus::Pending; number_of_maps]),
            reduce: RefCell::new(vec![TaskStatus::Pending; number_of_reduces]),
        }
    }

    fn table(&self, phase: Phase) -> &RefCell<Vec<TaskStatus>> {
        match phase {
            Phase::Map => &self.map,
            Phase::Reduce => &self.reduce,
        }
    }

    pub fn get(&self, phase: Phase, tid: TaskId) -> TaskStatus {
        self.table(phase).borrow()[tid.0]
    }

    /// Set the status unless it is already `Done` — `Done` is absorbing.
    pub fn set(&self, phase: Phase, tid: TaskId, status: TaskStatus) {
        let mut table = self.table(phase).borrow_mut();
        if table[tid.0] != TaskStatus::Done {
            table[tid.0] = status;
        }
    }
}

/// Shared `map_output[wid][rid]` grid: bytes produced by the mapper on
/// worker `wid` destined for reducer `rid`. Written only by the owning
/// worker's compute actor; read by that worker's data-node and by every
/// reducer's shuffle loop when deciding whether a peer has new data to pull.
pub struct MapOutputTable {
    rows: RefCell<Vec<Vec<f64>>>,
}

impl MapOutputTable {
    pub fn new(number_of_workers: usize, number_of_reduces: usize) -> Self {
        Self {
            rows: RefCell::new(vec![vec![0.0; number_of_reduces]; number_of_workers]),
        }
    }

    pub fn get(&self, wid: crate::WorkerId, rid: TaskId) -> f64 {
        self.rows.borrow()[wid.0][rid.0]
    }

    pub fn add(&self, wid: crate::WorkerId, rid: TaskId, amount: f64) {
        self.rows.borrow_mut()[wid.0][rid.0] += amount;
    }
}

/// Shared `w_heartbeat[wid].slots_av[phase]` counters. The master decrements
/// a worker's slot when it assigns a task there; that same worker's compute
/// actor increments it back on completion or cancellation. The original kept
/// this as one array mutated by both sides in the same address space — since
/// every actor here runs on one logical thread too, one `Rc<SlotTable>` is
/// the direct equivalent, rather than two copies reconciled over heartbeats.
pub struct SlotTable {
    map: RefCell<Vec<usize>>,
    reduce: RefCell<Vec<usize>>,
}

impl SlotTable {
    pub fn new(number_of_workers: usize, map_slots: usize, reduce_slots: usize) -> Self {
        Self {
            map: RefCell::new(vec![map_slots; number_of_workers]),
            reduce: RefCell::new(vec![reduce_slots; number_of_workers]),
        }
    }

    fn table(&self, phase: Phase) -> &RefCell<Vec<usize>> {
        match phase {
            Phase::Map => &self.map,
            Phase::Reduce => &self.reduce,
        }
    }

    pub fn available(&self, phase: Phase, wid: WorkerId) -> usize {
        self.table(phase).borrow()[wid.0]
    }

    /// Called by the master when it assigns a task to `wid`.
    pub fn acquire(&self, phase: Phase, wid: WorkerId) {
        self.table(phase).borrow_mut()[wid.0] -= 1;
    }

    /// Called by `wid`'s own compute actor when a task finishes or is
    /// cancelled.
    pub fn release(&self, phase: Phase, wid: WorkerId) {
        self.table(phase).borrow_mut()[wid.0] += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_round_trip_through_acquire_and_release() {
        let table = SlotTable::new(2, 3, 1);
        table.acquire(Phase::Map, WorkerId(0));
        assert_eq!(table.available(Phase::Map, WorkerId(0)), 2);
        table.release(Phase::Map, WorkerId(0));
        assert_eq!(table.available(Phase::Map, WorkerId(0)), 3);
        assert_eq!(table.available(Phase::Map, WorkerId(1)), 3);
    }

    #[test]
    fn status_cannot_regress_from_done() {
        let table = JobStatusTable::new(1, 0);
        table.set(Phase::Map, TaskId(0), TaskStatus::Done);
        table.set(Phase::Map, TaskId(0), TaskStatus::TipSlow);
        assert_eq!(table.get(Phase::Map, TaskId(0)), TaskStatus::Done);
    }

    #[test]
    fn map_output_accumulates() {
        let table = MapOutputTable::new(2, 1);
        table.add(WorkerId(0), TaskId(0), 10.0);
        table.add(WorkerId(0), TaskId(0), 5.0);
        assert_eq!(table.get(WorkerId(0), TaskId(0)), 15.0);
        assert_eq!(table.get(WorkerId(1), TaskId(0)), 0.0);
    }
}
