use mrsim_types::{Phase, TaskId, TaskStatus, TaskType, WorkerId, REDUCE_BACKPRESSURE_THRESHOLD};

use crate::view::SchedulerView;

/// Classify a (phase, task, candidate worker) triple, the derived label the
/// scheduler ranks candidates by.
pub fn get_task_type(
    view: &impl SchedulerView,
    phase: Phase,
    tid: TaskId,
    wid: WorkerId,
) -> TaskType {
    let status = view.task_status(phase, tid);
    match phase {
        Phase::Map => match status {
            TaskStatus::Pending => {
                if view.is_chunk_owner(tid, wid) {
                    TaskType::Local
                } else {
                    TaskType::Remote
                }
            }
            TaskStatus::TipSlow => {
                if view.is_chunk_owner(tid, wid) {
                    TaskType::LocalSpec
                } else {
                    TaskType::RemoteSpec
                }
            }
            _ => TaskType::NoTask,
        },
        Phase::Reduce => match status {
            TaskStatus::Pending => TaskType::Normal,
            TaskStatus::TipSlow => TaskType::Speculative,
            _ => TaskType::NoTask,
        },
    }
}

/// Pick the next map task for `wid`, or `None` if no map task should be
/// assigned this heartbeat. First `LOCAL` candidate wins immediately;
/// otherwise tracks the best classification seen so far, where a `REMOTE`
/// candidate always qualifies and a strictly-better-than-current-best
/// speculative candidate additionally requires fewer than two live copies.
pub fn choose_map_task(view: &impl SchedulerView, wid: WorkerId) -> Option<TaskId> {
    if view.tasks_pending(Phase::Map) == 0 {
        return None;
    }

    let mut best: Option<(TaskType, TaskId)> = None;

    for c in 0..view.number_of_maps() {
        let chunk = TaskId(c);
        let task_type = get_task_type(view, Phase::Map, chunk, wid);

        if task_type == TaskType::Local {
            return Some(chunk);
        }

        if task_type == TaskType::Remote {
            // Unconditional: REMOTE never needs the speculative-copy guard,
            // and later REMOTE chunks take priority over earlier ones, since
            // the original applies this branch on every iteration without a
            // "strictly better" check.
            best = Some((task_type, chunk));
            continue;
        }

        let better_than_best = best.map(|(bt, _)| task_type < bt).unwrap_or(true);
        if better_than_best && view.task_instances(Phase::Map, chunk) < 2 {
            best = Some((task_type, chunk));
        }
    }

    best.map(|(_, tid)| tid)
}

/// Pick the next reduce task for `wid`. Held back entirely while the map
/// phase is not yet ~90% complete (so the shuffle has intermediate data to
/// fetch). First `NORMAL` candidate wins immediately; a `SPECULATIVE`
/// candidate updates the running best only while it has fewer than two live
/// copies.
pub fn choose_reduce_task(view: &impl SchedulerView, wid: WorkerId) -> Option<TaskId> {
    if view.tasks_pending(Phase::Reduce) == 0 {
        return None;
    }

    let maps_pending_fraction =
        view.tasks_pending(Phase::Map) as f64 / view.number_of_maps() as f64;
    if maps_pending_fraction > REDUCE_BACKPRESSURE_THRESHOLD {
        return None;
    }

    let mut best: Option<(TaskType, TaskId)> = None;

    for t in 0..view.number_of_reduces() {
        let tid = TaskId(t);
        let task_type = get_task_type(view, Phase::Reduce, tid, wid);

        if task_type == TaskType::Normal {
            return Some(tid);
        }

        let better_than_best = best.map(|(bt, _)| task_type < bt).unwrap_or(true);
        if better_than_best && view.task_instances(Phase::Reduce, tid) < 2 {
            best = Some((task_type, tid));
        }
    }

    best.map(|(_, tid)| tid)
}

/// Default scheduling policy dispatcher, equivalent to the original's
/// `default_scheduler_f`.
pub fn default_scheduler_f(
    view: &impl SchedulerView,
    phase: Phase,
    wid: WorkerId,
) -> Option<TaskId> {
    match phase {
        Phase::Map => choose_map_task(view, wid),
        Phase::Reduce => choose_reduce_task(view, wid),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    struct FakeView {
        status: RefCell<HashMap<(Phase, usize), TaskStatus>>,
        instances: RefCell<HashMap<(Phase, usize), usize>>,
        owners: HashMap<usize, Vec<usize>>,
        pending: RefCell<[usize; 2]>,
        number_of_maps: usize,
        number_of_reduces: usize,
    }

    impl FakeView {
        fn new(number_of_maps: usize, number_of_reduces: usize) -> Self {
            Self {
                status: RefCell::new(HashMap::new()),
                instances: RefCell::new(HashMap::new()),
                owners: HashMap::new(),
                pending: RefCell::new([number_of_maps, number_of_reduces]),
                number_of_maps,
                number_of_reduces,
            }
        }

        fn own(mut self, chunk: usize, workers: Vec<usize>) -> Self {
            self.owners.insert(chunk, workers);
            self
        }

        fn phase_idx(phase: Phase) -> usize {
            match phase {
                Phase::Map => 0,
                Phase::Reduce => 1,
            }
        }
    }

    impl SchedulerView for FakeView {
        fn task_status(&self, phase: Phase, tid: TaskId) -> TaskStatus {
            *self
                .status
                .borrow()
                .get(&(phase, tid.0))
                .unwrap_or(&TaskStatus::Pending)
        }
        fn task_instances(&self, phase: Phase, tid: TaskId) -> usize {
            *self.instances.borrow().get(&(phase, tid.0)).unwrap_or(&0)
        }
        fn is_chunk_owner(&self, chunk: TaskId, worker: WorkerId) -> bool {
            self.owners
                .get(&chunk.0)
                .map(|ws| ws.contains(&worker.0))
                .unwrap_or(false)
        }
        fn tasks_pending(&self, phase: Phase) -> usize {
            self.pending.borrow()[Self::phase_idx(phase)]
        }
        fn number_of_maps(&self) -> usize {
            self.number_of_maps
        }
        fn number_of_reduces(&self) -> usize {
            self.number_of_reduces
        }
    }

    #[test]
    fn picks_local_chunk_first() {
        let view = FakeView::new(2, 1).own(0, vec![1]).own(1, vec![0]);
        assert_eq!(
            choose_map_task(&view, WorkerId(0)),
            Some(TaskId(1)),
            "worker 0 owns chunk 1, should get it as LOCAL"
        );
    }

    #[test]
    fn falls_back_to_remote_when_nothing_local() {
        let view = FakeView::new(1, 0).own(0, vec![1]);
        assert_eq!(choose_map_task(&view, WorkerId(0)), Some(TaskId(0)));
    }

    #[test]
    fn no_map_tasks_pending_returns_none() {
        let mut view = FakeView::new(1, 0);
        view.pending = RefCell::new([0, 0]);
        assert_eq!(choose_map_task(&view, WorkerId(0)), None);
    }

    #[test]
    fn reduce_held_back_while_maps_mostly_pending() {
        let view = FakeView::new(100, 1);
        assert_eq!(choose_reduce_task(&view, WorkerId(0)), None);
    }

    #[test]
    fn reduce_assigned_once_maps_mostly_done() {
        let view = FakeView::new(100, 1);
        *view.pending.borrow_mut() = [90, 1];
        assert_eq!(choose_reduce_task(&view, WorkerId(0)), Some(TaskId(0)));
    }

    #[test]
    fn task_type_ordering_prefers_local_over_remote_over_speculative() {
        assert!(TaskType::Local < TaskType::Remote);
        assert!(TaskType::Remote < TaskType::LocalSpec);
        assert!(TaskType::LocalSpec < TaskType::RemoteSpec);
        assert!(TaskType::RemoteSpec < TaskType::NoTask);
        assert!(TaskType::Normal < TaskType::Speculative);
        assert!(TaskType::Speculative < TaskType::NoTask);
    }
}
