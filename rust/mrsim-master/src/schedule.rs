use mrsim_types::{
    Phase, TaskCostFn, TaskHandle, TaskId, TaskInfo, TaskStatus, TaskType, WorkerId,
    STRAGGLER_THRESHOLD_SECS,
};

use crate::state::{MasterState, TaskSlot};

impl MasterState {
    /// A worker is a straggler when its host runs below the grid average
    /// speed while it currently has at least one task occupying a slot.
    pub fn is_straggler(&self, wid: WorkerId, host_speed: f64) -> bool {
        let capacity = self.config().map_slots + self.config().reduce_slots;
        let available =
            self.slots_available(Phase::Map, wid) + self.slots_available(Phase::Reduce, wid);
        let running = capacity.saturating_sub(available);
        host_speed < self.config().grid_average_speed && running > 0
    }

    /// Marks every primary-copy task assigned to `wid` whose elapsed time
    /// exceeds the straggler threshold as `TipSlow`, so the next heartbeat
    /// from a different worker can pick it up for speculation. Only the
    /// primary copy (`task_list[phase][tid][0]`) is inspected, matching the
    /// original; `JobStatusTable::set` already refuses to move a `Done` task
    /// back to `TipSlow`.
    pub fn mark_slow_tasks(&self, wid: WorkerId, now: f64) {
        for phase in [Phase::Map, Phase::Reduce] {
            let capacity = match phase {
                Phase::Map => self.config().map_slots,
                Phase::Reduce => self.config().reduce_slots,
            };
            if self.slots_available(phase, wid) >= capacity {
                continue;
            }

            let count = match phase {
                Phase::Map => self.config().number_of_maps,
                Phase::Reduce => self.config().number_of_reduces,
            };
            let slow: Vec<TaskId> = self.task_list(phase).borrow()[..count]
                .iter()
                .enumerate()
                .filter_map(|(tid, row)| {
                    let primary = row[0]?;
                    let slow = primary.wid == wid && now - primary.assigned_at > STRAGGLER_THRESHOLD_SECS;
                    slow.then_some(TaskId(tid))
                })
                .collect();

            for tid in slow {
                self.status().set(phase, tid, TaskStatus::TipSlow);
            }
        }
    }

    /// Default locality-first tid selection for `phase`/`wid`, the policy
    /// used when the embedded API caller hasn't overridden it via
    /// `set_scheduler_f`.
    pub fn default_tid(&self, phase: Phase, wid: WorkerId) -> Option<TaskId> {
        match phase {
            Phase::Map => mrsim_scheduler::choose_map_task(self, wid),
            Phase::Reduce => mrsim_scheduler::choose_reduce_task(self, wid),
        }
    }

    /// Resolves `tid`'s data source, books the slot and live-copy
    /// accounting, and returns the descriptor to send. `tid` may come from
    /// [`MasterState::default_tid`] or a caller-supplied override; either
    /// way its classification (and therefore source and stats bucket) is
    /// derived fresh from current job state here, exactly as the original's
    /// `send_scheduler_task` re-derives `task_type` after calling
    /// `user.scheduler_f`.
    pub fn assign(
        &self,
        phase: Phase,
        tid: TaskId,
        wid: WorkerId,
        task_cost_f: &TaskCostFn,
        now: f64,
    ) -> Option<(TaskHandle, TaskInfo, TaskType)> {
        let task_type = mrsim_scheduler::get_task_type(self, phase, tid, wid);
        let src = match task_type {
            TaskType::Local | TaskType::LocalSpec => wid,
            TaskType::Remote | TaskType::RemoteSpec => self
                .replica_picker()
                .borrow_mut()
                .find_random_chunk_owner(self.chunk_owners(), tid)
                .ok()?,
            TaskType::Normal | TaskType::Speculative | TaskType::NoTask => wid,
        };

        let cpu_required = task_cost_f(phase, tid, wid);

        if self.status().get(phase, tid) != TaskStatus::TipSlow {
            self.status().set(phase, tid, TaskStatus::Tip);
        }
        self.slots().acquire(phase, wid);

        let copy = {
            let mut list = self.task_list(phase).borrow_mut();
            let row = &mut list[tid.0];
            let idx = row.iter().position(|s| s.is_none())?;
            row[idx] = Some(TaskSlot { wid, assigned_at: now });
            idx
        };

        self.bump_instances(phase, tid);
        self.record_stat(task_type);

        let handle = TaskHandle { phase, tid, copy };
        let info = TaskInfo::new(phase, tid, src, wid, cpu_required);
        Some((handle, info, task_type))
    }

    /// Clears every live copy of `(phase, tid)` and returns `(copy_slot,
    /// worker)` for each, so the caller can cancel the corresponding reply
    /// mailboxes. Safe to call on the winning copy too: its compute actor
    /// has already finished and exited, so a stray cancel message left in
    /// its (never-reused) reply mailbox is simply never read.
    pub fn finish_all_task_copies(&self, phase: Phase, tid: TaskId) -> Vec<(usize, WorkerId)> {
        let mut list = self.task_list(phase).borrow_mut();
        let row = &mut list[tid.0];
        row.iter_mut()
            .enumerate()
            .filter_map(|(copy, slot)| slot.take().map(|s| (copy, s.wid)))
            .collect()
    }
}
