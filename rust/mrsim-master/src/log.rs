use std::cell::RefCell;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use mrsim_types::{Phase, TaskHandle, WorkerId};

use crate::error::MasterResult;

/// Writer for the per-task timing CSV, matching the original's
/// `tasks.csv` columns exactly. `task_id` is the composite
/// `<phase>_<tid>_<copy>` key the original source writes, not a bare task
/// id, since a speculative task has more than one row sharing a `tid`.
pub struct TaskLog {
    file: RefCell<File>,
}

fn phase_ordinal(phase: Phase) -> u8 {
    match phase {
        Phase::Map => 0,
        Phase::Reduce => 1,
    }
}

impl TaskLog {
    pub fn create(path: impl AsRef<Path>) -> MasterResult<Self> {
        let mut file = File::create(path)?;
        writeln!(file, "task_id,phase,worker_id,time,action,shuffle_end")?;
        Ok(Self { file: RefCell::new(file) })
    }

    pub fn start(&self, handle: TaskHandle, wid: WorkerId, time: f64) {
        let _ = writeln!(
            self.file.borrow_mut(),
            "{}_{}_{},{},{},{:.3},START,",
            phase_ordinal(handle.phase),
            handle.tid,
            handle.copy,
            handle.phase,
            wid.0,
            time,
        );
    }

    /// Logs one END row per cleared copy of a finished task. The original
    /// reuses the *completing* task's `wid` and `shuffle_end` for every
    /// sibling's row rather than each sibling's own fields — reproduced
    /// here as-is since it is the source's actual, observable behavior.
    pub fn end(&self, handle: TaskHandle, winner_wid: WorkerId, time: f64, shuffle_end: f64) {
        let _ = writeln!(
            self.file.borrow_mut(),
            "{}_{}_{},{},{},{:.3},END,{:.3}",
            phase_ordinal(handle.phase),
            handle.tid,
            handle.copy,
            handle.phase,
            winner_wid.0,
            time,
            shuffle_end,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mrsim_types::{Phase, TaskId};
    use std::fs;

    #[test]
    fn writes_header_and_rows_in_the_original_column_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.csv");
        let log = TaskLog::create(&path).unwrap();

        let handle = TaskHandle { phase: Phase::Map, tid: TaskId(3), copy: 0 };
        log.start(handle, WorkerId(1), 0.0);
        log.end(handle, WorkerId(1), 12.5, 0.0);

        let contents = fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(lines.next().unwrap(), "task_id,phase,worker_id,time,action,shuffle_end");
        assert_eq!(lines.next().unwrap(), "0_3_0,MAP,1,0.000,START,");
        assert_eq!(lines.next().unwrap(), "0_3_0,MAP,1,12.500,END,0.000");
    }

    #[test]
    fn sibling_end_rows_reuse_the_winners_worker_and_shuffle_end() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.csv");
        let log = TaskLog::create(&path).unwrap();

        let loser = TaskHandle { phase: Phase::Reduce, tid: TaskId(0), copy: 1 };
        // a cancelled sibling's END row still carries the winner's fields.
        log.end(loser, WorkerId(7), 9.0, 3.0);

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().nth(1).unwrap(), "1_0_1,REDUCE,7,9.000,END,3.000");
    }
}
