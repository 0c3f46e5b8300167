use crate::TaskType;

/// Aggregate scheduling counters, incremented exactly once per `send_task`
/// call and reported at job end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub map_local: u64,
    pub map_remote: u64,
    pub map_spec_l: u64,
    pub map_spec_r: u64,
    pub reduce_normal: u64,
    pub reduce_spec: u64,
}

impl Stats {
    pub fn record(&mut self, task_type: TaskType) {
        match task_type {
            TaskType::Local => self.map_local += 1,
            TaskType::Remote => self.map_remote += 1,
            TaskType::LocalSpec => self.map_spec_l += 1,
            TaskType::RemoteSpec => self.map_spec_r += 1,
            TaskType::Normal => self.reduce_normal += 1,
            TaskType::Speculative => self.reduce_spec += 1,
            TaskType::NoTask => {}
        }
    }

    pub fn total_maps(&self) -> u64 {
        self.map_local + self.map_remote + self.map_spec_l + self.map_spec_r
    }

    pub fn total_non_local_maps(&self) -> u64 {
        self.map_remote + self.map_spec_r
    }

    pub fn total_speculative_maps(&self) -> u64 {
        self.map_spec_l + self.map_spec_r
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_routes_each_task_type() {
        let mut s = Stats::default();
        s.record(TaskType::Local);
        s.record(TaskType::Remote);
        s.record(TaskType::LocalSpec);
        s.record(TaskType::RemoteSpec);
        s.record(TaskType::Normal);
        s.record(TaskType::Speculative);
        s.record(TaskType::NoTask);

        assert_eq!(
            s,
            Stats {
                map_local: 1,
                map_remote: 1,
                map_spec_l: 1,
                map_spec_r: 1,
                reduce_normal: 1,
                reduce_spec: 1,
            }
        );
        assert_eq!(s.total_maps(), 4);
    }
}
