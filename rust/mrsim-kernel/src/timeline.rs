use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::task::Waker;

/// Opaque identifier for a scheduled wake entry, usable to cancel it before it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

struct Entry {
    time: f64,
    seq: u64,
    id: TimerId,
    waker: Waker,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time && self.seq == other.seq
    }
}
impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; reverse so the earliest time (and, on a
        // tie, the entry scheduled first) sorts to the top.
        other
            .time
            .partial_cmp(&self.time)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Min-heap of pending wake-ups, ordered by virtual time.
#[derive(Default)]
pub struct Timeline {
    heap: BinaryHeap<Entry>,
    next_seq: u64,
    cancelled: std::collections::HashSet<u64>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `waker` to fire at `time`. Returns an id that can be passed to
    /// [`Timeline::cancel`] to drop it before it fires.
    pub fn schedule(&mut self, time: f64, waker: Waker) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        let id = TimerId(seq);
        self.heap.push(Entry {
            time,
            seq,
            id,
            waker,
        });
        id
    }

    pub fn cancel(&mut self, id: TimerId) {
        self.cancelled.insert(id.0);
    }

    /// The smallest scheduled time still pending, if any.
    pub fn peek_time(&self) -> Option<f64> {
        self.heap.peek().map(|e| e.time)
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Pop every entry sharing the earliest time and wake it, returning that
    /// time. Entries cancelled since scheduling are dropped silently.
    pub fn advance(&mut self) -> Option<f64> {
        let time = self.peek_time()?;
        while let Some(top) = self.heap.peek() {
            if top.time != time {
                break;
            }
            let entry = self.heap.pop().unwrap();
            if self.cancelled.remove(&entry.id.0) {
                continue;
            }
            entry.waker.wake();
        }
        Some(time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::task::{Wake, Waker};

    struct NoopWake;
    impl Wake for NoopWake {
        fn wake(self: Arc<Self>) {}
    }

    fn noop_waker() -> Waker {
        Waker::from(Arc::new(NoopWake))
    }

    #[test]
    fn pops_earliest_time_first() {
        let mut t = Timeline::new();
        t.schedule(5.0, noop_waker());
        t.schedule(1.0, noop_waker());
        t.schedule(3.0, noop_waker());

        assert_eq!(t.advance(), Some(1.0));
        assert_eq!(t.advance(), Some(3.0));
        assert_eq!(t.advance(), Some(5.0));
        assert_eq!(t.advance(), None);
    }

    #[test]
    fn simultaneous_entries_fire_together() {
        let mut t = Timeline::new();
        t.schedule(2.0, noop_waker());
        t.schedule(2.0, noop_waker());
        t.schedule(4.0, noop_waker());

        assert_eq!(t.advance(), Some(2.0));
        assert_eq!(t.peek_time(), Some(4.0));
    }

    #[test]
    fn cancelled_entry_is_skipped() {
        let mut t = Timeline::new();
        let id = t.schedule(1.0, noop_waker());
        t.schedule(2.0, noop_waker());
        t.cancel(id);

        assert_eq!(t.advance(), Some(2.0));
    }
}
