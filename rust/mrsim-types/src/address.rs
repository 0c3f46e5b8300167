use crate::{TaskHandle, WorkerId};

/// Typed mailbox address, replacing the original's `sprintf`-built mailbox
/// name strings (`"%zu:TT"`, `"%zu:DN"`, `"%zu:%d"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Address {
    Master,
    /// `<wid>:TT` — a worker's task-tracker (listen) mailbox.
    TaskTracker(WorkerId),
    /// `<wid>:DN` — a worker's data-node mailbox.
    DataNode(WorkerId),
    /// `<wid>:<pid>` in the original, where the pid distinguished one
    /// compute actor from any other running on the same worker. A bare
    /// sequence number isn't enough here, since two different tasks can
    /// independently land on copy slot 0 of their own task list; keying on
    /// the whole `TaskHandle` keeps every concurrently-running compute
    /// actor's reply mailbox unique.
    TaskReply(WorkerId, TaskHandle),
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Address::Master => write!(f, "MASTER"),
            Address::TaskTracker(w) => write!(f, "{}:TT", w.0),
            Address::DataNode(w) => write!(f, "{}:DN", w.0),
            Address::TaskReply(w, handle) => {
                write!(f, "{}:{}:{}:{}", w.0, handle.phase, handle.tid, handle.copy)
            }
        }
    }
}
