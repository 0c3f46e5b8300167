use crate::{Address, TaskHandle, TaskId, TaskInfo, WorkerId};

/// A mailbox message. `name` mirrors the original short message constants
/// (`SMS-HB`, `SMS-T`, ...) purely for log/CSV fidelity; dispatch is done by
/// matching on the enum variant itself, never by string comparison.
#[derive(Debug, Clone)]
pub enum Message {
    /// `SMS-HB`: worker -> master, zero size. Carries the sender's id since
    /// the master's typed mailbox has no process-introspection equivalent of
    /// `MSG_task_get_source`.
    Heartbeat(WorkerId),
    /// `SMS-T`: master -> worker task-tracker. `TaskHandle` is the slot the
    /// master filed this attempt under in its own task list; the worker's
    /// compute actor reuses its `copy` index to address its private reply
    /// mailbox, so the master can reach that exact attempt later without an
    /// extra round trip.
    Task(TaskInfo, TaskHandle),
    /// `SMS-TD`: worker -> master, payload = completed task plus the handle
    /// it was dispatched under.
    TaskDone(TaskInfo, TaskHandle),
    /// Master -> worker compute actor: cancel this attempt's in-flight
    /// execution. The original mutates a `msg_task_t` shared by pointer
    /// (`MSG_task_cancel`); since every actor here only ever talks over
    /// typed mailboxes, cancellation is just another message raced against
    /// the compute future.
    CancelTask,
    /// `SMS-GC`: worker -> peer data-node, requesting its chunk; carries the
    /// address the reply should be delivered to.
    GetChunk { reply_to: Address },
    /// `SMS-GIP`: worker -> peer data-node, requesting intermediate pairs
    /// produced for reducer `rid`. `already_copied` is how much of that
    /// map's output the requester has already pulled from this data-node,
    /// so the reply carries only the delta rather than the whole row.
    GetInterPairs {
        rid: TaskId,
        already_copied: f64,
        reply_to: Address,
    },
    /// `DATA-C`/`DATA-IP`: data-node -> requester, payload = transfer size.
    Data(f64),
    /// `SMS-F`: shutdown signal to a worker's own child actors.
    Finish,
}

impl Message {
    /// The original's short message name, kept for the CSV/trace log.
    pub fn name(&self) -> &'static str {
        match self {
            Message::Heartbeat(_) => "SMS-HB",
            Message::Task(..) => "SMS-T",
            Message::TaskDone(..) => "SMS-TD",
            Message::CancelTask => "SMS-CT",
            Message::GetChunk { .. } => "SMS-GC",
            Message::GetInterPairs { .. } => "SMS-GIP",
            Message::Data(_) => "DATA",
            Message::Finish => "SMS-F",
        }
    }
}
