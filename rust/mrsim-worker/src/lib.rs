//! The worker process: a heartbeat loop, a task-tracker that spawns one
//! compute actor per assigned task, and a data-node that serves chunks and
//! shuffled intermediate pairs to peers.

mod compute;
mod context;
mod data_node;
mod error;
mod heartbeat;
mod listen;
mod worker;

pub use context::WorkerContext;
pub use error::{WorkerError, WorkerResult};
pub use worker::spawn;
