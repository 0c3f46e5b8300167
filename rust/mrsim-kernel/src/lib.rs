//! Single-threaded discrete-event executor.
//!
//! Simulated time does not track the wall clock: it only advances when every
//! spawned task has stalled waiting on a [`Sleep`], a [`Compute`], or a
//! [`Mailbox`] receive. The [`Kernel`] drives a [`futures::executor::LocalPool`]
//! between those stalls and a [`Timeline`] min-heap of pending wake times.

mod compute;
mod error;
mod executor;
mod mailbox;
mod sleep;
mod timeline;

pub use compute::{compute, Compute, ComputeHandle, ExecuteOutcome};
pub use error::KernelError;
pub use executor::{Kernel, KernelHandle};
pub use mailbox::{Mailbox, Recv};
pub use sleep::Sleep;
pub use timeline::{Timeline, TimerId};
