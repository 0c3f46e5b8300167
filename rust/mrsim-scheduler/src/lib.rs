//! Default task-selection policy: locality-first map assignment with
//! speculative backfill, and backpressure-gated reduce assignment.

mod policy;
mod view;

pub use policy::{choose_map_task, choose_reduce_task, default_scheduler_f, get_task_type};
pub use view::SchedulerView;
