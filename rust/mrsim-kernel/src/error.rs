use thiserror::Error;

/// Kernel result type.
pub type KernelResult<T> = Result<T, KernelError>;

#[derive(Debug, Error)]
pub enum KernelError {
    #[error("simulation deadlocked: {0} task(s) pending, timeline empty")]
    Deadlock(usize),

    #[error("spawn failed: {0}")]
    SpawnFailed(String),
}
