use thiserror::Error;

pub type WorkerResult<T> = Result<T, WorkerError>;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("worker actor failed to spawn: {0}")]
    Spawn(#[from] mrsim_platform::PlatformError),
}
