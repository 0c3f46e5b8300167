use thiserror::Error;

pub type PlatformResult<T> = Result<T, PlatformError>;

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("spawn failed: {0}")]
    SpawnFailed(#[from] mrsim_kernel::KernelError),
}
