use thiserror::Error;

pub type SimResult<T> = Result<T, SimError>;

/// Top-level error for an embedded-API run, collecting every lower layer's
/// error type behind one `?`-friendly enum, mirroring the teacher's
/// per-crate `*Error` convention at the crate that sits above all the
/// others.
#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Config(#[from] mrsim_config::ConfigError),

    #[error(transparent)]
    Dfs(#[from] mrsim_dfs::DfsError),

    #[error(transparent)]
    Platform(#[from] mrsim_platform::PlatformError),

    #[error(transparent)]
    Master(#[from] mrsim_master::MasterError),

    #[error(transparent)]
    Worker(#[from] mrsim_worker::WorkerError),

    #[error(transparent)]
    Kernel(#[from] mrsim_kernel::KernelError),
}
