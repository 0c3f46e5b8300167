use thiserror::Error;

pub type MasterResult<T> = Result<T, MasterError>;

#[derive(Debug, Error)]
pub enum MasterError {
    #[error("chunk placement error: {0}")]
    Placement(#[from] mrsim_dfs::DfsError),

    #[error("master actor failed to spawn: {0}")]
    Spawn(#[from] mrsim_platform::PlatformError),

    #[error("failed to write task log: {0}")]
    Log(#[from] std::io::Error),
}
