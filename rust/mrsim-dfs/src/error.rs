use thiserror::Error;
use mrsim_types::TaskId;

pub type DfsResult<T> = Result<T, DfsError>;

#[derive(Debug, Error)]
pub enum DfsError {
    #[error("chunk {0} is missing: no worker owns it")]
    ChunkMissing(TaskId),

    #[error("failed to write chunk placement log: {0}")]
    Log(#[from] std::io::Error),
}
