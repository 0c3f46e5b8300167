//! Chunk-to-worker placement table: the default staggered-replica
//! distribution, a seeded random-owner lookup for remote fetches, and the
//! chunk-placement log writer.

mod error;
mod log;
mod matrix;
mod placement;

pub use error::{DfsError, DfsResult};
pub use log::write_chunks_log;
pub use matrix::ChunkOwnership;
pub use placement::{DefaultPlacement, DfsPlacement, ReplicaPicker};
