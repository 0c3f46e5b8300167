use mrsim_types::{TaskId, WorkerId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{DfsError, DfsResult};
use crate::matrix::ChunkOwnership;

/// A pluggable placement algorithm: fills `owns[chunk][worker]` for a freshly
/// allocated [`ChunkOwnership`]. The core never mutates the matrix again
/// after this runs.
pub trait DfsPlacement {
    fn place(&self, chunks: usize, workers: usize, replicas: usize) -> ChunkOwnership;
}

/// Deterministic staggered-replica placement:
/// `owner = (c mod workers + (workers div replicas) * r) mod workers` for
/// each replica index `r`. When `replicas >= workers`, every worker owns
/// every chunk.
pub struct DefaultPlacement;

impl DfsPlacement for DefaultPlacement {
    fn place(&self, chunks: usize, workers: usize, replicas: usize) -> ChunkOwnership {
        let mut matrix = ChunkOwnership::new(chunks, workers);

        if replicas >= workers {
            for c in 0..chunks {
                for w in 0..workers {
                    matrix.set_owner(TaskId(c), WorkerId(w));
                }
            }
            return matrix;
        }

        for c in 0..chunks {
            for r in 0..replicas {
                let owner = (c % workers + (workers / replicas) * r) % workers;
                matrix.set_owner(TaskId(c), WorkerId(owner));
            }
        }

        matrix
    }
}

/// Seeded lookup for "a random DataNode that owns chunk C", mirroring the
/// original's `rand() % chunk_replicas` followed by a forward scan that
/// returns the `(r+1)`-th owner encountered in ascending worker-id order.
pub struct ReplicaPicker {
    rng: StdRng,
    replicas: usize,
}

impl ReplicaPicker {
    pub fn new(seed: u64, replicas: usize) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            replicas: replicas.max(1),
        }
    }

    pub fn find_random_chunk_owner(
        &mut self,
        matrix: &ChunkOwnership,
        chunk: TaskId,
    ) -> DfsResult<WorkerId> {
        let mut remaining = self.rng.gen_range(0..self.replicas);
        for owner in matrix.owners(chunk) {
            if remaining == 0 {
                return Ok(owner);
            }
            remaining -= 1;
        }
        Err(DfsError::ChunkMissing(chunk))
    }
}
