use mrsim_types::{TaskId, WorkerId};

/// Chunk-to-worker ownership bitmap, `owns[chunk][worker]`.
#[derive(Debug, Clone)]
pub struct ChunkOwnership {
    chunks: usize,
    workers: usize,
    owns: Vec<bool>,
}

impl ChunkOwnership {
    pub fn new(chunks: usize, workers: usize) -> Self {
        Self {
            chunks,
            workers,
            owns: vec![false; chunks * workers],
        }
    }

    fn index(&self, chunk: TaskId, worker: WorkerId) -> usize {
        chunk.0 * self.workers + worker.0
    }

    pub fn chunks(&self) -> usize {
        self.chunks
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn is_owner(&self, chunk: TaskId, worker: WorkerId) -> bool {
        self.owns[self.index(chunk, worker)]
    }

    pub fn set_owner(&mut self, chunk: TaskId, worker: WorkerId) {
        let idx = self.index(chunk, worker);
        self.owns[idx] = true;
    }

    /// Workers owning `chunk`, in ascending worker-id order.
    pub fn owners(&self, chunk: TaskId) -> impl Iterator<Item = WorkerId> + '_ {
        (0..self.workers)
            .map(WorkerId)
            .filter(move |&w| self.is_owner(chunk, w))
    }

    pub fn owner_count(&self, chunk: TaskId) -> usize {
        self.owners(chunk).count()
    }
}
