use std::io::Write;
use std::path::Path;

use mrsim_types::{TaskId, WorkerId};

use crate::error::DfsResult;
use crate::matrix::ChunkOwnership;

/// Write the chunk-placement log: one line per worker listing which chunks
/// it owns (`1`/`0` per chunk column) and the owned count, matching the
/// original's `chunks.log` format.
pub fn write_chunks_log(path: impl AsRef<Path>, matrix: &ChunkOwnership) -> DfsResult<()> {
    let mut file = std::fs::File::create(path)?;
    for w in 0..matrix.workers() {
        let worker = WorkerId(w);
        write!(file, "worker {:06} | ", w)?;
        let mut owned = 0;
        for c in 0..matrix.chunks() {
            let bit = matrix.is_owner(TaskId(c), worker);
            write!(file, "{}", bit as u8)?;
            if bit {
                owned += 1;
            }
        }
        writeln!(file, " | chunks owned: {}", owned)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::{DefaultPlacement, DfsPlacement};

    #[test]
    fn writes_one_line_per_worker() {
        let matrix = DefaultPlacement.place(4, 2, 1);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chunks.log");
        write_chunks_log(&path, &matrix).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.lines().all(|l| l.starts_with("worker ")));
    }
}
