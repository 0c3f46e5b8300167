/// Zero-based host identifier (a platform host, not a worker — the
/// deployment maps workers onto hosts one-to-one in this crate, but the
/// types stay distinct since `mrsim-types::WorkerId` is a job-level concept).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HostId(pub usize);

/// A platform host: a name and a CPU speed in flops/second.
#[derive(Debug, Clone, PartialEq)]
pub struct Host {
    pub id: HostId,
    pub name: String,
    pub speed: f64,
}
