/// Immutable job configuration, finalized once at startup from the job
/// config file plus the resolved platform (worker count, grid CPU power).
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub chunk_size: f64,
    pub chunk_count: usize,
    pub chunk_replicas: usize,
    pub map_slots: usize,
    pub reduce_slots: usize,
    pub number_of_reduces: usize,
    pub number_of_maps: usize,
    pub heartbeat_interval: f64,
    pub grid_cpu_power: f64,
    pub grid_average_speed: f64,
    pub number_of_workers: usize,
    pub cpu_required_map: f64,
    pub cpu_required_reduce: f64,
    pub map_output_size: f64,
}

impl Config {
    /// `heartbeat_interval = max(3, number_of_workers / 100)`, per the
    /// original's `maxval (3, config.number_of_workers / 100)`.
    pub fn heartbeat_interval_for(number_of_workers: usize) -> f64 {
        (number_of_workers / 100).max(3) as f64
    }
}
