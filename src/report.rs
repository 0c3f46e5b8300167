use serde::Serialize;

use mrsim_types::{Config, Stats};

/// The machine-readable summary printed by the CLI binary, supplementing the
/// `tracing::info!` report every run also emits (§6 Output artifacts).
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub number_of_workers: usize,
    pub number_of_maps: usize,
    pub number_of_reduces: usize,
    pub map_local: u64,
    pub map_remote: u64,
    pub map_spec_l: u64,
    pub map_spec_r: u64,
    pub reduce_normal: u64,
    pub reduce_spec: u64,
    pub elapsed_virtual_seconds: f64,
}

impl Report {
    pub(crate) fn new(config: &Config, stats: Stats, elapsed_virtual_seconds: f64) -> Self {
        Self {
            number_of_workers: config.number_of_workers,
            number_of_maps: config.number_of_maps,
            number_of_reduces: config.number_of_reduces,
            map_local: stats.map_local,
            map_remote: stats.map_remote,
            map_spec_l: stats.map_spec_l,
            map_spec_r: stats.map_spec_r,
            reduce_normal: stats.reduce_normal,
            reduce_spec: stats.reduce_spec,
            elapsed_virtual_seconds,
        }
    }
}
