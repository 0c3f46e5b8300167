use std::path::Path;

use mrsim_types::Config;

use crate::error::{ConfigError, ConfigResult};

/// Raw job properties as read from the whitespace `<key> <value>` config
/// file, before the platform's worker count and grid power are known.
#[derive(Debug, Clone, PartialEq)]
pub struct JobConfigRaw {
    pub chunk_size_mb: f64,
    pub input_chunks: usize,
    pub dfs_replicas: usize,
    pub map_slots: usize,
    pub reduce_slots: usize,
    pub reduces: usize,
    /// Percent of total input size that becomes intermediate data.
    pub map_output_percent: f64,
    /// Flops per input byte for a map task.
    pub map_cost: f64,
    /// Flops per shuffled byte for a reduce task.
    pub reduce_cost: f64,
}

impl Default for JobConfigRaw {
    fn default() -> Self {
        Self {
            chunk_size_mb: 0.0,
            input_chunks: 0,
            dfs_replicas: 1,
            map_slots: 1,
            reduce_slots: 1,
            reduces: 0,
            map_output_percent: 100.0,
            map_cost: 1.0,
            reduce_cost: 1.0,
        }
    }
}

/// Parse the MR job properties file: whitespace-separated `<key> <value>`
/// pairs, one or more per line, matching the original MRSG format.
pub fn read_job_config_file(path: impl AsRef<Path>) -> ConfigResult<JobConfigRaw> {
    let path_ref = path.as_ref();
    let text = std::fs::read_to_string(path_ref).map_err(|source| ConfigError::Io {
        path: path_ref.display().to_string(),
        source,
    })?;
    parse_job_config(&text, &path_ref.display().to_string())
}

pub fn parse_job_config(text: &str, source_name: &str) -> ConfigResult<JobConfigRaw> {
    let mut cfg = JobConfigRaw::default();
    let mut tokens = text.split_whitespace();

    while let Some(property) = tokens.next() {
        let value = tokens
            .next()
            .ok_or_else(|| ConfigError::InvalidValue(property.to_string(), "missing value".into()))?;

        let parse_f64 = |v: &str| -> ConfigResult<f64> {
            v.parse()
                .map_err(|_| ConfigError::InvalidValue(property.to_string(), v.to_string()))
        };
        let parse_usize = |v: &str| -> ConfigResult<usize> {
            v.parse()
                .map_err(|_| ConfigError::InvalidValue(property.to_string(), v.to_string()))
        };

        match property {
            "reduces" => cfg.reduces = parse_usize(value)?,
            "chunk_size" => cfg.chunk_size_mb = parse_f64(value)?,
            "input_chunks" => cfg.input_chunks = parse_usize(value)?,
            "dfs_replicas" => cfg.dfs_replicas = parse_usize(value)?,
            "map_output" => cfg.map_output_percent = parse_f64(value)?,
            "map_cost" => cfg.map_cost = parse_f64(value)?,
            "reduce_cost" => cfg.reduce_cost = parse_f64(value)?,
            "map_slots" => cfg.map_slots = parse_usize(value)?,
            "reduce_slots" => cfg.reduce_slots = parse_usize(value)?,
            other => return Err(ConfigError::UnknownProperty(other.to_string(), source_name.to_string())),
        }
    }

    Ok(cfg)
}

/// Combine the raw job properties with the resolved platform (worker count
/// and aggregate CPU power) into the immutable [`Config`] the simulation
/// runs against.
pub fn finalize(raw: &JobConfigRaw, number_of_workers: usize, grid_cpu_power: f64) -> Config {
    let chunk_size = raw.chunk_size_mb * 1024.0 * 1024.0;
    let map_output_size = (raw.map_output_percent / 100.0) * raw.input_chunks as f64 * chunk_size;
    let grid_average_speed = grid_cpu_power / number_of_workers as f64;

    Config {
        chunk_size,
        chunk_count: raw.input_chunks,
        chunk_replicas: raw.dfs_replicas,
        map_slots: raw.map_slots,
        reduce_slots: raw.reduce_slots,
        number_of_reduces: raw.reduces,
        number_of_maps: raw.input_chunks,
        heartbeat_interval: Config::heartbeat_interval_for(number_of_workers),
        grid_cpu_power,
        grid_average_speed,
        number_of_workers,
        cpu_required_map: raw.map_cost * chunk_size,
        cpu_required_reduce: raw.reduce_cost * (map_output_size / raw.reduces.max(1) as f64),
        map_output_size,
    }
}
