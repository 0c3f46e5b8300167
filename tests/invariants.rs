//! Property-based checks of the quantified invariants that hold across any
//! well-formed job, run against varied worker/chunk/reduce counts.

use std::fs;
use std::path::Path;

use mrsim::{RunPaths, Simulation};
use proptest::prelude::*;

fn write_fixture(dir: &Path, workers: usize, chunks: usize, replicas: usize, reduces: usize) {
    let mut platform = String::from("default_bandwidth = 1.0e9\n\n[[host]]\nname = \"master\"\nspeed = 1.0e9\n\n");
    let mut worker_names = Vec::with_capacity(workers);
    for w in 0..workers {
        let name = format!("worker-{w}");
        platform.push_str(&format!("[[host]]\nname = \"{name}\"\nspeed = 1.0e9\n\n"));
        worker_names.push(name);
    }
    fs::write(dir.join("platform.toml"), platform).unwrap();

    let quoted = worker_names
        .iter()
        .map(|w| format!("\"{w}\""))
        .collect::<Vec<_>>()
        .join(", ");
    fs::write(
        dir.join("deploy.toml"),
        format!("master = \"master\"\nworkers = [{quoted}]\n"),
    )
    .unwrap();

    fs::write(
        dir.join("job.conf"),
        format!(
            "input_chunks {chunks}\n\
             dfs_replicas {replicas}\n\
             map_slots 2\n\
             reduce_slots 2\n\
             reduces {reduces}\n\
             chunk_size 1\n\
             map_output 100\n\
             map_cost 1\n\
             reduce_cost 1\n"
        ),
    )
    .unwrap();
}

fn run_paths(dir: &Path) -> RunPaths {
    RunPaths {
        platform: dir.join("platform.toml"),
        deploy: dir.join("deploy.toml"),
        job_config: dir.join("job.conf"),
        tasks_log: dir.join("tasks.csv"),
        chunks_log: dir.join("chunks.log"),
    }
}

proptest! {
    /// Invariant 5/8: for any worker/chunk/replica/reduce combination the
    /// simulator accepts, the run terminates and every map and reduce task
    /// is accounted for exactly once in the final tallies.
    #[test]
    fn every_job_terminates_with_every_task_accounted_for(
        workers in 1usize..5,
        chunks in 1usize..12,
        reduces in 1usize..4,
    ) {
        let replicas = workers.min(2);
        let dir = tempfile::tempdir().unwrap();
        write_fixture(dir.path(), workers, chunks, replicas, reduces);

        let report = Simulation::init().run(&run_paths(dir.path())).unwrap();

        let maps_accounted =
            report.map_local + report.map_remote + report.map_spec_l + report.map_spec_r;
        prop_assert!(maps_accounted >= chunks as u64);

        let reduces_accounted = report.reduce_normal + report.reduce_spec;
        prop_assert_eq!(reduces_accounted, reduces as u64);
    }
}
