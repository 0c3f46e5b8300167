//! CLI driver for one simulation run: parses the platform/deploy/job input
//! triple, runs it to quiescence on the default callbacks, and prints a
//! JSON [`mrsim::Report`] on stdout.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use mrsim::{RunPaths, Simulation};

#[derive(Parser)]
#[command(name = "mrsim")]
#[command(about = "Discrete-event simulator for a MapReduce cluster")]
#[command(version)]
struct Cli {
    /// Platform topology file (hosts, links, bandwidth)
    #[arg(long, default_value = "platform.toml")]
    platform: PathBuf,

    /// Deployment file (which host runs the master, which run workers)
    #[arg(long, default_value = "deploy.toml")]
    deploy: PathBuf,

    /// Job properties file (chunk count, slots, reduces, ...)
    #[arg(long, default_value = "job.conf")]
    job_config: PathBuf,

    /// Per-task timing CSV written during the run
    #[arg(long, default_value = "tasks.csv")]
    tasks_log: PathBuf,

    /// Chunk placement log written before the run starts
    #[arg(long, default_value = "chunks.log")]
    chunks_log: PathBuf,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let paths = RunPaths {
        platform: cli.platform,
        deploy: cli.deploy,
        job_config: cli.job_config,
        tasks_log: cli.tasks_log,
        chunks_log: cli.chunks_log,
    };

    match Simulation::init().run(&paths) {
        Ok(report) => {
            match serde_json::to_string_pretty(&report) {
                Ok(json) => println!("{json}"),
                Err(e) => eprintln!("failed to serialize report: {e}"),
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("mrsim: {e}");
            ExitCode::FAILURE
        }
    }
}
