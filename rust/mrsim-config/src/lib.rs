//! Typed configuration: the whitespace MR job-properties file, and this
//! crate's own `platform.toml`/`deploy.toml` pair standing in for SimGrid's
//! platform/deployment XML.

mod error;
mod job;
mod platform;
mod resolve;

pub use error::{ConfigError, ConfigResult};
pub use job::{finalize, parse_job_config, read_job_config_file, JobConfigRaw};
pub use platform::{
    read_deploy_toml, read_platform_toml, validate, DeployDescription, HostSpec, LinkSpec,
    PlatformDescription,
};
pub use resolve::{resolve, Deployment};
