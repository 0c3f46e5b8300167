use std::path::Path;

use serde::Deserialize;

use crate::error::{ConfigError, ConfigResult};

#[derive(Debug, Clone, Deserialize)]
pub struct HostSpec {
    pub name: String,
    /// CPU speed in flops/second.
    pub speed: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LinkSpec {
    pub between: [String; 2],
    /// Bandwidth in bytes/second.
    pub bandwidth: f64,
}

/// This crate's own equivalent of SimGrid's platform XML: a list of hosts
/// and network links, plus a fallback bandwidth for any host pair without an
/// explicit link.
#[derive(Debug, Clone, Deserialize)]
pub struct PlatformDescription {
    pub host: Vec<HostSpec>,
    #[serde(default)]
    pub link: Vec<LinkSpec>,
    pub default_bandwidth: f64,
}

/// This crate's own equivalent of SimGrid's deployment XML: which host runs
/// the master, and which hosts run workers.
#[derive(Debug, Clone, Deserialize)]
pub struct DeployDescription {
    pub master: String,
    pub workers: Vec<String>,
}

pub fn read_platform_toml(path: impl AsRef<Path>) -> ConfigResult<PlatformDescription> {
    let path_ref = path.as_ref();
    let text = std::fs::read_to_string(path_ref).map_err(|source| ConfigError::Io {
        path: path_ref.display().to_string(),
        source,
    })?;
    Ok(toml::from_str(&text)?)
}

pub fn read_deploy_toml(path: impl AsRef<Path>) -> ConfigResult<DeployDescription> {
    let path_ref = path.as_ref();
    let text = std::fs::read_to_string(path_ref).map_err(|source| ConfigError::Io {
        path: path_ref.display().to_string(),
        source,
    })?;
    Ok(toml::from_str(&text)?)
}

/// Validate a deployment against a platform: every named host must exist,
/// the master must not also be listed as a worker, and at least one worker
/// must be named.
pub fn validate(platform: &PlatformDescription, deploy: &DeployDescription) -> ConfigResult<()> {
    let known: std::collections::HashSet<&str> =
        platform.host.iter().map(|h| h.name.as_str()).collect();

    if !known.contains(deploy.master.as_str()) {
        return Err(ConfigError::DanglingHost(deploy.master.clone()));
    }
    if deploy.workers.is_empty() {
        return Err(ConfigError::NoWorkers);
    }
    for w in &deploy.workers {
        if !known.contains(w.as_str()) {
            return Err(ConfigError::DanglingHost(w.clone()));
        }
        if w == &deploy.master {
            return Err(ConfigError::MasterIsWorker(w.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_platform() -> PlatformDescription {
        toml::from_str(
            r#"
            default_bandwidth = 1000000.0

            [[host]]
            name = "master-host"
            speed = 1e9

            [[host]]
            name = "worker-0"
            speed = 1e9

            [[host]]
            name = "worker-1"
            speed = 5e8

            [[link]]
            between = ["worker-0", "worker-1"]
            bandwidth = 2000000.0
            "#,
        )
        .unwrap()
    }

    #[test]
    fn parses_hosts_and_links() {
        let plat = sample_platform();
        assert_eq!(plat.host.len(), 3);
        assert_eq!(plat.link.len(), 1);
        assert_eq!(plat.default_bandwidth, 1_000_000.0);
    }

    #[test]
    fn validate_rejects_dangling_host() {
        let plat = sample_platform();
        let deploy = DeployDescription {
            master: "master-host".into(),
            workers: vec!["worker-0".into(), "ghost".into()],
        };
        assert!(matches!(
            validate(&plat, &deploy),
            Err(ConfigError::DanglingHost(h)) if h == "ghost"
        ));
    }

    #[test]
    fn validate_rejects_master_listed_as_worker() {
        let plat = sample_platform();
        let deploy = DeployDescription {
            master: "master-host".into(),
            workers: vec!["master-host".into()],
        };
        assert!(matches!(
            validate(&plat, &deploy),
            Err(ConfigError::MasterIsWorker(_))
        ));
    }

    #[test]
    fn validate_accepts_well_formed_deployment() {
        let plat = sample_platform();
        let deploy = DeployDescription {
            master: "master-host".into(),
            workers: vec!["worker-0".into(), "worker-1".into()],
        };
        assert!(validate(&plat, &deploy).is_ok());
    }
}
