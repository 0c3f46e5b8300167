use std::collections::HashMap;

use mrsim_kernel::KernelHandle;
use mrsim_platform::{Host, HostId, NetworkTopology, Platform};
use mrsim_types::WorkerId;

use crate::error::ConfigResult;
use crate::platform::{validate, DeployDescription, PlatformDescription};

/// A resolved deployment: the `Platform` adapter plus the host each worker
/// process runs on, in worker-id order, and the master's host.
pub struct Deployment {
    pub platform: Platform,
    pub master_host: HostId,
    pub worker_hosts: Vec<HostId>,
}

/// Build a [`Deployment`] from a parsed platform/deploy pair, after
/// validating that every referenced host exists and the master is not also
/// listed as a worker.
pub fn resolve(
    kernel: KernelHandle,
    platform_desc: &PlatformDescription,
    deploy: &DeployDescription,
) -> ConfigResult<Deployment> {
    validate(platform_desc, deploy)?;

    let mut name_to_id = HashMap::new();
    let mut hosts = Vec::with_capacity(platform_desc.host.len());
    for (i, spec) in platform_desc.host.iter().enumerate() {
        let id = HostId(i);
        name_to_id.insert(spec.name.as_str(), id);
        hosts.push(Host {
            id,
            name: spec.name.clone(),
            speed: spec.speed,
        });
    }

    let mut network = NetworkTopology::new(platform_desc.default_bandwidth);
    for link in &platform_desc.link {
        let a = name_to_id[link.between[0].as_str()];
        let b = name_to_id[link.between[1].as_str()];
        network.add_link(a, b, link.bandwidth);
    }

    let master_host = name_to_id[deploy.master.as_str()];
    let worker_hosts: Vec<HostId> = deploy
        .workers
        .iter()
        .map(|name| name_to_id[name.as_str()])
        .collect();

    let platform = Platform::new(kernel, hosts, network);

    Ok(Deployment {
        platform,
        master_host,
        worker_hosts,
    })
}

impl Deployment {
    pub fn worker_count(&self) -> usize {
        self.worker_hosts.len()
    }

    pub fn grid_cpu_power(&self) -> f64 {
        self.worker_hosts
            .iter()
            .map(|&h| self.platform.host(h).speed)
            .sum()
    }

    pub fn host_for_worker(&self, wid: WorkerId) -> HostId {
        self.worker_hosts[wid.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mrsim_kernel::Kernel;

    fn sample() -> (PlatformDescription, DeployDescription) {
        let plat: PlatformDescription = toml::from_str(
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
            speed = 2e9
            "#,
        )
        .unwrap();
        let deploy = DeployDescription {
            master: "master-host".into(),
            workers: vec!["worker-0".into(), "worker-1".into()],
        };
        (plat, deploy)
    }

    #[test]
    fn resolves_worker_hosts_in_order() {
        let kernel = Kernel::new();
        let (plat, deploy) = sample();
        let deployment = resolve(kernel.handle(), &plat, &deploy).unwrap();

        assert_eq!(deployment.worker_count(), 2);
        assert_eq!(deployment.grid_cpu_power(), 3e9);
        assert_eq!(deployment.host_for_worker(WorkerId(0)).0, 1);
        assert_eq!(deployment.host_for_worker(WorkerId(1)).0, 2);
        assert_eq!(deployment.master_host.0, 0);
    }
}
