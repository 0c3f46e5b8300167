use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;
use std::rc::Rc;

use mrsim_kernel::{compute, Compute, ComputeHandle, KernelHandle, Mailbox, Recv, Sleep};
use mrsim_types::{Address, Message};

use crate::error::PlatformResult;
use crate::host::{Host, HostId};
use crate::network::NetworkTopology;

/// Adapter between the domain layer (`mrsim-master`/`mrsim-worker`/...) and
/// the discrete-event kernel: resolves host CPU speed and inter-host
/// bandwidth, and owns the named mailboxes addressed by [`Address`].
#[derive(Clone)]
pub struct Platform {
    kernel: KernelHandle,
    hosts: Rc<Vec<Host>>,
    network: Rc<NetworkTopology>,
    mailboxes: Rc<RefCell<HashMap<Address, Mailbox<Message>>>>,
}

impl Platform {
    pub fn new(kernel: KernelHandle, hosts: Vec<Host>, network: NetworkTopology) -> Self {
        Self {
            kernel,
            hosts: Rc::new(hosts),
            network: Rc::new(network),
            mailboxes: Rc::new(RefCell::new(HashMap::new())),
        }
    }

    pub fn host(&self, id: HostId) -> &Host {
        &self.hosts[id.0]
    }

    pub fn host_count(&self) -> usize {
        self.hosts.len()
    }

    pub fn now(&self) -> f64 {
        self.kernel.now()
    }

    pub fn sleep(&self, duration: f64) -> Sleep {
        self.kernel.sleep(duration)
    }

    pub fn spawn(&self, fut: impl Future<Output = ()> + 'static) -> PlatformResult<()> {
        self.kernel.spawn(fut).map_err(Into::into)
    }

    /// A cancellable compute step executing `flops` floating-point
    /// operations at `host`'s CPU speed.
    pub fn compute(&self, host: HostId, flops: f64) -> (Compute, ComputeHandle) {
        let speed = self.host(host).speed;
        compute(&self.kernel, flops, speed)
    }

    fn mailbox(&self, addr: Address) -> Mailbox<Message> {
        self.mailboxes
            .borrow_mut()
            .entry(addr)
            .or_insert_with(Mailbox::new)
            .clone()
    }

    /// Deliver `msg` to `addr` after the modelled transfer delay for
    /// `size_bytes` between `from` and `to`. Fire-and-forget: the caller does
    /// not await delivery, matching the original's detached DataNode replies
    /// (§4.2) — every other message in this protocol carries zero bytes, so
    /// the delay is zero and delivery is effectively synchronous for them.
    pub fn send(
        &self,
        from: HostId,
        to: HostId,
        addr: Address,
        msg: Message,
        size_bytes: f64,
    ) -> PlatformResult<()> {
        let delay = self.network.transfer_delay(from, to, size_bytes);
        let mailbox = self.mailbox(addr);
        if delay <= 0.0 {
            mailbox.send(msg);
            return Ok(());
        }
        let kernel = self.kernel.clone();
        self.spawn(async move {
            kernel.sleep(delay).await;
            mailbox.send(msg);
        })
    }

    pub fn recv(&self, addr: Address) -> Recv<Message> {
        self.mailbox(addr).recv()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mrsim_kernel::Kernel;
    use std::cell::RefCell as StdRefCell;

    fn two_host_platform(kernel: &Kernel) -> Platform {
        let hosts = vec![
            Host {
                id: HostId(0),
                name: "h0".into(),
                speed: 1e9,
            },
            Host {
                id: HostId(1),
                name: "h1".into(),
                speed: 1e9,
            },
        ];
        Platform::new(kernel.handle(), hosts, NetworkTopology::new(1e6))
    }

    #[test]
    fn zero_size_send_is_delivered_without_advancing_clock() {
        let mut kernel = Kernel::new();
        let platform = two_host_platform(&kernel);
        let received = Rc::new(StdRefCell::new(None));

        let p = platform.clone();
        let r = received.clone();
        kernel
            .spawn(async move {
                let msg = p.recv(Address::Master).await;
                *r.borrow_mut() = Some(msg.name());
            })
            .unwrap();

        platform
            .send(
                HostId(0),
                HostId(1),
                Address::Master,
                Message::Heartbeat(mrsim_types::WorkerId(0)),
                0.0,
            )
            .unwrap();

        kernel.run().unwrap();
        assert_eq!(*received.borrow(), Some("SMS-HB"));
        assert_eq!(kernel.now(), 0.0);
    }

    #[test]
    fn sized_send_delays_delivery_by_size_over_bandwidth() {
        let mut kernel = Kernel::new();
        let platform = two_host_platform(&kernel);
        let received_at = Rc::new(StdRefCell::new(None));

        let p = platform.clone();
        let r = received_at.clone();
        kernel
            .spawn(async move {
                p.recv(Address::DataNode(mrsim_types::WorkerId(0))).await;
                *r.borrow_mut() = Some(p.now());
            })
            .unwrap();

        platform
            .send(
                HostId(0),
                HostId(1),
                Address::DataNode(mrsim_types::WorkerId(0)),
                Message::Data(1_000_000.0),
                1_000_000.0,
            )
            .unwrap();

        kernel.run().unwrap();
        assert_eq!(*received_at.borrow(), Some(1.0));
    }
}
