//! Platform adapter: wraps the discrete-event kernel with host CPU speed,
//! inter-host bandwidth, and named-mailbox messaging keyed by [`mrsim_types::Address`].

mod error;
mod host;
mod network;
mod platform;

pub use error::{PlatformError, PlatformResult};
pub use host::{Host, HostId};
pub use network::NetworkTopology;
pub use platform::Platform;
