// hostnet-core: Host networking procedures on top of hostnet-api.

pub mod convert;
pub mod error;
pub mod http;
pub mod model;
pub mod replicate;
pub mod report;
pub mod resolve;
pub mod session;
pub mod vlan;

#[cfg(test)]
mod mock;

// ── Primary re-exports ──────────────────────────────────────────────
pub use error::{CoreError, ErrorKind};
pub use http::{HttpConnector, HttpSession};
pub use model::{
    ConnectionState, Credentials, GuestVm, Host, PolicySetting, Portgroup, SecurityPolicy,
    VirtualSwitch, VlanId,
};
pub use replicate::{ReplicationRequest, TargetSelector, replicate};
pub use report::{Action, HostOutcome, HostStatus, RunReport};
pub use resolve::{HostMatch, resolve_host};
pub use session::{Completion, Connector, ManagementSession};
pub use vlan::{Confirmer, VlanRequest, read_host_list, set_vlans};

/// Transport settings are shared with the API crate unchanged.
pub use hostnet_api::{TlsMode, TransportConfig};
