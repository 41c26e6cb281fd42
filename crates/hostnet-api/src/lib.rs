// hostnet-api: Async Rust client for the vSphere-style host networking API

pub mod client;
pub mod error;
pub mod hosts;
pub mod models;
pub mod networking;
pub mod session;
pub mod transport;
pub mod vms;

pub use client::ApiClient;
pub use error::Error;
pub use models::{
    ClusterSummary, HostSummary, PolicySetting, PortgroupCreateSpec, PortgroupInfo,
    SecurityPolicy, TaskId, VmSummary, VswitchCreateSpec, VswitchInfo,
};
pub use transport::{TlsMode, TransportConfig};
