// Management API payload types
//
// Request and response bodies for the session, inventory, networking and
// VM endpoints. Fields use `#[serde(default)]` where hosts running older
// builds omit them.

use serde::{Deserialize, Serialize};

// ── Error envelope ───────────────────────────────────────────────────

/// Error body returned with every non-2xx response:
/// ```json
/// { "error_type": "NOT_FOUND", "messages": [{ "id": "...", "default_message": "..." }] }
/// ```
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub error_type: Option<String>,
    #[serde(default)]
    pub messages: Vec<LocalizableMessage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LocalizableMessage {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub default_message: Option<String>,
}

impl ErrorBody {
    /// First human-readable message, falling back to the message id.
    pub(crate) fn message(&self) -> Option<String> {
        self.messages
            .iter()
            .find_map(|m| m.default_message.clone().or_else(|| m.id.clone()))
    }
}

// ── Inventory ────────────────────────────────────────────────────────

/// Host entry from `GET /api/vcenter/host`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostSummary {
    /// API identifier (`host-12`, or `ha-host` on a standalone host).
    pub host: String,
    pub name: String,
    #[serde(default)]
    pub connection_state: HostConnectionState,
    #[serde(default)]
    pub power_state: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HostConnectionState {
    #[default]
    Connected,
    Disconnected,
    NotResponding,
    #[serde(other)]
    Unknown,
}

/// Cluster entry from `GET /api/vcenter/cluster`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterSummary {
    pub cluster: String,
    pub name: String,
}

/// VM entry from `GET /api/vcenter/vm`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VmSummary {
    pub vm: String,
    pub name: String,
    #[serde(default)]
    pub power_state: Option<String>,
}

// ── Networking ───────────────────────────────────────────────────────

/// One accept/reject setting of a security policy.
///
/// `inherited` is only meaningful on portgroups, where it means the value
/// is taken from the owning switch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicySetting {
    pub value: bool,
    #[serde(default)]
    pub inherited: bool,
}

/// Layer 2 security policy of a standard switch or portgroup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityPolicy {
    #[serde(default)]
    pub allow_promiscuous: PolicySetting,
    #[serde(default)]
    pub forged_transmits: PolicySetting,
    #[serde(default)]
    pub mac_changes: PolicySetting,
}

/// Standard virtual switch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VswitchInfo {
    pub name: String,
    pub num_ports: u32,
    pub mtu: u32,
    #[serde(default)]
    pub security: SecurityPolicy,
}

/// Body of `POST .../networking/vswitches`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VswitchCreateSpec {
    pub name: String,
    pub num_ports: u32,
    pub mtu: u32,
}

/// Portgroup on a standard switch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortgroupInfo {
    pub name: String,
    #[serde(default)]
    pub vlan_id: u16,
    #[serde(default)]
    pub security: SecurityPolicy,
}

/// Body of `POST .../portgroups`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortgroupCreateSpec {
    pub name: String,
    pub vlan_id: u16,
}

/// Body of `PATCH .../portgroups/{name}`.
#[derive(Debug, Clone, Copy, Serialize)]
pub(crate) struct PortgroupUpdateSpec {
    pub vlan_id: u16,
}

/// Identifier of a server-side task started with `vmw-task=true`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub String);

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
