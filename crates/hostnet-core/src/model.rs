// ── Domain model ──
//
// Hosts, standard switches, portgroups and their security policies, as
// the procedures see them. All of these are owned by the remote system;
// nothing here is persisted locally.

use std::fmt;
use std::str::FromStr;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::error::CoreError;

// ── Hosts ────────────────────────────────────────────────────────────

/// Connection state of a host as reported by its manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    Connected,
    Disconnected,
    NotResponding,
    Unknown,
}

/// A hypervisor host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Host {
    /// API identifier (`host-12`, `ha-host`).
    pub id: String,
    /// Inventory name, usually the FQDN or management address.
    pub name: String,
    pub state: ConnectionState,
}

impl Host {
    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }
}

/// A guest VM running on a host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuestVm {
    pub id: String,
    pub name: String,
}

// ── Security policy ──────────────────────────────────────────────────

/// One accept/reject setting. On portgroups `inherited` means the value
/// follows the owning switch; on switches it is always `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicySetting {
    pub value: bool,
    pub inherited: bool,
}

impl PolicySetting {
    pub const fn explicit(value: bool) -> Self {
        Self {
            value,
            inherited: false,
        }
    }

    pub const fn inherited(value: bool) -> Self {
        Self {
            value,
            inherited: true,
        }
    }
}

/// Promiscuous mode, forged transmits and MAC address changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityPolicy {
    pub allow_promiscuous: PolicySetting,
    pub forged_transmits: PolicySetting,
    pub mac_changes: PolicySetting,
}

// ── Switches and portgroups ──────────────────────────────────────────

/// A standard virtual switch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VirtualSwitch {
    pub name: String,
    pub num_ports: u32,
    pub mtu: u32,
    pub security: SecurityPolicy,
}

/// A portgroup on a standard switch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Portgroup {
    pub name: String,
    pub vlan: VlanId,
    pub security: SecurityPolicy,
}

// ── VLAN ID ──────────────────────────────────────────────────────────

/// An 802.1Q VLAN tag as accepted by standard portgroups.
///
/// `0` means untagged and `4095` means "trunk all VLANs to the guest".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct VlanId(u16);

impl VlanId {
    pub const MAX: u16 = 4095;

    pub fn new(id: u16) -> Result<Self, CoreError> {
        if id > Self::MAX {
            return Err(CoreError::InvalidInput {
                message: format!("VLAN ID {id} is out of range (0-{})", Self::MAX),
            });
        }
        Ok(Self(id))
    }

    pub const fn get(self) -> u16 {
        self.0
    }
}

impl TryFrom<u16> for VlanId {
    type Error = CoreError;

    fn try_from(id: u16) -> Result<Self, Self::Error> {
        Self::new(id)
    }
}

impl FromStr for VlanId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id: u16 = s.trim().parse().map_err(|_| CoreError::InvalidInput {
            message: format!("'{s}' is not a VLAN ID"),
        })?;
        Self::new(id)
    }
}

impl fmt::Display for VlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Credentials ──────────────────────────────────────────────────────

/// Username/password pair for a management endpoint.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }
}
