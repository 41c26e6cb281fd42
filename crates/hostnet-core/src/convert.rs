// ── API-to-domain type conversions ──
//
// Bridges raw `hostnet_api` payloads into the domain model and back for
// request bodies. A VLAN outside 0-4095 coming from the server is clamped
// to untagged rather than failing the whole listing.

use hostnet_api::models::HostConnectionState;
use tracing::warn;

use crate::model::{
    ConnectionState, GuestVm, Host, PolicySetting, Portgroup, SecurityPolicy, VirtualSwitch,
    VlanId,
};

impl From<HostConnectionState> for ConnectionState {
    fn from(state: HostConnectionState) -> Self {
        match state {
            HostConnectionState::Connected => Self::Connected,
            HostConnectionState::Disconnected => Self::Disconnected,
            HostConnectionState::NotResponding => Self::NotResponding,
            HostConnectionState::Unknown => Self::Unknown,
        }
    }
}

impl From<hostnet_api::HostSummary> for Host {
    fn from(h: hostnet_api::HostSummary) -> Self {
        Self {
            id: h.host,
            name: h.name,
            state: h.connection_state.into(),
        }
    }
}

impl From<hostnet_api::VmSummary> for GuestVm {
    fn from(vm: hostnet_api::VmSummary) -> Self {
        Self {
            id: vm.vm,
            name: vm.name,
        }
    }
}

// ── Security policy (both directions) ───────────────────────────────

impl From<hostnet_api::PolicySetting> for PolicySetting {
    fn from(s: hostnet_api::PolicySetting) -> Self {
        Self {
            value: s.value,
            inherited: s.inherited,
        }
    }
}

impl From<PolicySetting> for hostnet_api::PolicySetting {
    fn from(s: PolicySetting) -> Self {
        Self {
            value: s.value,
            inherited: s.inherited,
        }
    }
}

impl From<hostnet_api::SecurityPolicy> for SecurityPolicy {
    fn from(p: hostnet_api::SecurityPolicy) -> Self {
        Self {
            allow_promiscuous: p.allow_promiscuous.into(),
            forged_transmits: p.forged_transmits.into(),
            mac_changes: p.mac_changes.into(),
        }
    }
}

impl From<&SecurityPolicy> for hostnet_api::SecurityPolicy {
    fn from(p: &SecurityPolicy) -> Self {
        Self {
            allow_promiscuous: p.allow_promiscuous.into(),
            forged_transmits: p.forged_transmits.into(),
            mac_changes: p.mac_changes.into(),
        }
    }
}

// ── Switches and portgroups ─────────────────────────────────────────

impl From<hostnet_api::VswitchInfo> for VirtualSwitch {
    fn from(v: hostnet_api::VswitchInfo) -> Self {
        Self {
            name: v.name,
            num_ports: v.num_ports,
            mtu: v.mtu,
            security: v.security.into(),
        }
    }
}

impl From<hostnet_api::PortgroupInfo> for Portgroup {
    fn from(p: hostnet_api::PortgroupInfo) -> Self {
        let vlan = VlanId::new(p.vlan_id).unwrap_or_else(|_| {
            warn!(portgroup = %p.name, vlan = p.vlan_id, "server reported VLAN out of range, treating as untagged");
            VlanId::default()
        });
        Self {
            name: p.name,
            vlan,
            security: p.security.into(),
        }
    }
}
