// ── Run reports ──
//
// What each procedure did, per host, in processing order. The CLI renders
// these as tables or JSON; tests assert on them.

use std::fmt;

use serde::Serialize;
use strum::Display;

use crate::error::CoreError;

/// A single change issued (or, in a dry run, planned) against a host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    CreateSwitch { name: String, num_ports: u32, mtu: u32 },
    ApplySwitchSecurity { name: String },
    CreatePortgroup { name: String, vlan: u16 },
    ApplyPortgroupSecurity { name: String },
    ShutdownGuest { vm: String },
    SetVlan { portgroup: String, vlan: u16, detached: bool },
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateSwitch { name, num_ports, mtu } => {
                write!(f, "create switch {name} ({num_ports} ports, MTU {mtu})")
            }
            Self::ApplySwitchSecurity { name } => write!(f, "apply security to switch {name}"),
            Self::CreatePortgroup { name, vlan } => write!(f, "create portgroup {name} (VLAN {vlan})"),
            Self::ApplyPortgroupSecurity { name } => write!(f, "apply security to portgroup {name}"),
            Self::ShutdownGuest { vm } => write!(f, "shut down guest {vm}"),
            Self::SetVlan {
                portgroup,
                vlan,
                detached,
            } => {
                write!(f, "set VLAN {vlan} on {portgroup}")?;
                if *detached {
                    f.write_str(" (not awaited)")?;
                }
                Ok(())
            }
        }
    }
}

/// How processing of one host ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum HostStatus {
    /// Every step ran.
    Completed,
    /// Dry run: reads ran, the listed actions were not issued.
    Planned,
    /// The host was never worked on (unreachable, not found, excluded).
    Skipped,
    /// Work started but a step failed.
    Failed,
}

/// Result for one host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostOutcome {
    pub host: String,
    pub status: HostStatus,
    pub actions: Vec<Action>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HostOutcome {
    pub fn finished(host: impl Into<String>, actions: Vec<Action>, dry_run: bool) -> Self {
        Self {
            host: host.into(),
            status: if dry_run {
                HostStatus::Planned
            } else {
                HostStatus::Completed
            },
            actions,
            error: None,
        }
    }

    pub fn skipped(host: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            status: HostStatus::Skipped,
            actions: Vec::new(),
            error: Some(reason.into()),
        }
    }

    pub fn failed(host: impl Into<String>, actions: Vec<Action>, err: &CoreError) -> Self {
        Self {
            host: host.into(),
            status: HostStatus::Failed,
            actions,
            error: Some(err.to_string()),
        }
    }
}

/// Everything one procedure run did against one management endpoint (or,
/// for the VLAN setter, against the hosts of a host list).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Manager the run went through; `None` when hosts were contacted
    /// directly.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
    pub hosts: Vec<HostOutcome>,
}

impl RunReport {
    pub fn new(server: Option<String>) -> Self {
        Self {
            server,
            hosts: Vec::new(),
        }
    }

    pub fn push(&mut self, outcome: HostOutcome) {
        self.hosts.push(outcome);
    }

    /// Hosts that were skipped or failed.
    pub fn problem_count(&self) -> usize {
        self.hosts
            .iter()
            .filter(|h| matches!(h.status, HostStatus::Skipped | HostStatus::Failed))
            .count()
    }

    pub fn is_clean(&self) -> bool {
        self.problem_count() == 0
    }

    pub fn outcome(&self, host: &str) -> Option<&HostOutcome> {
        self.hosts.iter().find(|h| h.host == host)
    }
}
