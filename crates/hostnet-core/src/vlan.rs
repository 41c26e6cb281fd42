//! VLAN bulk setter.
//!
//! For every host of a host list: shut down running guests, then retag the
//! two default portgroups of `vSwitch0`. The management network change is
//! issued as a server-side task and never awaited, since it can cut the
//! connection it travels on.

use std::path::Path;

use tracing::{debug, error, info, warn};

use crate::error::{CoreError, ErrorKind};
use crate::model::{Credentials, Host, VlanId};
use crate::report::{Action, HostOutcome, RunReport};
use crate::session::{Completion, Connector, ManagementSession};

pub const DEFAULT_VSWITCH: &str = "vSwitch0";
pub const VM_NETWORK: &str = "VM Network";
pub const MANAGEMENT_NETWORK: &str = "Management Network";

/// Asks the operator a yes/no question. Returning `false` aborts the run;
/// implementations that cannot ask (no terminal) must return `false`.
pub trait Confirmer: Send {
    fn confirm(&mut self, prompt: &str) -> bool;
}

#[derive(Debug, Clone)]
pub struct VlanRequest {
    /// Host addresses, contacted directly in this order.
    pub hosts: Vec<String>,
    pub vlan: VlanId,
}

/// Parse a host list: one address per line, whitespace trimmed, blank lines
/// and `#` comments ignored.
pub fn parse_host_list(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_owned)
        .collect()
}

/// Read and parse a host list file. A missing file or a list without any
/// address is an error.
pub fn read_host_list(path: &Path) -> Result<Vec<String>, CoreError> {
    let contents = std::fs::read_to_string(path).map_err(|e| CoreError::HostListUnreadable {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let hosts = parse_host_list(&contents);
    if hosts.is_empty() {
        return Err(CoreError::InvalidInput {
            message: format!("host list {} contains no hosts", path.display()),
        });
    }
    Ok(hosts)
}

fn prompts(request: &VlanRequest) -> [String; 3] {
    let count = request.hosts.len();
    [
        format!(
            "Set VLAN {} on '{VM_NETWORK}' and '{MANAGEMENT_NETWORK}' of {DEFAULT_VSWITCH} on {count} host(s)?",
            request.vlan
        ),
        format!("Every running VM on these {count} host(s) will be shut down. Continue?"),
        format!(
            "Hosts will lose management connectivity unless their uplinks carry VLAN {}. Really continue?",
            request.vlan
        ),
    ]
}

/// Run the VLAN change over every listed host.
///
/// All three confirmations are asked before any host is contacted. Per-host
/// problems are logged and recorded; only a declined prompt is an error.
pub async fn set_vlans<C: Connector>(
    connector: &C,
    credentials: &Credentials,
    request: &VlanRequest,
    confirmer: &mut dyn Confirmer,
) -> Result<RunReport, CoreError> {
    for prompt in prompts(request) {
        if !confirmer.confirm(&prompt) {
            warn!("operator declined: {prompt}");
            return Err(CoreError::UserDeclined { prompt });
        }
    }

    let mut report = RunReport::new(None);
    for address in &request.hosts {
        info!(host = %address, vlan = %request.vlan, "processing host");

        let session = match connector.connect(address, credentials).await {
            Ok(session) => session,
            Err(e) => {
                error!(host = %address, "cannot connect, skipping: {e}");
                report.push(HostOutcome::skipped(address, e.to_string()));
                continue;
            }
        };

        let mut actions = Vec::new();
        let outcome = match retag_host(&session, request.vlan, &mut actions).await {
            Ok(()) => {
                info!(host = %address, "host done");
                HostOutcome::finished(address, actions, false)
            }
            Err(e) => {
                error!(host = %address, "VLAN change failed: {e}");
                HostOutcome::failed(address, actions, &e)
            }
        };
        report.push(outcome);

        if let Err(e) = session.disconnect().await {
            debug!(host = %address, "disconnect failed: {e}");
        }
    }

    Ok(report)
}

async fn retag_host<S: ManagementSession>(
    session: &S,
    vlan: VlanId,
    actions: &mut Vec<Action>,
) -> Result<(), CoreError> {
    let host = this_host(session).await?;

    for vm in session.running_vms(&host).await? {
        match session.shutdown_guest(&vm).await {
            Ok(()) => {
                info!(host = %host.name, vm = %vm.name, "guest shutdown requested");
                actions.push(Action::ShutdownGuest { vm: vm.name });
            }
            Err(e) => warn!(host = %host.name, vm = %vm.name, "guest shutdown failed: {e}"),
        }
    }

    session
        .set_portgroup_vlan(&host, DEFAULT_VSWITCH, VM_NETWORK, vlan, Completion::Wait)
        .await?;
    info!(host = %host.name, portgroup = VM_NETWORK, %vlan, "VLAN set");
    actions.push(Action::SetVlan {
        portgroup: VM_NETWORK.to_owned(),
        vlan: vlan.get(),
        detached: false,
    });

    match session
        .set_portgroup_vlan(&host, DEFAULT_VSWITCH, MANAGEMENT_NETWORK, vlan, Completion::Detach)
        .await
    {
        Ok(task) => info!(
            host = %host.name,
            portgroup = MANAGEMENT_NETWORK,
            %vlan,
            task = task.as_deref().unwrap_or("-"),
            "VLAN change started"
        ),
        Err(e) if e.kind() == ErrorKind::ConnectionFailed => warn!(
            host = %host.name,
            portgroup = MANAGEMENT_NETWORK,
            "connection lost while starting VLAN change: {e}"
        ),
        Err(e) => return Err(e),
    }
    actions.push(Action::SetVlan {
        portgroup: MANAGEMENT_NETWORK.to_owned(),
        vlan: vlan.get(),
        detached: true,
    });

    Ok(())
}

/// The host behind a direct session.
async fn this_host<S: ManagementSession>(session: &S) -> Result<Host, CoreError> {
    session
        .list_hosts()
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| CoreError::HostNotFound {
            name: session.server().to_owned(),
        })
}
