//! Portgroup replication.
//!
//! Copies a standard switch (name, port count, MTU, security) and all of its
//! portgroups (name, VLAN, security) from a source host to target hosts
//! managed by the same server.
//!
//! Creation is skipped for objects that already exist by name; security
//! policies are always re-applied. Failing to resolve the source is fatal;
//! failing on a target only affects that target.

use std::collections::HashSet;

use tracing::{error, info, warn};

use crate::error::CoreError;
use crate::model::{Host, Portgroup, VirtualSwitch};
use crate::report::{Action, HostOutcome, RunReport};
use crate::resolve::{HostMatch, resolve_host};
use crate::session::ManagementSession;

/// Which hosts receive the copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSelector {
    /// Explicit host names, processed in the given order.
    Hosts(Vec<String>),
    /// Every host of the named cluster except the source.
    Cluster(String),
}

#[derive(Debug, Clone)]
pub struct ReplicationRequest {
    pub source_host: String,
    pub vswitch: String,
    pub targets: TargetSelector,
    pub host_match: HostMatch,
    /// Only read; report what would be created and applied.
    pub dry_run: bool,
}

/// Run one replication against an open session.
///
/// Returns `Err` only for fatal conditions (source host or switch
/// unusable, cluster missing). Per-target problems are logged and recorded
/// in the report. Each target is resolved right before it is processed, so
/// the report follows the order of the selector.
pub async fn replicate<S: ManagementSession>(
    session: &S,
    request: &ReplicationRequest,
) -> Result<RunReport, CoreError> {
    let source = resolve_host(session, &request.source_host, request.host_match)
        .await
        .inspect_err(|e| error!(server = session.server(), "cannot use source host: {e}"))?;

    let switch = session
        .virtual_switch(&source, &request.vswitch)
        .await?
        .ok_or_else(|| CoreError::SwitchNotFound {
            host: source.name.clone(),
            name: request.vswitch.clone(),
        })
        .inspect_err(|e| error!("{e}"))?;
    let portgroups = session.portgroups(&source, &switch.name).await?;

    info!(
        source = %source.name,
        vswitch = %switch.name,
        num_ports = switch.num_ports,
        mtu = switch.mtu,
        portgroups = portgroups.len(),
        "loaded source switch"
    );

    let mut report = RunReport::new(Some(session.server().to_owned()));

    match &request.targets {
        TargetSelector::Hosts(names) => {
            for name in names {
                match resolve_host(session, name, request.host_match).await {
                    Ok(host) if host.id == source.id => {
                        warn!(target = %name, "target is the source host, skipping");
                        report.push(HostOutcome::skipped(name, "target is the source host"));
                    }
                    Ok(host) => {
                        replicate_to(session, host, &switch, &portgroups, request.dry_run, &mut report)
                            .await;
                    }
                    Err(e) => {
                        error!(target = %name, "cannot use target host: {e}");
                        report.push(HostOutcome::skipped(name, e.to_string()));
                    }
                }
            }
        }
        TargetSelector::Cluster(cluster) => {
            let members = session
                .cluster_hosts(cluster)
                .await
                .inspect_err(|e| error!("{e}"))?;
            info!(cluster = %cluster, hosts = members.len(), "resolved cluster members");
            for host in members.into_iter().filter(|h| h.id != source.id) {
                if host.is_connected() {
                    replicate_to(session, host, &switch, &portgroups, request.dry_run, &mut report)
                        .await;
                } else {
                    let state = host.state.to_string();
                    error!(target = %host.name, %state, "cluster host not connected, skipping");
                    report.push(HostOutcome::skipped(host.name, format!("host state is {state}")));
                }
            }
        }
    }

    Ok(report)
}

/// Copy to one resolved target and record the outcome.
async fn replicate_to<S: ManagementSession>(
    session: &S,
    target: Host,
    switch: &VirtualSwitch,
    portgroups: &[Portgroup],
    dry_run: bool,
    report: &mut RunReport,
) {
    info!(target = %target.name, "replicating to host");
    let mut actions = Vec::new();
    match copy_to_host(session, &target, switch, portgroups, dry_run, &mut actions).await {
        Ok(()) => {
            info!(target = %target.name, changes = actions.len(), "host done");
            report.push(HostOutcome::finished(target.name, actions, dry_run));
        }
        Err(e) => {
            error!(target = %target.name, "replication failed: {e}");
            report.push(HostOutcome::failed(target.name, actions, &e));
        }
    }
}

async fn copy_to_host<S: ManagementSession>(
    session: &S,
    target: &Host,
    switch: &VirtualSwitch,
    portgroups: &[Portgroup],
    dry_run: bool,
    actions: &mut Vec<Action>,
) -> Result<(), CoreError> {
    let verb = if dry_run { "would create" } else { "created" };
    let existing = session.virtual_switch(target, &switch.name).await?;

    let existing_portgroups: HashSet<String> = if existing.is_some() {
        session
            .portgroups(target, &switch.name)
            .await?
            .into_iter()
            .map(|pg| pg.name)
            .collect()
    } else {
        if !dry_run {
            session
                .create_virtual_switch(target, &switch.name, switch.num_ports, switch.mtu)
                .await?;
        }
        info!(target = %target.name, vswitch = %switch.name, "{verb} switch");
        actions.push(Action::CreateSwitch {
            name: switch.name.clone(),
            num_ports: switch.num_ports,
            mtu: switch.mtu,
        });
        HashSet::new()
    };

    if !dry_run {
        session
            .set_switch_security(target, &switch.name, &switch.security)
            .await?;
    }
    actions.push(Action::ApplySwitchSecurity {
        name: switch.name.clone(),
    });

    for pg in portgroups {
        if !existing_portgroups.contains(&pg.name) {
            if !dry_run {
                session
                    .create_portgroup(target, &switch.name, &pg.name, pg.vlan)
                    .await?;
            }
            info!(target = %target.name, portgroup = %pg.name, vlan = %pg.vlan, "{verb} portgroup");
            actions.push(Action::CreatePortgroup {
                name: pg.name.clone(),
                vlan: pg.vlan.get(),
            });
        }

        if !dry_run {
            session
                .set_portgroup_security(target, &switch.name, &pg.name, &pg.security)
                .await?;
        }
        actions.push(Action::ApplyPortgroupSecurity {
            name: pg.name.clone(),
        });
    }

    Ok(())
}
