//! `hostnet replicate`: copy a standard switch to other hosts, one vCenter
//! at a time.

use tracing::{error, info, warn};

use hostnet_core::{
    Connector, CoreError, Credentials, HostMatch, HttpConnector, ManagementSession,
    ReplicationRequest, RunReport, TargetSelector, replicate,
};

use crate::cli::{CredentialTarget, ReplicateArgs};
use crate::commands::{Context, finish, print_reports, util};
use crate::config;
use crate::error::CliError;

pub async fn handle(args: ReplicateArgs, ctx: &Context<'_>) -> Result<(), CliError> {
    let servers = if args.vcenter.is_empty() {
        util::split_list(&util::prompt_text("vCenter server(s), comma separated", "vcenter")?)
    } else {
        args.vcenter
    };
    if servers.is_empty() {
        return Err(CliError::Validation {
            field: "vcenter".into(),
            reason: "at least one server is required".into(),
        });
    }

    let source_host = match args.source_host {
        Some(host) => host,
        None => util::prompt_text("Source host", "source-host")?,
    };
    let vswitch = match args.source_vswitch {
        Some(name) => name,
        None => util::prompt_text("Source vSwitch", "source-vswitch")?,
    };
    let targets = target_selector(args.target_host, args.target_cluster)?;

    let request = ReplicationRequest {
        source_host,
        vswitch,
        targets,
        host_match: if args.match_prefix {
            HostMatch::Prefix
        } else {
            HostMatch::Exact
        },
        dry_run: args.dry_run,
    };

    let credentials = config::credentials(CredentialTarget::Vcenter, args.user.as_deref(), ctx.config)?;
    let connector = HttpConnector::new(config::transport(ctx.global, ctx.config));

    if request.dry_run {
        info!("dry run: no changes will be made");
    }

    let mut reports = Vec::with_capacity(servers.len());
    for server in &servers {
        match replicate_on(&connector, server, &credentials, &request).await {
            Ok(report) => reports.push(report),
            Err(e) => {
                // Servers already done still get their report.
                if !reports.is_empty() {
                    print_reports(ctx, &reports)?;
                }
                return Err(e.into());
            }
        }
    }

    finish(ctx, &reports)
}

/// Connect to one vCenter, replicate, and log out again.
async fn replicate_on<C: Connector>(
    connector: &C,
    server: &str,
    credentials: &Credentials,
    request: &ReplicationRequest,
) -> Result<RunReport, CoreError> {
    info!(%server, "connecting to vCenter");
    let session = connector
        .connect(server, credentials)
        .await
        .inspect_err(|e| error!(%server, "{e}"))?;

    let result = replicate(&session, request).await;

    if let Err(e) = session.disconnect().await {
        warn!(%server, "logout failed: {e}");
    }
    result
}

/// `--target-host` XOR `--target-cluster`; clap rejects both, prompt when
/// neither was given.
fn target_selector(hosts: Vec<String>, cluster: Option<String>) -> Result<TargetSelector, CliError> {
    if let Some(cluster) = cluster {
        return Ok(TargetSelector::Cluster(cluster));
    }
    if !hosts.is_empty() {
        return Ok(TargetSelector::Hosts(hosts));
    }

    if let Some(answer) = util::prompt_optional(
        "Target hosts, comma separated (leave empty to target a cluster)",
        "target-host",
    )? {
        return Ok(TargetSelector::Hosts(util::split_list(&answer)));
    }
    let cluster = util::prompt_text("Target cluster", "target-cluster").map_err(|_| {
        CliError::Validation {
            field: "target".into(),
            reason: "give --target-host or --target-cluster".into(),
        }
    })?;
    Ok(TargetSelector::Cluster(cluster))
}
