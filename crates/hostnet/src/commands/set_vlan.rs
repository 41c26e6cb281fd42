//! `hostnet set-vlan`: retag vSwitch0's default portgroups on every host of
//! a host list, talking to each host directly.

use std::path::PathBuf;

use tracing::info;

use hostnet_core::{HttpConnector, VlanId, VlanRequest, read_host_list, set_vlans};

use crate::cli::{CredentialTarget, SetVlanArgs};
use crate::commands::util::{self, TerminalConfirmer};
use crate::commands::{Context, finish};
use crate::config;
use crate::error::CliError;

pub async fn handle(args: SetVlanArgs, ctx: &Context<'_>) -> Result<(), CliError> {
    let path = match args.hosts {
        Some(path) => path,
        None => PathBuf::from(util::prompt_text("Host list file", "hosts")?),
    };
    let vlan = match args.vlan {
        Some(vlan) => VlanId::new(vlan)?,
        None => util::prompt_text("VLAN ID (0-4095)", "vlan")?.parse::<VlanId>()?,
    };

    let hosts = read_host_list(&path)?;
    info!(path = %path.display(), hosts = hosts.len(), %vlan, "loaded host list");

    let credentials = config::credentials(CredentialTarget::Esxi, args.user.as_deref(), ctx.config)?;
    let connector = HttpConnector::new(config::transport(ctx.global, ctx.config));

    let request = VlanRequest { hosts, vlan };
    let report = set_vlans(&connector, &credentials, &request, &mut TerminalConfirmer)
        .await?;

    finish(ctx, &[report])
}
