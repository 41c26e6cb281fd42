//! `hostnet history`: release notes, newest first.

use serde::Serialize;
use tabled::Tabled;

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct Release {
    version: &'static str,
    date: &'static str,
    changes: &'static [&'static str],
}

#[derive(Tabled)]
struct ReleaseRow {
    #[tabled(rename = "Version")]
    version: &'static str,
    #[tabled(rename = "Date")]
    date: &'static str,
    #[tabled(rename = "Changes")]
    changes: String,
}

const RELEASES: &[Release] = &[Release {
    version: "0.1.0",
    date: "2026-10-16",
    changes: &[
        "replicate: copy a standard switch, its portgroups and security policies",
        "replicate: explicit target hosts or every host of a cluster",
        "replicate: --match-prefix, --dry-run, several vCenters per run",
        "set-vlan: guest shutdown, VM Network and detached Management Network retag",
        "config file, keyring-stored passwords, shell completions, man pages",
        "timestamped run logs with --log",
    ],
}];

pub fn handle(format: OutputFormat, quiet: bool) -> Result<(), CliError> {
    let out = output::render_list(
        format,
        RELEASES,
        |r| ReleaseRow {
            version: r.version,
            date: r.date,
            changes: r.changes.join("\n"),
        },
        |r| format!("{} {}", r.version, r.date),
    )?;
    output::print_output(&out, quiet);
    Ok(())
}
