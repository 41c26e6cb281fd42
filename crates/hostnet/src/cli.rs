//! Clap derive structures for the `hostnet` CLI.
//!
//! Kept free of crate-internal types so `build.rs` can include it for man
//! page generation.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// hostnet -- standard-switch networking automation for vSphere hosts
#[derive(Debug, Parser)]
#[command(
    name = "hostnet",
    version,
    about = "Replicate host networking and bulk-set VLANs on vSphere hosts",
    long_about = "Automates two host networking chores against the vSphere Automation API:\n\n\
        - copy a standard switch, its portgroups and their security policies\n  \
          from a source host to other hosts of the same vCenter\n\
        - shut down guests and retag the default portgroups of vSwitch0 on a\n  \
          list of standalone hosts",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Increase console verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Trace everything, including HTTP requests
    #[arg(long, global = true)]
    pub debug: bool,

    /// Write a timestamped log file for this run
    #[arg(long, global = true)]
    pub log: bool,

    /// Directory for log files (implies --log)
    #[arg(long, env = "HOSTNET_LOG_DIR", global = true, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "HOSTNET_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds [default: 30]
    #[arg(long, env = "HOSTNET_TIMEOUT", global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Report format [default: table]
    #[arg(long, short = 'o', env = "HOSTNET_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Suppress the run report
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// One `host status` pair per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Copy a standard switch and its portgroups from one host to others
    #[command(alias = "rep")]
    Replicate(ReplicateArgs),

    /// Shut down guests and set the VLAN of vSwitch0's default portgroups
    #[command(alias = "vlan")]
    SetVlan(SetVlanArgs),

    /// Show the release history
    History,

    /// Inspect configuration and store passwords
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── replicate ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ReplicateArgs {
    /// vCenter server(s), processed in order
    #[arg(long, value_delimiter = ',', value_name = "SERVER")]
    pub vcenter: Vec<String>,

    /// Host that carries the switch to copy
    #[arg(long, value_name = "HOST")]
    pub source_host: Option<String>,

    /// Name of the standard switch to copy
    #[arg(long, value_name = "NAME")]
    pub source_vswitch: Option<String>,

    /// Hosts to copy to
    #[arg(
        long,
        value_delimiter = ',',
        value_name = "HOST",
        conflicts_with = "target_cluster"
    )]
    pub target_host: Vec<String>,

    /// Copy to every other host of this cluster
    #[arg(long, value_name = "CLUSTER")]
    pub target_cluster: Option<String>,

    /// Treat host names as prefixes (`esx01` matches `esx01.lab.local`)
    #[arg(long)]
    pub match_prefix: bool,

    /// Read everything, report what would change, change nothing
    #[arg(long)]
    pub dry_run: bool,

    /// vCenter user (overrides config)
    #[arg(long, short = 'u', env = "HOSTNET_VCENTER_USER")]
    pub user: Option<String>,
}

// ── set-vlan ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SetVlanArgs {
    /// File with one host address per line
    #[arg(long, value_name = "FILE")]
    pub hosts: Option<PathBuf>,

    /// VLAN ID to set (0 = untagged, 4095 = all)
    #[arg(long, value_parser = clap::value_parser!(u16).range(0..=4095))]
    pub vlan: Option<u16>,

    /// ESXi user (overrides config) [default: root]
    #[arg(long, short = 'u', env = "HOSTNET_ESXI_USER")]
    pub user: Option<String>,
}

// ── config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display the resolved configuration (passwords redacted)
    Show,

    /// Print the config file location
    Path,

    /// Store a password in the system keyring
    SetPassword {
        /// Which credential set the password belongs to
        #[arg(value_enum)]
        target: CredentialTarget,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CredentialTarget {
    /// vCenter credentials (replicate)
    Vcenter,
    /// Direct ESXi host credentials (set-vlan)
    Esxi,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
