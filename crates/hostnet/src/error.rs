//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use hostnet_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const MODULE_UNAVAILABLE: i32 = 5;
    pub const DECLINED: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to {server}")]
    #[diagnostic(
        code(hostnet::connection_failed),
        help(
            "{reason}\n\
             Check that {server} is reachable on port 443.\n\
             Self-signed certificate? Retry with --insecure (-k)."
        )
    )]
    ConnectionFailed { server: String, reason: String },

    #[error("Request to {server} timed out")]
    #[diagnostic(
        code(hostnet::timeout),
        help("Increase the timeout with --timeout or check the server's responsiveness.")
    )]
    Timeout { server: String },

    #[error("{server} does not expose the vSphere Automation API")]
    #[diagnostic(
        code(hostnet::module_unavailable),
        help("The REST endpoint /api/session answered 404. Check the server version and address.")
    )]
    ModuleUnavailable { server: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed on {server}")]
    #[diagnostic(
        code(hostnet::auth_failed),
        help(
            "{message}\n\
             Verify the user name and password.\n\
             Store a password with: hostnet config set-password <vcenter|esxi>"
        )
    )]
    AuthFailed { server: String, message: String },

    #[error("No password available for {target} user '{username}'")]
    #[diagnostic(
        code(hostnet::no_password),
        help(
            "Set HOSTNET_{env_suffix}_PASSWORD, configure password_env in the config file,\n\
             or store one with: hostnet config set-password {target}"
        )
    )]
    NoPassword {
        target: String,
        username: String,
        env_suffix: String,
    },

    // ── Inventory ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(code(hostnet::not_found), help("{hint}"))]
    NotFound {
        resource_type: String,
        identifier: String,
        hint: String,
    },

    #[error("Host '{name}' is not usable (state: {state})")]
    #[diagnostic(
        code(hostnet::host_unavailable),
        help("vCenter cannot reach this host. Reconnect it in vCenter and retry.")
    )]
    HostUnavailable { name: String, state: String },

    #[error("Host name '{pattern}' matches several hosts")]
    #[diagnostic(
        code(hostnet::ambiguous_host),
        help("Matches: {matches}\nUse a longer prefix or the full host name.")
    )]
    AmbiguousHost { pattern: String, matches: String },

    // ── Run outcome ──────────────────────────────────────────────────
    #[error("{problems} of {total} host(s) were skipped or failed")]
    #[diagnostic(
        code(hostnet::incomplete),
        help("See the report above and the log for details. Re-running is safe.")
    )]
    Incomplete { problems: usize, total: usize },

    #[error("Aborted at confirmation: {prompt}")]
    #[diagnostic(code(hostnet::declined))]
    Declined { prompt: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error on {server}: {message}")]
    #[diagnostic(code(hostnet::api_error))]
    ApiError {
        server: String,
        message: String,
        status: Option<u16>,
    },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(hostnet::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(
        code(hostnet::config),
        help("Check the config file reported by: hostnet config path")
    )]
    Config(Box<figment::Error>),

    #[error("Keyring error: {reason}")]
    #[diagnostic(
        code(hostnet::keyring),
        help("Use HOSTNET_VCENTER_PASSWORD / HOSTNET_ESXI_PASSWORD where no keyring is available.")
    )]
    Keyring { reason: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render report: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::HostUnavailable { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::ModuleUnavailable { .. } => exit_code::MODULE_UNAVAILABLE,
            Self::AuthFailed { .. } | Self::NoPassword { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Declined { .. } => exit_code::DECLINED,
            Self::AmbiguousHost { .. } | Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { server, reason } => {
                CliError::ConnectionFailed { server, reason }
            }

            CoreError::AuthenticationFailed { server, message } => {
                CliError::AuthFailed { server, message }
            }

            CoreError::Timeout { server } => CliError::Timeout { server },

            CoreError::ModuleUnavailable { server } => CliError::ModuleUnavailable { server },

            CoreError::HostNotFound { name } => CliError::NotFound {
                resource_type: "Host".into(),
                identifier: name,
                hint: "Host names match exactly; use --match-prefix to match by prefix.".into(),
            },

            CoreError::HostUnavailable { name, state } => {
                CliError::HostUnavailable { name, state }
            }

            CoreError::AmbiguousHost { pattern, matches } => CliError::AmbiguousHost {
                pattern,
                matches: matches.join(", "),
            },

            CoreError::ClusterNotFound { name } => CliError::NotFound {
                resource_type: "Cluster".into(),
                identifier: name,
                hint: "Cluster names are case-sensitive.".into(),
            },

            CoreError::SwitchNotFound { host, name } => CliError::NotFound {
                resource_type: "Virtual switch".into(),
                identifier: name,
                hint: format!("Check the standard switches configured on {host}."),
            },

            CoreError::HostListUnreadable { path, reason } => CliError::NotFound {
                resource_type: "Host list".into(),
                identifier: path,
                hint: reason,
            },

            CoreError::InvalidInput { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::UserDeclined { prompt } => CliError::Declined { prompt },

            CoreError::Api {
                server,
                message,
                status,
            } => CliError::ApiError {
                server,
                message,
                status,
            },
        }
    }
}
