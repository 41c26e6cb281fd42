// ── Core error types ──
//
// Domain errors for the replication and VLAN procedures. Consumers never
// see HTTP status codes or JSON failures directly: `CoreError::from_api`
// translates transport-layer errors into these variants, tagged with the
// server they happened on.

use strum::Display;
use thiserror::Error;

/// Coarse classification used by callers to decide what an error means
/// for the run (fatal vs. skip) and how to report it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    ConnectionFailed,
    AuthenticationFailed,
    ObjectNotFound,
    ModuleUnavailable,
    UserDeclined,
    InvalidInput,
    Api,
}

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to {server}: {reason}")]
    ConnectionFailed { server: String, reason: String },

    #[error("Authentication failed on {server}: {message}")]
    AuthenticationFailed { server: String, message: String },

    #[error("Request to {server} timed out")]
    Timeout { server: String },

    #[error("Management API not available at {server}")]
    ModuleUnavailable { server: String },

    // ── Inventory errors ─────────────────────────────────────────────
    #[error("Host not found: {name}")]
    HostNotFound { name: String },

    #[error("Host {name} is not reachable by its manager (state: {state})")]
    HostUnavailable { name: String, state: String },

    #[error("Host name '{pattern}' matches several hosts: {}", matches.join(", "))]
    AmbiguousHost {
        pattern: String,
        matches: Vec<String>,
    },

    #[error("Cluster not found: {name}")]
    ClusterNotFound { name: String },

    #[error("Virtual switch {name} not found on {host}")]
    SwitchNotFound { host: String, name: String },

    // ── Input errors ─────────────────────────────────────────────────
    #[error("Cannot read host list {path}: {reason}")]
    HostListUnreadable { path: String, reason: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Confirmation declined: {prompt}")]
    UserDeclined { prompt: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error on {server}: {message}")]
    Api {
        server: String,
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },
}

impl CoreError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ConnectionFailed { .. } | Self::Timeout { .. } | Self::HostUnavailable { .. } => {
                ErrorKind::ConnectionFailed
            }
            Self::AuthenticationFailed { .. } => ErrorKind::AuthenticationFailed,
            Self::ModuleUnavailable { .. } => ErrorKind::ModuleUnavailable,
            Self::HostNotFound { .. }
            | Self::ClusterNotFound { .. }
            | Self::SwitchNotFound { .. }
            | Self::HostListUnreadable { .. } => ErrorKind::ObjectNotFound,
            Self::AmbiguousHost { .. } | Self::InvalidInput { .. } => ErrorKind::InvalidInput,
            Self::UserDeclined { .. } => ErrorKind::UserDeclined,
            Self::Api { .. } => ErrorKind::Api,
        }
    }

    /// Translate an API error raised while talking to `server`.
    pub fn from_api(err: hostnet_api::Error, server: &str) -> Self {
        let server = server.to_owned();
        if err.is_timeout() {
            return Self::Timeout { server };
        }
        if err.is_connection() {
            return Self::ConnectionFailed {
                server,
                reason: err.to_string(),
            };
        }
        match err {
            hostnet_api::Error::Authentication { message } => {
                Self::AuthenticationFailed { server, message }
            }
            hostnet_api::Error::NotLoggedIn => Self::AuthenticationFailed {
                server,
                message: "no active session".into(),
            },
            hostnet_api::Error::ApiUnavailable { .. } => Self::ModuleUnavailable { server },
            hostnet_api::Error::Transport(e) => Self::Api {
                server,
                status: e.status().map(|s| s.as_u16()),
                message: e.to_string(),
            },
            hostnet_api::Error::InvalidUrl(e) => Self::InvalidInput {
                message: format!("invalid address for {server}: {e}"),
            },
            hostnet_api::Error::Tls(reason) => Self::ConnectionFailed {
                server,
                reason: format!("TLS error: {reason}"),
            },
            hostnet_api::Error::Api {
                status,
                error_type,
                message,
            } => Self::Api {
                server,
                message: format!("{error_type}: {message}"),
                status: Some(status),
            },
            hostnet_api::Error::Deserialization { message, body: _ } => Self::Api {
                server,
                message: format!("unexpected response: {message}"),
                status: None,
            },
        }
    }
}
