use thiserror::Error;

/// Top-level error type for the `hostnet-api` crate.
///
/// Covers every failure mode of the management API surface: session
/// handling, transport, structured API errors, and payload decoding.
/// `hostnet-core` maps these into domain errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login rejected (wrong credentials, locked account, etc.)
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// A call was made before `login` or after `logout`.
    #[error("No active session -- login required")]
    NotLoggedIn,

    // ── Endpoint ────────────────────────────────────────────────────
    /// The endpoint answered, but does not expose the management API.
    #[error("Management API not available at {url}")]
    ApiUnavailable { url: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── API ─────────────────────────────────────────────────────────
    /// Structured error from the management API
    /// (`{"error_type": ..., "messages": [...]}`).
    #[error("API error (HTTP {status}, {error_type}): {message}")]
    Api {
        status: u16,
        error_type: String,
        message: String,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Api { status: 404, .. } => true,
            Self::Api { error_type, .. } => error_type == "NOT_FOUND",
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            _ => false,
        }
    }

    /// Returns `true` if the request never got a usable answer
    /// (refused, reset, timed out).
    pub fn is_connection(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_connect() || e.is_timeout() || e.is_request(),
            _ => false,
        }
    }

    /// Returns `true` if the request timed out.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }
}
