//! CLI-owned configuration: TOML defaults, credential resolution, and
//! translation to `hostnet_core` transport settings.
//!
//! Core never sees these types. It receives a `TransportConfig` and
//! resolved `Credentials`.

use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;
use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::debug;

use hostnet_core::{Credentials, TlsMode, TransportConfig};

use crate::cli::{CredentialTarget, GlobalOpts, OutputFormat};
use crate::commands::util;
use crate::error::CliError;

const KEYRING_SERVICE: &str = "hostnet";

// ── TOML config structs ──────────────────────────────────────────────

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub defaults: Defaults,

    /// Credentials for `replicate`.
    #[serde(default)]
    pub vcenter: CredentialConfig,

    /// Credentials for direct host sessions (`set-vlan`).
    #[serde(default)]
    pub esxi: CredentialConfig,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default = "default_output")]
    pub output: String,

    /// Where `--log` writes; defaults to the platform data directory.
    pub log_dir: Option<PathBuf>,

    /// PEM bundle to trust instead of the system store.
    pub ca_cert: Option<PathBuf>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            insecure: false,
            timeout: default_timeout(),
            output: default_output(),
            log_dir: None,
            ca_cert: None,
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_timeout() -> u64 {
    30
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct CredentialConfig {
    pub username: Option<String>,

    /// Environment variable holding the password.
    pub password_env: Option<String>,

    /// Plaintext password (prefer the keyring).
    pub password: Option<String>,
}

// ── Paths ────────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("org", "hostnet", "hostnet")
}

/// Resolve the config file path. `HOSTNET_CONFIG` wins over the platform
/// location.
pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os("HOSTNET_CONFIG") {
        return PathBuf::from(path);
    }
    project_dirs().map_or_else(
        || PathBuf::from(".hostnet").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Log directory: flag > config > platform data dir.
pub fn log_dir(global: &GlobalOpts, config: &Config) -> PathBuf {
    global
        .log_dir
        .clone()
        .or_else(|| config.defaults.log_dir.clone())
        .or_else(|| project_dirs().map(|dirs| dirs.data_dir().join("logs")))
        .unwrap_or_else(|| PathBuf::from("."))
}

// ── Loading ──────────────────────────────────────────────────────────

/// Load the config from defaults, the TOML file, and `HOSTNET_*` variables
/// (nested keys use a double underscore: `HOSTNET_DEFAULTS__TIMEOUT`).
pub fn load_config() -> Result<Config, CliError> {
    let path = config_path();
    debug!(path = %path.display(), "loading config");

    let config = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("HOSTNET_").split("__"))
        .extract()?;
    Ok(config)
}

// ── Resolution ───────────────────────────────────────────────────────

/// Output format: flag > config.
pub fn output_format(global: &GlobalOpts, config: &Config) -> Result<OutputFormat, CliError> {
    if let Some(format) = global.output {
        return Ok(format);
    }
    OutputFormat::from_str(&config.defaults.output, true).map_err(|_| CliError::Validation {
        field: "defaults.output".into(),
        reason: format!(
            "expected 'table', 'json' or 'plain', got '{}'",
            config.defaults.output
        ),
    })
}

/// Translate global flags and config defaults into transport settings.
pub fn transport(global: &GlobalOpts, config: &Config) -> TransportConfig {
    let tls = if global.insecure || config.defaults.insecure {
        TlsMode::DangerAcceptInvalid
    } else if let Some(ref ca) = config.defaults.ca_cert {
        TlsMode::CustomCa(ca.clone())
    } else {
        TlsMode::System
    };

    TransportConfig {
        tls,
        timeout: Duration::from_secs(global.timeout.unwrap_or(config.defaults.timeout)),
    }
}

impl CredentialTarget {
    pub fn name(self) -> &'static str {
        match self {
            Self::Vcenter => "vcenter",
            Self::Esxi => "esxi",
        }
    }

    fn env_suffix(self) -> &'static str {
        match self {
            Self::Vcenter => "VCENTER",
            Self::Esxi => "ESXI",
        }
    }

    pub fn password_env(self) -> String {
        format!("HOSTNET_{}_PASSWORD", self.env_suffix())
    }

    pub fn keyring_account(self) -> String {
        format!("{}/password", self.name())
    }

    fn default_username(self) -> Option<&'static str> {
        match self {
            Self::Vcenter => None,
            Self::Esxi => Some("root"),
        }
    }

    pub fn section(self, config: &Config) -> &CredentialConfig {
        match self {
            Self::Vcenter => &config.vcenter,
            Self::Esxi => &config.esxi,
        }
    }
}

pub fn keyring_entry(target: CredentialTarget) -> Result<keyring::Entry, CliError> {
    keyring::Entry::new(KEYRING_SERVICE, &target.keyring_account()).map_err(|e| {
        CliError::Keyring {
            reason: e.to_string(),
        }
    })
}

/// Resolve the credential pair for `target`.
///
/// Username: flag > config > built-in default > prompt.
/// Password: `password_env` > `HOSTNET_<TARGET>_PASSWORD` > keyring >
/// plaintext config > hidden prompt.
pub fn credentials(
    target: CredentialTarget,
    user_flag: Option<&str>,
    config: &Config,
) -> Result<Credentials, CliError> {
    let section = target.section(config);

    let username = match user_flag
        .map(str::to_owned)
        .or_else(|| section.username.clone())
        .or_else(|| target.default_username().map(str::to_owned))
    {
        Some(user) => user,
        None => util::prompt_text(&format!("{} user", target.name()), "user")?,
    };

    let password = resolve_password(target, section).map_or_else(
        || prompt_password(target, &username),
        Ok,
    )?;

    Ok(Credentials::new(username, password))
}

fn resolve_password(target: CredentialTarget, section: &CredentialConfig) -> Option<SecretString> {
    if let Some(ref name) = section.password_env {
        if let Ok(value) = std::env::var(name) {
            debug!(target = target.name(), source = %name, "password from environment");
            return Some(SecretString::from(value));
        }
    }

    if let Ok(value) = std::env::var(target.password_env()) {
        debug!(target = target.name(), "password from environment");
        return Some(SecretString::from(value));
    }

    if let Ok(entry) = keyring_entry(target) {
        if let Ok(value) = entry.get_password() {
            debug!(target = target.name(), "password from keyring");
            return Some(SecretString::from(value));
        }
    }

    section.password.clone().map(SecretString::from)
}

fn prompt_password(target: CredentialTarget, username: &str) -> Result<SecretString, CliError> {
    let no_password = || CliError::NoPassword {
        target: target.name().into(),
        username: username.into(),
        env_suffix: target.env_suffix().into(),
    };

    if !util::is_interactive() {
        return Err(no_password());
    }
    match rpassword::prompt_password(format!("{} password for {username}: ", target.name())) {
        Ok(value) if !value.is_empty() => Ok(SecretString::from(value)),
        _ => Err(no_password()),
    }
}
