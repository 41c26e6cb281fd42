//! Config subcommand handlers.

use serde::Serialize;

use crate::cli::{ConfigArgs, ConfigCommand, CredentialTarget};
use crate::config::{self, Config, CredentialConfig};
use crate::error::CliError;

/// Credential section as shown to the user: where the password would come
/// from, never the password itself.
#[derive(Serialize)]
struct CredentialView {
    username: Option<String>,
    password_env: Option<String>,
    password: Option<&'static str>,
}

impl CredentialView {
    fn new(section: &CredentialConfig) -> Self {
        Self {
            username: section.username.clone(),
            password_env: section.password_env.clone(),
            password: section.password.as_ref().map(|_| "<redacted>"),
        }
    }
}

#[derive(Serialize)]
struct ConfigView<'a> {
    defaults: &'a config::Defaults,
    vcenter: CredentialView,
    esxi: CredentialView,
}

fn render(cfg: &Config) -> Result<String, CliError> {
    let view = ConfigView {
        defaults: &cfg.defaults,
        vcenter: CredentialView::new(&cfg.vcenter),
        esxi: CredentialView::new(&cfg.esxi),
    };
    toml::to_string_pretty(&view).map_err(|e| CliError::Validation {
        field: "config".into(),
        reason: format!("failed to serialize config: {e}"),
    })
}

pub fn handle(args: ConfigArgs, cfg: &Config) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => {
            println!("# {}", config::config_path().display());
            print!("{}", render(cfg)?);
            Ok(())
        }

        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }

        ConfigCommand::SetPassword { target } => set_password(target),
    }
}

fn set_password(target: CredentialTarget) -> Result<(), CliError> {
    let password = rpassword::prompt_password(format!("{} password: ", target.name())).map_err(|e| {
        CliError::Validation {
            field: "password".into(),
            reason: format!("prompt failed: {e}"),
        }
    })?;
    if password.is_empty() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "password cannot be empty".into(),
        });
    }

    config::keyring_entry(target)?
        .set_password(&password)
        .map_err(|e| CliError::Keyring {
            reason: format!("failed to store password: {e}"),
        })?;
    eprintln!(
        "Password stored in the system keyring (service 'hostnet', account '{}')",
        target.keyring_account()
    );
    Ok(())
}
