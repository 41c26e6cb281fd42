//! Shared helpers for command handlers.

use std::io::{self, IsTerminal};

use dialoguer::{Confirm, Input};
use tracing::warn;

use hostnet_core::Confirmer;

use crate::error::CliError;

/// Whether stdin and stderr are attached to a terminal.
pub fn is_interactive() -> bool {
    io::stdin().is_terminal() && io::stderr().is_terminal()
}

/// Prompt for a required value that was not given on the command line.
pub fn prompt_text(prompt: &str, field: &str) -> Result<String, CliError> {
    if !is_interactive() {
        return Err(CliError::Validation {
            field: field.into(),
            reason: "missing, and stdin is not a terminal to prompt on".into(),
        });
    }
    let value: String = Input::new()
        .with_prompt(prompt)
        .interact_text()
        .map_err(|e| CliError::Validation {
            field: field.into(),
            reason: format!("prompt failed: {e}"),
        })?;
    let value = value.trim().to_owned();
    if value.is_empty() {
        return Err(CliError::Validation {
            field: field.into(),
            reason: "cannot be empty".into(),
        });
    }
    Ok(value)
}

/// Like [`prompt_text`], but an empty answer is allowed and yields `None`.
pub fn prompt_optional(prompt: &str, field: &str) -> Result<Option<String>, CliError> {
    if !is_interactive() {
        return Ok(None);
    }
    let value: String = Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()
        .map_err(|e| CliError::Validation {
            field: field.into(),
            reason: format!("prompt failed: {e}"),
        })?;
    let value = value.trim();
    Ok((!value.is_empty()).then(|| value.to_owned()))
}

/// Split a comma-separated answer into trimmed, non-empty names.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Terminal confirmations. Anything but an explicit "yes" is a decline,
/// including a prompt that cannot be shown.
pub struct TerminalConfirmer;

impl Confirmer for TerminalConfirmer {
    fn confirm(&mut self, prompt: &str) -> bool {
        if !is_interactive() {
            warn!("cannot ask for confirmation without a terminal");
            return false;
        }
        Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .unwrap_or_else(|e| {
                warn!("confirmation prompt failed: {e}");
                false
            })
    }
}
