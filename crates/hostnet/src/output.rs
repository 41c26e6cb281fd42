//! Output formatting: table, JSON, plain.
//!
//! Renders run reports in the format selected by `--output`. Table uses
//! `tabled`, JSON uses serde, plain emits one `host status` line per host.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use hostnet_core::{HostStatus, RunReport};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
    }
}

fn paint(status: HostStatus, text: &str, color: bool) -> String {
    if !color {
        return text.to_owned();
    }
    match status {
        HostStatus::Completed => text.green().to_string(),
        HostStatus::Planned => text.cyan().to_string(),
        HostStatus::Skipped => text.yellow().to_string(),
        HostStatus::Failed => text.red().bold().to_string(),
    }
}

// ── Report rendering ─────────────────────────────────────────────────

#[derive(Tabled)]
struct ReportRow {
    #[tabled(rename = "Server")]
    server: String,
    #[tabled(rename = "Host")]
    host: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Changes")]
    changes: String,
    #[tabled(rename = "Error")]
    error: String,
}

fn rows(reports: &[RunReport]) -> Vec<ReportRow> {
    reports
        .iter()
        .flat_map(|report| {
            let server = report.server.clone().unwrap_or_else(|| "-".into());
            report.hosts.iter().map(move |h| ReportRow {
                server: server.clone(),
                host: h.host.clone(),
                status: h.status.to_string(),
                changes: if h.actions.is_empty() {
                    "-".into()
                } else {
                    h.actions
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join("\n")
                },
                error: h.error.clone().unwrap_or_default(),
            })
        })
        .collect()
}

/// Render run reports in the chosen format.
pub fn render_reports(format: OutputFormat, reports: &[RunReport]) -> Result<String, CliError> {
    Ok(match format {
        OutputFormat::Table => {
            let rows = rows(reports);
            if rows.is_empty() {
                String::new()
            } else {
                render_table(&rows)
            }
        }
        OutputFormat::Json => serde_json::to_string_pretty(reports)?,
        OutputFormat::Plain => reports
            .iter()
            .flat_map(|r| r.hosts.iter())
            .map(|h| format!("{} {}", h.host, h.status))
            .collect::<Vec<_>>()
            .join("\n"),
    })
}

/// One-line tally, e.g. `3 host(s): 2 completed, 1 skipped`.
pub fn summary(reports: &[RunReport], color: bool) -> String {
    let statuses: Vec<HostStatus> = reports
        .iter()
        .flat_map(|r| r.hosts.iter().map(|h| h.status))
        .collect();

    let parts: Vec<String> = [
        HostStatus::Completed,
        HostStatus::Planned,
        HostStatus::Skipped,
        HostStatus::Failed,
    ]
    .into_iter()
    .filter_map(|status| {
        let count = statuses.iter().filter(|s| **s == status).count();
        (count > 0).then(|| paint(status, &format!("{count} {status}"), color))
    })
    .collect();

    if parts.is_empty() {
        "no hosts processed".into()
    } else {
        format!("{} host(s): {}", statuses.len(), parts.join(", "))
    }
}

/// Render a list of serde-serializable + tabled items in the chosen format.
pub fn render_list<T, R>(
    format: OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    plain_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
    R: Tabled,
{
    Ok(match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            render_table(&rows)
        }
        OutputFormat::Json => serde_json::to_string_pretty(data)?,
        OutputFormat::Plain => data.iter().map(plain_fn).collect::<Vec<_>>().join("\n"),
    })
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}
