//! Command handlers. Each takes parsed args plus the shared context and
//! returns a `CliError` on failure.

pub mod config_cmd;
pub mod history;
pub mod replicate;
pub mod set_vlan;
pub mod util;

use hostnet_core::RunReport;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::config::Config;
use crate::error::CliError;
use crate::output;

/// Settings every run command needs, resolved once.
pub struct Context<'a> {
    pub global: &'a GlobalOpts,
    pub config: &'a Config,
    pub format: OutputFormat,
    pub color: bool,
}

/// Print the reports and turn skipped or failed hosts into a non-zero exit.
pub fn finish(ctx: &Context<'_>, reports: &[RunReport]) -> Result<(), CliError> {
    print_reports(ctx, reports)?;

    let total = reports.iter().map(|r| r.hosts.len()).sum();
    let problems = reports.iter().map(RunReport::problem_count).sum();
    if problems > 0 {
        return Err(CliError::Incomplete { problems, total });
    }
    Ok(())
}

/// Render the reports to stdout, with the summary line on stderr in table
/// mode.
pub fn print_reports(ctx: &Context<'_>, reports: &[RunReport]) -> Result<(), CliError> {
    let rendered = output::render_reports(ctx.format, reports)?;
    output::print_output(&rendered, ctx.global.quiet);
    if ctx.format == OutputFormat::Table && !ctx.global.quiet {
        eprintln!("{}", output::summary(reports, ctx.color));
    }
    Ok(())
}
