mod cli;
mod commands;
mod config;
mod error;
mod output;

use std::path::Path;

use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Command, GlobalOpts};
use crate::commands::Context;
use crate::config::Config;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // The log directory may come from the config file, so load it before
    // tracing is up and report a broken file afterwards.
    let config = config::load_config();
    let log_dir = match &config {
        Ok(cfg) => config::log_dir(&cli.global, cfg),
        Err(_) => config::log_dir(&cli.global, &Config::default()),
    };

    // Held until exit so buffered log lines reach the file.
    let log_guard = init_tracing(&cli.global, &log_dir);
    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "hostnet starting");

    let result = match config {
        Ok(cfg) => run(cli, &cfg).await,
        Err(e) => Err(e),
    };

    if let Err(err) = result {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        drop(log_guard);
        std::process::exit(code);
    }
}

fn console_level(global: &GlobalOpts) -> &'static str {
    if global.debug {
        return "trace";
    }
    match global.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Console logging on stderr, plus a plain-text file named after the run
/// start time when `--log` or `--log-dir` is given.
fn init_tracing(global: &GlobalOpts, log_dir: &Path) -> Option<WorkerGuard> {
    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(console_level(global)));
    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(console_filter);

    let mut guard = None;
    let file = if global.log || global.log_dir.is_some() {
        match std::fs::create_dir_all(log_dir) {
            Ok(()) => {
                let name = format!("hostnet-{}.log", chrono::Local::now().format("%Y%m%d-%H%M%S"));
                let appender = tracing_appender::rolling::never(log_dir, &name);
                let (writer, file_guard) = tracing_appender::non_blocking(appender);
                guard = Some(file_guard);
                eprintln!("Logging to {}", log_dir.join(&name).display());

                let level = if global.debug { "trace" } else { "info" };
                Some(
                    fmt::layer()
                        .with_writer(writer)
                        .with_ansi(false)
                        .with_target(true)
                        .with_filter(EnvFilter::new(level)),
                )
            }
            Err(e) => {
                eprintln!("Cannot create log directory {}: {e}", log_dir.display());
                None
            }
        }
    } else {
        None
    };

    tracing_subscriber::registry().with(console).with(file).init();
    guard
}

async fn run(cli: Cli, config: &Config) -> Result<(), CliError> {
    let format = config::output_format(&cli.global, config)?;
    let ctx = Context {
        global: &cli.global,
        config,
        format,
        color: output::should_color(cli.global.color),
    };

    match cli.command {
        Command::Replicate(args) => commands::replicate::handle(args, &ctx).await,
        Command::SetVlan(args) => commands::set_vlan::handle(args, &ctx).await,
        Command::History => commands::history::handle(format, cli.global.quiet),
        Command::Config(args) => commands::config_cmd::handle(args, config),
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "hostnet", &mut std::io::stdout());
            Ok(())
        }
    }
}
