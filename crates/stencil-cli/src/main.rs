//! # Stencil CLI
//!
//! Generates one scaffold directory per repository from shared template
//! groups.
//!
//! ## Startup sequence
//!
//! 1. Load `.env` and capture [`BuildInfo`].
//! 2. Parse CLI arguments (clap handles `--help` / `--version` early-exit).
//! 3. Initialise the tracing subscriber (logging).
//! 4. Load tool settings (defaults + file + env).
//! 5. Build the [`OutputManager`] and dispatch to the command handler.
//! 6. Translate any [`CliError`] into a user-facing message and exit code.
//!
//! ## Exit codes
//!
//! | Code | Meaning                                      |
//! |------|----------------------------------------------|
//! |  0   | Success                                      |
//! |  1   | Internal error, or some repositories failed  |
//! |  2   | User / input error (including validation)    |
//! |  3   | Resource not found                           |
//! |  4   | Configuration error                          |

use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, info, instrument};

use crate::{
    build_info::BuildInfo,
    cli::{Cli, Commands},
    config::AppSettings,
    error::{CliError, CliResult},
    logging::init_logging,
    output::OutputManager,
};

mod build_info;
mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod output;
mod progress;

fn main() -> ExitCode {
    // A missing .env is the normal case.
    let _ = dotenvy::dotenv();
    let build = BuildInfo::capture();

    // ── 1. Parse arguments ────────────────────────────────────────────────
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version arrive here too and go to stdout.
            let code = if e.use_stderr() { 2 } else { 0 };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    // ── 2. Initialise tracing ─────────────────────────────────────────────
    let _log_guard = match init_logging(&cli.global) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialise logging: {e:#}");
            return ExitCode::from(1);
        }
    };

    debug!(
        version = build.version,
        verbose = cli.global.verbose,
        quiet = cli.global.quiet,
        "CLI started"
    );

    // ── 3. Load settings ──────────────────────────────────────────────────
    let settings = match AppSettings::load(cli.global.settings.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("Failed to load settings: {e:#}");
            eprintln!("Failed to load settings: {e:#}");
            return ExitCode::from(4);
        }
    };

    // ── 4. Dispatch + 5. Error handling ───────────────────────────────────
    let verbose = cli.global.verbose > 0;
    let output = OutputManager::new(&cli.global, &settings);

    match run(cli, settings, &build, output) {
        Ok(()) => {
            info!(elapsed_ms = build.elapsed().as_millis() as u64, "Stencil completed successfully");
            ExitCode::SUCCESS
        }
        Err(e) => handle_error(e, verbose),
    }
}

/// Dispatch to the correct command handler.
#[instrument(skip_all)]
fn run(cli: Cli, settings: AppSettings, build: &BuildInfo, output: OutputManager) -> CliResult<()> {
    match cli.command {
        Commands::Generate(args) => commands::generate::execute(args, settings, build, output),
        Commands::Validate(args) => commands::validate::execute(args, settings, output),
        Commands::List(args) => commands::list::execute(args, settings, output),
        Commands::Settings(cmd) => {
            commands::settings::execute(cmd, cli.global.settings.as_deref(), settings, output)
        }
        Commands::Version => commands::version::execute(build, output),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}

/// Translate a `CliError` into a user message and an exit code.
fn handle_error(err: CliError, verbose: bool) -> ExitCode {
    err.log();

    let msg = if std::io::IsTerminal::is_terminal(&std::io::stderr()) {
        err.format_colored(verbose)
    } else {
        err.format_plain(verbose)
    };
    eprint!("{msg}");

    ExitCode::from(err.exit_code())
}

// ── tests ─────────────────────────────────────────────────────────────────────
