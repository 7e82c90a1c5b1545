//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "stencil",
    bin_name = "stencil",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Generate per-repository scaffolds from shared template groups",
    long_about = "Stencil reads a declarative configuration of template groups and \
                  repositories and writes one output directory per repository, \
                  processing several repositories in parallel.",
    after_help = "EXAMPLES:\n\
        \x20 stencil generate -c stencil.yaml\n\
        \x20 stencil generate -c stencil.yaml -o out -t templates -p 8\n\
        \x20 stencil generate -c stencil.yaml --repo svc-a\n\
        \x20 stencil validate -c stencil.yaml\n\
        \x20 stencil completions bash > /usr/share/bash-completion/completions/stencil",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate output directories for every repository.
    #[command(
        visible_alias = "gen",
        about = "Generate repository scaffolds",
        after_help = "EXAMPLES:\n\
            \x20 stencil generate -c stencil.yaml\n\
            \x20 stencil generate -c stencil.yaml --repo svc-a\n\
            \x20 stencil generate -c stencil.yaml --max-parallel 1"
    )]
    Generate(GenerateArgs),

    /// Check a configuration without writing anything.
    #[command(
        about = "Validate a scaffold configuration",
        after_help = "EXAMPLES:\n\
            \x20 stencil validate -c stencil.yaml\n\
            \x20 stencil validate -c stencil.toml -t ./templates"
    )]
    Validate(ValidateArgs),

    /// List repositories and template groups.
    #[command(
        visible_alias = "ls",
        about = "List repositories and template groups",
        after_help = "EXAMPLES:\n\
            \x20 stencil list -c stencil.yaml\n\
            \x20 stencil list -c stencil.yaml --format json"
    )]
    List(ListArgs),

    /// Inspect the tool's own settings.
    #[command(
        about = "Settings management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 stencil settings show\n\
            \x20 stencil settings path"
    )]
    Settings(SettingsCommands),

    /// Print build information.
    #[command(about = "Show build information")]
    Version,

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 stencil completions bash > ~/.local/share/bash-completion/completions/stencil\n\
            \x20 stencil completions zsh  > ~/.zfunc/_stencil\n\
            \x20 stencil completions fish > ~/.config/fish/completions/stencil.fish"
    )]
    Completions(CompletionsArgs),
}

// ── generate ──────────────────────────────────────────────────────────────────

/// Arguments for `stencil generate`.
#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Scaffold configuration file.
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Scaffold configuration file (YAML, TOML or JSON)"
    )]
    pub config: PathBuf,

    /// Output root; one directory per repository is created inside it.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "DIR",
        help = "Output directory [default: out]"
    )]
    pub output: Option<PathBuf>,

    /// Directory `sourceFile` paths are relative to.
    #[arg(
        short = 't',
        long = "templates",
        value_name = "DIR",
        help = "Templates directory [default: templates]"
    )]
    pub templates: Option<PathBuf>,

    /// Only generate this repository.
    #[arg(
        short = 'r',
        long = "repo",
        value_name = "NAME",
        help = "Generate a single repository"
    )]
    pub repo: Option<String>,

    /// Maximum number of repositories processed at once.
    #[arg(
        short = 'p',
        long = "max-parallel",
        value_name = "N",
        help = "Maximum repositories processed in parallel [default: 5]"
    )]
    pub max_parallel: Option<usize>,

    /// HTTP timeout for `sourceUrl` files.
    #[arg(
        long = "fetch-timeout",
        value_name = "SECS",
        help = "Timeout for remote sources in seconds [default: 30]"
    )]
    pub fetch_timeout: Option<u64>,
}

// ── validate ──────────────────────────────────────────────────────────────────

/// Arguments for `stencil validate`.
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Scaffold configuration file.
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: PathBuf,

    /// Directory `sourceFile` paths are relative to.
    #[arg(short = 't', long = "templates", value_name = "DIR")]
    pub templates: Option<PathBuf>,
}

// ── list ──────────────────────────────────────────────────────────────────────

/// Arguments for `stencil list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Scaffold configuration file.
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: PathBuf,

    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

/// Output format for the `list` command.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One repository name per line.
    List,
    /// JSON document.
    Json,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `stencil completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── settings subcommands ──────────────────────────────────────────────────────

/// Subcommands for `stencil settings`.
#[derive(Debug, Subcommand)]
pub enum SettingsCommands {
    /// Print the resolved settings as TOML.
    Show,
    /// Print the path of the settings file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_generate_with_defaults() {
        let cli = Cli::parse_from(["stencil", "generate", "-c", "stencil.yaml"]);
        let Commands::Generate(args) = cli.command else {
            panic!("expected Generate command");
        };
        assert_eq!(args.config, PathBuf::from("stencil.yaml"));
        assert!(args.output.is_none());
        assert!(args.max_parallel.is_none());
    }

    #[test]
    fn parse_generate_short_flags() {
        let cli = Cli::parse_from([
            "stencil", "gen", "-c", "c.yml", "-o", "dist", "-t", "tpl", "-r", "svc-a", "-p",
            "2",
        ]);
        let Commands::Generate(args) = cli.command else {
            panic!("expected Generate command");
        };
        assert_eq!(args.output, Some(PathBuf::from("dist")));
        assert_eq!(args.templates, Some(PathBuf::from("tpl")));
        assert_eq!(args.repo.as_deref(), Some("svc-a"));
        assert_eq!(args.max_parallel, Some(2));
    }

    #[test]
    fn generate_requires_config() {
        assert!(Cli::try_parse_from(["stencil", "generate"]).is_err());
    }

    #[test]
    fn max_parallel_must_be_a_number() {
        assert!(Cli::try_parse_from(["stencil", "generate", "-c", "x", "-p", "many"]).is_err());
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["stencil", "--quiet", "--verbose", "version"]);
        assert!(result.is_err());
    }

    #[test]
    fn global_flags_work_after_subcommand() {
        let cli = Cli::parse_from(["stencil", "validate", "-c", "x.yaml", "-vv", "--no-color"]);
        assert_eq!(cli.global.verbose, 2);
        assert!(cli.global.no_color);
    }
}
