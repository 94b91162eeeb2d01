//! notag CLI tool.
//!
//! Usage:
//! ```bash
//! notag check [OPTIONS] [PATH]
//! notag init
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use notag_core::{MatchPolicy, ReportMode};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

/// Flags struct fields whose tags use denied keys
#[derive(Parser)]
#[command(name = "notag")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check Go packages for denied struct tags
    Check(CheckArgs),

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Arguments of `notag check`. Rule flags are merged on top of the config file.
#[derive(clap::Args, Debug, Default)]
pub struct CheckArgs {
    /// Path to analyze (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Comma-separated tags denied in every package (replaces the config list)
    #[arg(long, value_name = "TAGS")]
    pub denied: Option<String>,

    /// Tags denied in a package name, `pkg:tag1,tag2` (repeatable)
    #[arg(long = "denied-pkg", value_name = "ENTRY")]
    pub denied_pkg: Vec<String>,

    /// Tags denied in an import path, `path:tag1,tag2` (repeatable)
    #[arg(long = "denied-pkg-path", value_name = "ENTRY")]
    pub denied_pkg_path: Vec<String>,

    /// How denied keys are matched against tags
    #[arg(long = "match")]
    pub match_policy: Option<MatchArg>,

    /// Which offending fields of a struct are reported
    #[arg(long)]
    pub report: Option<ReportArg>,

    /// Exclude patterns (can be specified multiple times)
    #[arg(short, long)]
    pub exclude: Vec<String>,

    /// Skip `_test.go` files
    #[arg(long)]
    pub no_tests: bool,
}

/// Output format for lint results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One line per violation, `file:line:col: message`.
    Compact,
    /// Graphical report with source snippets.
    Fancy,
}

/// `--match` values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum MatchArg {
    /// Raw tag text contains the denied key.
    Substring,
    /// Denied key is one of the parsed tag keys.
    Exact,
}

impl From<MatchArg> for MatchPolicy {
    fn from(arg: MatchArg) -> Self {
        match arg {
            MatchArg::Substring => Self::Substring,
            MatchArg::Exact => Self::Exact,
        }
    }
}

/// `--report` values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportArg {
    /// First offending field per struct.
    First,
    /// Every offending field.
    All,
}

impl From<ReportArg> for ReportMode {
    fn from(arg: ReportArg) -> Self {
        match arg {
            ReportArg::First => Self::First,
            ReportArg::All => Self::All,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check(args) => {
            let source = config_resolver::resolve(&args.path, cli.config.as_deref());
            let failed = commands::check::run(&args, &source)?;
            if failed {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Init { force } => commands::init::run(force),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_check_flags() {
        let cli = Cli::try_parse_from([
            "notag",
            "-v",
            "check",
            "./svc",
            "--denied",
            "json,xml",
            "--denied-pkg",
            "models:db",
            "--denied-pkg",
            "store:yaml",
            "--match",
            "exact",
            "--report",
            "all",
            "--format",
            "compact",
            "--no-tests",
        ])
        .unwrap();

        assert!(cli.verbose);
        let Commands::Check(args) = cli.command else {
            panic!("expected check");
        };
        assert_eq!(args.path, PathBuf::from("./svc"));
        assert_eq!(args.denied.as_deref(), Some("json,xml"));
        assert_eq!(args.denied_pkg, ["models:db", "store:yaml"]);
        assert_eq!(args.match_policy, Some(MatchArg::Exact));
        assert_eq!(args.report, Some(ReportArg::All));
        assert_eq!(args.format, OutputFormat::Compact);
        assert!(args.no_tests);
    }

    #[test]
    fn check_defaults() {
        let cli = Cli::try_parse_from(["notag", "check"]).unwrap();
        let Commands::Check(args) = cli.command else {
            panic!("expected check");
        };
        assert_eq!(args.path, PathBuf::from("."));
        assert_eq!(args.format, OutputFormat::Text);
        assert!(args.denied.is_none());
        assert!(!args.no_tests);
    }
}
