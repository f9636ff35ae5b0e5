//! Command-line interface implementation
//!
//! Parses arguments, sets up logging and hands the command to the
//! [`CommandRouter`]. The command and type are taken as free strings so the
//! router applies the vocabulary and reports unknown names itself.

pub mod router;

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

pub use router::{Command, CommandRouter, RouteError};

use crate::config::CliOverrides;
use crate::scaffold::ScaffoldAnswers;

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// Warhorse - run build, test and distribution pipelines for web projects
#[derive(Parser, Debug)]
#[command(name = "warhorse")]
#[command(about = "Warhorse - run build, test and distribution pipelines for web projects")]
pub struct Cli {
    /// Command: build, test, distribute, clean, publish, watch, create or deploy
    pub command: String,

    /// File type for build/test/distribute, convention for create, target for deploy
    pub target: Option<String>,

    /// Path to warhorse.toml (default: search upwards from the current directory)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Show command lines and debug output
    #[arg(short, long)]
    pub verbose: bool,

    /// Log the tool command lines without running them
    #[arg(long)]
    pub dry_run: bool,

    /// Parallel jobs for per-file tasks
    #[arg(short, long, default_value = "1", value_parser = clap::value_parser!(u16).range(1..))]
    pub jobs: u16,

    /// Override the tool installation root
    #[arg(long)]
    pub tools_root: Option<PathBuf>,

    /// Project name (create)
    #[arg(long)]
    pub name: Option<String>,

    /// Project version (create)
    #[arg(long = "version")]
    pub project_version: Option<String>,

    /// Project description (create)
    #[arg(long)]
    pub description: Option<String>,

    /// Project author (create)
    #[arg(long)]
    pub author: Option<String>,
}

impl Cli {
    /// Answers for the `create` command.
    pub fn answers(&self) -> ScaffoldAnswers {
        let mut answers = ScaffoldAnswers::default();
        if let Some(name) = &self.name {
            answers.name = name.clone();
        }
        if let Some(version) = &self.project_version {
            answers.version = version.clone();
        }
        if let Some(description) = &self.description {
            answers.description = description.clone();
        }
        if let Some(author) = &self.author {
            answers.author = author.clone();
        }
        answers
    }

    /// Build a router for the current directory from the parsed flags.
    pub fn router(&self) -> std::io::Result<CommandRouter> {
        let working_dir = std::env::current_dir()?;
        Ok(CommandRouter::new(working_dir)
            .with_config_path(self.config.clone())
            .with_overrides(CliOverrides { tools_root: self.tools_root.clone() })
            .with_dry_run(self.dry_run)
            .with_jobs(usize::from(self.jobs))
            .with_answers(self.answers()))
    }
}

/// Initialise the tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `info`, or `debug` when verbose.
pub fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = match std::env::var("RUST_LOG") {
        Ok(value) if !value.trim().is_empty() => EnvFilter::from_default_env(),
        _ => EnvFilter::new(level),
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(atty::is(atty::Stream::Stderr))
        .without_time()
        .with_target(false)
        .try_init();
}

/// Entry point for the CLI
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let router = match cli.router() {
        Ok(router) => router,
        Err(e) => {
            eprintln!("Error: cannot read the current directory: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    ExitCode::from(router.run(&cli.command, cli.target.as_deref()))
}
