//! Command routing.
//!
//! Maps a command name onto the pipeline runner or one of the project
//! collaborators (clean, watch, create, deploy). Unknown names are logged
//! and turned into an exit code; nothing here panics on bad input.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::{EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};
use crate::build::{BuildContext, PipelineError, PipelineRunner, RunResult, TaskExecutor};
use crate::config::{
    default_config, dir_name, find_config_from, load_config, merge_cli_overrides, project_root,
    CliOverrides, ConfigError, PipelineKind,
};
use crate::deploy::{deploy, DeployError};
use crate::scaffold::{scaffold, ScaffoldAnswers, ScaffoldError};
use crate::tasks::Tasks;
use crate::watch::{watch, WatchError};

/// Top-level commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Build,
    Test,
    Distribute,
    Clean,
    Publish,
    Watch,
    Create,
    Deploy,
}

impl Command {
    pub const ALL: [Command; 8] = [
        Command::Build,
        Command::Clean,
        Command::Create,
        Command::Deploy,
        Command::Distribute,
        Command::Publish,
        Command::Test,
        Command::Watch,
    ];

    /// Parse a command name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Build => "build",
            Command::Test => "test",
            Command::Distribute => "distribute",
            Command::Clean => "clean",
            Command::Publish => "publish",
            Command::Watch => "watch",
            Command::Create => "create",
            Command::Deploy => "deploy",
        }
    }

    /// The pipeline a command runs directly, if any.
    pub fn pipeline_kind(&self) -> Option<PipelineKind> {
        match self {
            Command::Build => Some(PipelineKind::Build),
            Command::Test => Some(PipelineKind::Test),
            Command::Distribute => Some(PipelineKind::Distribute),
            _ => None,
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error from routing a command.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RouteError {
    #[error("Unrecognized command '{0}'")]
    UnrecognizedCommand(String),
    #[error("Unrecognized pipeline '{0}' (expected build, test or distribute)")]
    UnrecognizedPipeline(String),
    #[error("'{command}' needs a {argument}")]
    MissingArgument { command: Command, argument: &'static str },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error(transparent)]
    Watch(#[from] WatchError),
    #[error(transparent)]
    Scaffold(#[from] ScaffoldError),
    #[error(transparent)]
    Deploy(#[from] DeployError),
    #[error("Failed to remove {}: {source}", path.display())]
    Clean {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Routes commands for one invocation.
#[derive(Debug, Clone)]
pub struct CommandRouter {
    /// Directory the command was started from
    working_dir: PathBuf,
    /// Explicit config file, relative to `working_dir` unless absolute
    config_path: Option<PathBuf>,
    overrides: CliOverrides,
    dry_run: bool,
    jobs: usize,
    answers: ScaffoldAnswers,
}

impl CommandRouter {
    pub fn new(working_dir: PathBuf) -> Self {
        Self {
            working_dir,
            config_path: None,
            overrides: CliOverrides::default(),
            dry_run: false,
            jobs: 1,
            answers: ScaffoldAnswers::default(),
        }
    }

    pub fn with_config_path(mut self, config_path: Option<PathBuf>) -> Self {
        self.config_path = config_path;
        self
    }

    pub fn with_overrides(mut self, overrides: CliOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    pub fn with_answers(mut self, answers: ScaffoldAnswers) -> Self {
        self.answers = answers;
        self
    }

    /// Load the configuration and build the run context.
    ///
    /// The project root is the directory holding `warhorse.toml`. Without a
    /// config file the built-in defaults are used, rooted at the working
    /// directory and named after it.
    pub fn load_context(&self) -> Result<BuildContext, RouteError> {
        let config_path = match &self.config_path {
            Some(path) => Some(self.working_dir.join(path)),
            None => find_config_from(self.working_dir.clone()),
        };

        let (mut config, root) = match config_path {
            Some(path) => {
                let config = load_config(Some(&path))?;
                let root = project_root(&path)
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| self.working_dir.clone());
                (config, root)
            }
            None => {
                let mut config = default_config();
                if let Some(name) = dir_name(&self.working_dir) {
                    config.project.name = name;
                }
                (config, self.working_dir.clone())
            }
        };

        merge_cli_overrides(&mut config, &self.overrides);
        tracing::debug!("project root: {}", root.display());

        Ok(BuildContext::new(config, root)
            .with_dry_run(self.dry_run)
            .with_jobs(self.jobs))
    }

    /// Route a command with the real task table.
    pub fn route(&self, command: &str, target: Option<&str>) -> Result<Option<RunResult>, RouteError> {
        self.route_with(command, target, |ctx| Box::new(Tasks::from_context(ctx)))
    }

    /// Route a command, building the executor with `make_executor`.
    ///
    /// Returns the run result for pipeline commands and `None` for the rest.
    pub fn route_with<F>(
        &self,
        command: &str,
        target: Option<&str>,
        make_executor: F,
    ) -> Result<Option<RunResult>, RouteError>
    where
        F: Fn(&BuildContext) -> Box<dyn TaskExecutor>,
    {
        let command = Command::from_name(command)
            .ok_or_else(|| RouteError::UnrecognizedCommand(command.to_string()))?;
        tracing::debug!("command: {} {}", command, target.unwrap_or(""));

        match command {
            Command::Build | Command::Test | Command::Distribute => {
                let ctx = self.load_context()?;
                let executor = make_executor(&ctx);
                let kind = command.pipeline_kind().unwrap_or(PipelineKind::Build);
                let result = PipelineRunner::new(&ctx, executor.as_ref()).run(kind, target)?;
                Ok(Some(result))
            }
            Command::Publish => {
                let ctx = self.load_context()?;
                let executor = make_executor(&ctx);
                let result = PipelineRunner::new(&ctx, executor.as_ref()).run_publish()?;
                Ok(Some(result))
            }
            Command::Clean => {
                let ctx = self.load_context()?;
                clean(&ctx)?;
                Ok(None)
            }
            Command::Watch => {
                let kind = match target {
                    Some(name) => PipelineKind::from_name(name)
                        .ok_or_else(|| RouteError::UnrecognizedPipeline(name.to_string()))?,
                    None => PipelineKind::Build,
                };
                let ctx = self.load_context()?;
                let executor = make_executor(&ctx);
                watch(&ctx, kind, executor.as_ref())?;
                Ok(None)
            }
            Command::Create => {
                let convention = target.unwrap_or("web");
                let mut answers = self.answers.clone();
                if answers.name.is_empty() {
                    answers.name = dir_name(&self.working_dir).unwrap_or_default();
                }
                scaffold(&self.working_dir, convention, &answers)?;
                Ok(None)
            }
            Command::Deploy => {
                let target = target.ok_or(RouteError::MissingArgument {
                    command,
                    argument: "deployment target (travis, github or netlify)",
                })?;
                let ctx = self.load_context()?;
                deploy(ctx.project_root(), target)?;
                Ok(None)
            }
        }
    }

    /// Route a command and turn the outcome into an exit code.
    pub fn run(&self, command: &str, target: Option<&str>) -> u8 {
        self.finish(self.route(command, target))
    }

    /// Like [`run`](Self::run), with a custom executor.
    pub fn run_with<F>(&self, command: &str, target: Option<&str>, make_executor: F) -> u8
    where
        F: Fn(&BuildContext) -> Box<dyn TaskExecutor>,
    {
        self.finish(self.route_with(command, target, make_executor))
    }

    fn finish(&self, outcome: Result<Option<RunResult>, RouteError>) -> u8 {
        match outcome {
            Ok(Some(result)) => {
                println!("{}", result.summary());
                if result.is_success() {
                    EXIT_SUCCESS
                } else {
                    EXIT_ERROR
                }
            }
            Ok(None) => EXIT_SUCCESS,
            Err(e @ RouteError::MissingArgument { .. }) => {
                tracing::error!("{}", e);
                EXIT_INVALID_ARGS
            }
            Err(e) => {
                tracing::error!("{}", e);
                EXIT_ERROR
            }
        }
    }
}

/// Remove the build and dist directories. Missing ones are fine.
pub fn clean(ctx: &BuildContext) -> Result<(), RouteError> {
    for dir in [ctx.build_dir(), ctx.dist_dir()] {
        if ctx.is_dry_run() {
            tracing::info!("[dry run] rm -r {}", dir.display());
            continue;
        }
        match fs::remove_dir_all(&dir) {
            Ok(()) => tracing::info!("Removed {}", dir.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(source) => return Err(RouteError::Clean { path: dir, source }),
        }
    }
    Ok(())
}
