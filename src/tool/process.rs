//! Child process execution.
//!
//! [`ToolRunner`] is the seam between the task engine and the operating
//! system. [`ProcessRunner`] spawns real processes; tests substitute a
//! recording runner.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::tool::CommandLine;

/// How the child's standard streams are wired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StdioMode {
    /// Child writes straight to our terminal; nothing is captured
    #[default]
    Inherit,
    /// Child output is captured
    Pipe,
}

/// A fully resolved process to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// The compiled command line
    pub command: CommandLine,
    /// Absolute working directory
    pub working_dir: PathBuf,
    /// Stream wiring
    pub stdio: StdioMode,
    /// Whether the child sees our environment (PATH is always passed)
    pub inherit_env: bool,
}

/// Captured result of running a tool.
///
/// A non-zero exit is not an error: linters exit non-zero to say "issues
/// found", so callers get the output either way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
    /// Exit code; `None` if the process could not be started or was killed
    pub status: Option<i32>,
}

impl ToolOutput {
    /// Whether the tool ran and exited zero.
    pub fn is_success(&self) -> bool {
        self.status == Some(0)
    }

    /// Output for a process that never started.
    pub fn spawn_failure(message: impl Into<String>) -> Self {
        Self { stdout: String::new(), stderr: message.into(), status: None }
    }
}

/// Runs invocations.
pub trait ToolRunner: Send + Sync {
    /// Run to completion. Must not fail; failures are reported in the output.
    fn run(&self, invocation: &Invocation) -> ToolOutput;
}

/// Runs invocations as real child processes, blocking until they exit.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

impl ToolRunner for ProcessRunner {
    fn run(&self, invocation: &Invocation) -> ToolOutput {
        let mut command = Command::new(&invocation.command.program);
        command.args(&invocation.command.args).current_dir(&invocation.working_dir);

        if !invocation.inherit_env {
            command.env_clear();
            if let Some(path) = std::env::var_os("PATH") {
                command.env("PATH", path);
            }
        }

        let result = match invocation.stdio {
            StdioMode::Pipe => command.stdin(Stdio::null()).output(),
            StdioMode::Inherit => command
                .stdin(Stdio::inherit())
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit())
                .status()
                .map(|status| std::process::Output { status, stdout: vec![], stderr: vec![] }),
        };

        match result {
            Ok(output) => ToolOutput {
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                status: output.status.code(),
            },
            Err(e) => ToolOutput::spawn_failure(format!(
                "failed to run {}: {}",
                invocation.command.program, e
            )),
        }
    }
}
