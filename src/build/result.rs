//! Run result types.
//!
//! Contains types for representing the outcome of task invocations.

use std::path::PathBuf;
use std::time::Duration;

use crate::build::Dispatch;

/// Status of a single task-method invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskStatus {
    /// The tool ran and exited zero
    Success,
    /// Nothing was run (e.g. dry run)
    Skipped,
    /// The tool ran but failed; the run continues
    ToolFailed(String),
}

impl TaskStatus {
    /// Check if the status indicates failure.
    pub fn is_failure(&self) -> bool {
        matches!(self, TaskStatus::ToolFailed(_))
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::Success => write!(f, "success"),
            TaskStatus::Skipped => write!(f, "skipped"),
            TaskStatus::ToolFailed(err) => write!(f, "failed: {}", err),
        }
    }
}

/// Result of one task-method invocation.
#[derive(Debug, Clone)]
pub struct TaskResult {
    /// Task id that was run
    pub task_id: String,
    /// Source file (or source root when not expanded)
    pub source: PathBuf,
    /// Destination file (or root), if the task has one
    pub destination: Option<PathBuf>,
    /// Outcome
    pub status: TaskStatus,
    /// Wall time of the invocation
    pub duration: Duration,
}

impl TaskResult {
    /// Create a result.
    pub fn new(
        task_id: impl Into<String>,
        source: PathBuf,
        destination: Option<PathBuf>,
        status: TaskStatus,
        duration: Duration,
    ) -> Self {
        Self { task_id: task_id.into(), source, destination, status, duration }
    }
}

/// Result of a complete command run.
#[derive(Debug, Default)]
pub struct RunResult {
    /// Results for each invocation, in execution order
    pub tasks: Vec<TaskResult>,
    /// Things worth a look that did not fail the run (e.g. a glob that
    /// matched nothing)
    pub warnings: Vec<String>,
    /// Total run duration
    pub total_duration: Duration,
}

impl RunResult {
    /// Create a new empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one descriptor's dispatch, keeping its order.
    pub fn absorb(&mut self, dispatch: Dispatch) {
        self.tasks.extend(dispatch.results);
        self.warnings.extend(dispatch.warnings);
    }

    /// Set the total duration.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.total_duration = duration;
        self
    }

    pub fn success_count(&self) -> usize {
        self.tasks.iter().filter(|r| matches!(r.status, TaskStatus::Success)).count()
    }

    pub fn skipped_count(&self) -> usize {
        self.tasks.iter().filter(|r| matches!(r.status, TaskStatus::Skipped)).count()
    }

    pub fn failed_count(&self) -> usize {
        self.tasks.iter().filter(|r| r.status.is_failure()).count()
    }

    /// Check if every tool ran cleanly.
    pub fn is_success(&self) -> bool {
        self.failed_count() == 0
    }

    /// Get failed task results.
    pub fn failures(&self) -> Vec<&TaskResult> {
        self.tasks.iter().filter(|r| r.status.is_failure()).collect()
    }

    /// Format a summary of the run.
    pub fn summary(&self) -> String {
        let mut lines = Vec::new();

        let success = self.success_count();
        let skipped = self.skipped_count();
        let failed = self.failed_count();
        let total = self.tasks.len();

        if total == 0 {
            lines.push("Nothing to do".to_string());
        } else if failed > 0 {
            lines.push(format!(
                "Finished with failures: {} succeeded, {} skipped, {} failed ({} total)",
                success, skipped, failed, total
            ));
            for task in self.failures() {
                lines.push(format!("  - {} ({}): {}", task.task_id, task.source.display(), task.status));
            }
        } else {
            lines.push(format!(
                "Finished: {} succeeded, {} skipped ({} total) in {:?}",
                success, skipped, total, self.total_duration
            ));
        }

        let warnings = &self.warnings;
        if !warnings.is_empty() {
            lines.push(format!("Warnings ({}):", warnings.len()));
            for warning in warnings.iter().take(5) {
                lines.push(format!("  - {}", warning));
            }
            if warnings.len() > 5 {
                lines.push(format!("  ... and {} more", warnings.len() - 5));
            }
        }

        lines.join("\n")
    }
}
