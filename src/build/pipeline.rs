//! Pipeline orchestration.
//!
//! A pipeline kind (build, test, distribute) maps each file type to an
//! ordered task list. The runner walks those lists type by type, handing
//! each descriptor and its tool config to the dispatcher.

use std::time::Instant;
use thiserror::Error;

use crate::build::{BuildContext, RunResult, TaskDescriptor, TaskDispatcher, TaskError, TaskExecutor};
use crate::config::{FileType, PipelineKind, PUBLISH_TOOLS};

/// Error that stops a pipeline run.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PipelineError {
    /// The type filter names no known file type
    #[error("Unrecognized type '{0}'")]
    UnrecognizedType(String),
    /// A task could not be dispatched
    #[error(transparent)]
    Task(#[from] TaskError),
}

/// Runs pipelines from the context's configuration.
pub struct PipelineRunner<'a> {
    context: &'a BuildContext,
    executor: &'a dyn TaskExecutor,
}

impl<'a> PipelineRunner<'a> {
    /// Create a runner.
    pub fn new(context: &'a BuildContext, executor: &'a dyn TaskExecutor) -> Self {
        Self { context, executor }
    }

    /// Run a pipeline, optionally for a single type.
    ///
    /// Without a filter every declared type is run in declaration order,
    /// each type's list completing before the next starts. An error aborts the
    /// rest of the run; work already done is not rolled back.
    pub fn run(
        &self,
        kind: PipelineKind,
        type_filter: Option<&str>,
    ) -> Result<RunResult, PipelineError> {
        let types = match type_filter {
            Some(name) => {
                let file_type = FileType::from_name(name)
                    .ok_or_else(|| PipelineError::UnrecognizedType(name.to_string()))?;
                vec![file_type]
            }
            None => self.context.config().declared_types(kind),
        };

        let start = Instant::now();
        let mut result = RunResult::new();
        for file_type in types {
            let tasks = self.context.config().pipeline(kind, file_type);
            if tasks.is_empty() {
                continue;
            }
            tracing::debug!("{} pipeline: {} ({} tasks)", kind, file_type, tasks.len());
            self.run_tasks(kind.as_str(), tasks, &mut result)?;
        }

        Ok(result.with_duration(start.elapsed()))
    }

    /// Run one type's pipeline.
    pub fn run_type(&self, kind: PipelineKind, file_type: FileType) -> Result<RunResult, PipelineError> {
        self.run(kind, Some(file_type.as_str()))
    }

    /// Run the publish task list with the `publish` tool table.
    pub fn run_publish(&self) -> Result<RunResult, PipelineError> {
        let start = Instant::now();
        let mut result = RunResult::new();
        self.run_tasks(PUBLISH_TOOLS, &self.context.config().publish, &mut result)?;
        Ok(result.with_duration(start.elapsed()))
    }

    fn run_tasks(
        &self,
        kind: &str,
        tasks: &[TaskDescriptor],
        result: &mut RunResult,
    ) -> Result<(), TaskError> {
        let dispatcher = TaskDispatcher::new(self.executor, self.context.project_root())
            .with_jobs(self.context.jobs());

        for task in tasks {
            let tool = self.context.config().tool_config(kind, &task.id).ok_or_else(|| {
                TaskError::MissingToolConfig { kind: kind.to_string(), task_id: task.id.clone() }
            })?;
            result.absorb(dispatcher.dispatch(tool, task)?);
        }

        Ok(())
    }
}
