//! Task dispatch.
//!
//! The dispatcher turns one [`TaskDescriptor`] into task-method calls: a
//! single call for whole-directory work, or one call per matched file when
//! the tool config asks for glob expansion. What a method actually does is
//! behind the [`TaskExecutor`] seam.

use rayon::prelude::*;
use std::path::Path;
use std::time::Instant;

use crate::build::{
    discover_files, resolve_destination, ExpandedTask, TaskDescriptor, TaskError, TaskId,
    TaskInput, TaskMethod, TaskResult, TaskStatus,
};
use crate::config::ToolConfig;

/// Runs a task method against one input.
pub trait TaskExecutor: Send + Sync {
    /// Execute `method` for `task_type` (`js`, or `js:style` for subtyped ids).
    ///
    /// Tool failures come back as [`TaskStatus::ToolFailed`]; an `Err` means
    /// the task could not be run at all and aborts the pipeline.
    fn execute(
        &self,
        method: TaskMethod,
        task_type: &str,
        input: TaskInput<'_>,
        tool: &ToolConfig,
    ) -> Result<TaskStatus, TaskError>;
}

/// What dispatching one descriptor produced.
#[derive(Debug, Default)]
pub struct Dispatch {
    /// One result per task-method invocation, in glob order
    pub results: Vec<TaskResult>,
    /// Non-fatal problems, such as a glob that matched nothing
    pub warnings: Vec<String>,
}

impl Dispatch {
    fn of(results: Vec<TaskResult>) -> Self {
        Self { results, warnings: vec![] }
    }
}

/// Expands and dispatches task descriptors.
pub struct TaskDispatcher<'a> {
    executor: &'a dyn TaskExecutor,
    /// Relative descriptor roots resolve against this
    project_root: &'a Path,
    /// Worker count for expanded invocations
    jobs: usize,
}

impl<'a> TaskDispatcher<'a> {
    /// Create a sequential dispatcher.
    pub fn new(executor: &'a dyn TaskExecutor, project_root: &'a Path) -> Self {
        Self { executor, project_root, jobs: 1 }
    }

    /// Set the number of parallel jobs for expanded invocations.
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    /// Dispatch one descriptor under its tool config.
    pub fn dispatch(&self, tool: &ToolConfig, task: &TaskDescriptor) -> Result<Dispatch, TaskError> {
        let id = TaskId::parse(&task.id)?;
        let task = task.resolved_against(self.project_root);

        if !tool.silent {
            if tool.description.is_empty() {
                tracing::info!("Starting '{}'", id);
            } else {
                tracing::info!("Starting '{}' ({})", id, tool.description);
            }
        }
        let start = Instant::now();

        let dispatch = if tool.expand_globs {
            self.dispatch_expanded(&id, tool, &task)?
        } else {
            Dispatch::of(vec![self.invoke(&id, tool, TaskInput::Declared(&task))?])
        };

        if !tool.silent {
            tracing::info!("Finished '{}' after {:?}", id, start.elapsed());
        }

        Ok(dispatch)
    }

    fn dispatch_expanded(
        &self,
        id: &TaskId,
        tool: &ToolConfig,
        task: &TaskDescriptor,
    ) -> Result<Dispatch, TaskError> {
        let files = discover_files(task.src_root(), task.pattern())?;
        if files.is_empty() {
            let warning = format!(
                "'{}': no files matched {}",
                id,
                task.src_root().join(task.pattern()).display()
            );
            tracing::warn!("{}", warning);
            return Ok(Dispatch { results: vec![], warnings: vec![warning] });
        }

        let (dst_root, dst_ext) =
            task.dst.as_ref().ok_or_else(|| TaskError::MissingDestination(task.id.clone()))?;

        let expanded = files
            .into_iter()
            .map(|file| {
                let destination = resolve_destination(task.src_root(), &file, dst_root, dst_ext)?;
                Ok(task.expand(file, destination))
            })
            .collect::<Result<Vec<ExpandedTask>, TaskError>>()?;

        if self.jobs > 1 && expanded.len() > 1 {
            match rayon::ThreadPoolBuilder::new().num_threads(self.jobs).build() {
                Ok(pool) => {
                    return pool
                        .install(|| {
                            expanded
                                .par_iter()
                                .map(|e| self.invoke(id, tool, TaskInput::Expanded(e)))
                                .collect::<Result<Vec<_>, _>>()
                        })
                        .map(Dispatch::of);
                }
                Err(e) => tracing::warn!("could not start worker pool, running sequentially: {}", e),
            }
        }

        expanded
            .iter()
            .map(|e| self.invoke(id, tool, TaskInput::Expanded(e)))
            .collect::<Result<Vec<_>, _>>()
            .map(Dispatch::of)
    }

    fn invoke(
        &self,
        id: &TaskId,
        tool: &ToolConfig,
        input: TaskInput<'_>,
    ) -> Result<TaskResult, TaskError> {
        let start = Instant::now();
        let status = self.executor.execute(id.method, &id.task_type, input, tool)?;
        Ok(TaskResult::new(
            input.id(),
            input.source().to_path_buf(),
            input.destination().map(Path::to_path_buf),
            status,
            start.elapsed(),
        ))
    }
}
