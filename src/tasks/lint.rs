//! `lint`: style and quality checks with JSON reports.
//!
//! Both linters must have their stdout captured, so `stdio` is forced to
//! `pipe` whatever the tool config says.

use super::{path_arg, unrecognized, Tasks};
use crate::build::{TaskError, TaskInput, TaskMethod, TaskStatus};
use crate::config::ToolConfig;
use crate::tool::{ArgOptions, Executable, InvokeOptions, OutputMode, StdioMode};

/// jshint reporter emitting `{"result": [...]}`, relative to the tool root's parent.
const QUALITY_REPORTER: &str = "jshint-json/json.js";

pub(super) fn lint(
    tasks: &Tasks,
    task_type: &str,
    input: TaskInput<'_>,
    tool: &ToolConfig,
) -> Result<TaskStatus, TaskError> {
    let (executable, options, output) = match task_type {
        "js:style" => (
            Executable::bundled("jscs"),
            ArgOptions::new().with("reporter", "json"),
            OutputMode::StyleReport,
        ),
        "js:quality" => {
            let modules = tasks.invoker().tool_root().parent().unwrap_or(tasks.invoker().tool_root());
            let reporter = path_arg(&modules.join(QUALITY_REPORTER));
            (
                Executable::bundled("jshint"),
                ArgOptions::new().with("reporter", reporter),
                OutputMode::QualityReport,
            )
        }
        _ => return Err(unrecognized(TaskMethod::Lint, task_type)),
    };

    let invoke = InvokeOptions { output, stdio: StdioMode::Pipe, ..tool.invoke_options() };
    Ok(tasks.invoke(executable, tool, &[path_arg(input.source())], options, invoke))
}
