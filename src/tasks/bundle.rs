//! `bundle`: resolve a script's requires into one file.

use super::{path_arg, unrecognized, Tasks};
use crate::build::{TaskError, TaskInput, TaskMethod, TaskStatus};
use crate::config::ToolConfig;
use crate::tool::{ArgOptions, Executable};

pub(super) fn bundle(
    tasks: &Tasks,
    task_type: &str,
    input: TaskInput<'_>,
    tool: &ToolConfig,
) -> Result<TaskStatus, TaskError> {
    match task_type {
        "js" => {
            let destination = input.require_destination()?;
            tasks.prepare_destination(destination)?;

            let options =
                ArgOptions::new().with("outfile", path_arg(destination)).with("debug", tool.debug);
            Ok(tasks.invoke(
                Executable::bundled("browserify"),
                tool,
                &[path_arg(input.source())],
                options,
                tool.invoke_options(),
            ))
        }
        _ => Err(unrecognized(TaskMethod::Bundle, task_type)),
    }
}
