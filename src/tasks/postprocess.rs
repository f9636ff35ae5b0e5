//! `postprocess`: run stylesheets through postcss.

use super::{path_arg, unrecognized, Tasks};
use crate::build::{TaskError, TaskInput, TaskMethod, TaskStatus};
use crate::config::ToolConfig;
use crate::tool::{ArgOptions, Executable};

pub(super) fn postprocess(
    tasks: &Tasks,
    task_type: &str,
    input: TaskInput<'_>,
    tool: &ToolConfig,
) -> Result<TaskStatus, TaskError> {
    match task_type {
        "css" => {
            let destination = input.require_destination()?;
            tasks.prepare_destination(destination)?;

            let options = ArgOptions::new()
                .with("use", "autoprefixer")
                .with("output", path_arg(destination));
            Ok(tasks.invoke(
                Executable::bundled("postcss"),
                tool,
                &[path_arg(input.source())],
                options,
                tool.invoke_options(),
            ))
        }
        _ => Err(unrecognized(TaskMethod::Postprocess, task_type)),
    }
}
