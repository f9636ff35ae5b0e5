//! `minify`: shrink scripts, stylesheets and pages.

use super::{path_arg, unrecognized, Tasks};
use crate::build::{TaskError, TaskInput, TaskMethod, TaskStatus};
use crate::config::ToolConfig;
use crate::tool::{ArgOptions, Executable};

pub(super) fn minify(
    tasks: &Tasks,
    task_type: &str,
    input: TaskInput<'_>,
    tool: &ToolConfig,
) -> Result<TaskStatus, TaskError> {
    let executable = match task_type {
        "js" => "uglifyjs",
        "css" => "cleancss",
        "html" => "html-minifier",
        _ => return Err(unrecognized(TaskMethod::Minify, task_type)),
    };

    let destination = input.require_destination()?;
    tasks.prepare_destination(destination)?;

    let mut options = ArgOptions::new().with("output", path_arg(destination));
    match task_type {
        "js" => {
            options.set("compress", true);
            options.set("mangle", true);
        }
        "html" => {
            options.set("collapse-whitespace", true);
            options.set("remove-comments", true);
        }
        _ => {}
    }

    Ok(tasks.invoke(
        Executable::bundled(executable),
        tool,
        &[path_arg(input.source())],
        options,
        tool.invoke_options(),
    ))
}
