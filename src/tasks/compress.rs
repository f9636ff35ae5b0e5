//! `compress`: optimize images or gzip text assets.

use super::{path_arg, unrecognized, Tasks};
use crate::build::{TaskError, TaskInput, TaskMethod, TaskStatus};
use crate::config::ToolConfig;
use crate::tool::{ArgOptions, Executable};

/// imagemin plugin for each image type.
fn image_plugin(task_type: &str) -> Option<&'static str> {
    match task_type {
        "gif" => Some("gifsicle"),
        "jpg" => Some("jpegtran"),
        "png" => Some("optipng"),
        "svg" => Some("svgo"),
        _ => None,
    }
}

fn is_archivable(task_type: &str) -> bool {
    matches!(task_type, "css" | "html" | "js" | "md" | "txt")
}

pub(super) fn compress(
    tasks: &Tasks,
    task_type: &str,
    input: TaskInput<'_>,
    tool: &ToolConfig,
) -> Result<TaskStatus, TaskError> {
    if let Some(plugin) = image_plugin(task_type) {
        let destination = input.require_destination()?;
        tasks.prepare_destination(destination)?;

        let out_dir = destination.parent().unwrap_or(destination);
        let options = ArgOptions::new().with("plugin", plugin).with("out-dir", path_arg(out_dir));
        return Ok(tasks.invoke(
            Executable::bundled("imagemin"),
            tool,
            &[path_arg(input.source())],
            options,
            tool.invoke_options(),
        ));
    }

    if is_archivable(task_type) {
        let destination = input.require_destination()?;
        tasks.prepare_destination(destination)?;

        let options = ArgOptions::new().with("output", path_arg(destination));
        return Ok(tasks.invoke(
            Executable::bundled("gzip"),
            tool,
            &[path_arg(input.source())],
            options,
            tool.invoke_options(),
        ));
    }

    Err(unrecognized(TaskMethod::Compress, task_type))
}
