//! `preprocess`: compile LESS, Sass and Handlebars sources.

use super::{path_arg, unrecognized, Tasks};
use crate::build::{TaskError, TaskInput, TaskMethod, TaskStatus};
use crate::config::ToolConfig;
use crate::tool::{ArgOptions, Executable};

pub(super) fn preprocess(
    tasks: &Tasks,
    task_type: &str,
    input: TaskInput<'_>,
    tool: &ToolConfig,
) -> Result<TaskStatus, TaskError> {
    if !matches!(task_type, "less" | "sass" | "hbs") {
        return Err(unrecognized(TaskMethod::Preprocess, task_type));
    }

    let source = path_arg(input.source());
    let destination = input.require_destination()?;
    tasks.prepare_destination(destination)?;

    let (executable, args, options) = match task_type {
        // lessc takes the output file positionally
        "less" => (
            "lessc",
            vec![source, path_arg(destination)],
            ArgOptions::new().with("source-map", tool.debug),
        ),
        // node-sass writes into a directory, naming the file itself
        "sass" => {
            let out_dir = destination.parent().unwrap_or(destination);
            (
                "node-sass",
                vec![source],
                ArgOptions::new()
                    .with("output", path_arg(out_dir))
                    .with("source-map", tool.debug.then_some("true")),
            )
        }
        _ => ("handlebars", vec![source], ArgOptions::new().with("output", path_arg(destination))),
    };

    Ok(tasks.invoke(Executable::bundled(executable), tool, &args, options, tool.invoke_options()))
}
