//! `document`: generate API documentation for a source tree.

use super::{path_arg, unrecognized, Tasks};
use crate::build::{TaskError, TaskInput, TaskMethod, TaskStatus};
use crate::config::ToolConfig;
use crate::tool::{ArgOptions, Executable};

pub(super) fn document(
    tasks: &Tasks,
    task_type: &str,
    input: TaskInput<'_>,
    tool: &ToolConfig,
) -> Result<TaskStatus, TaskError> {
    match task_type {
        "js" => {
            let destination = input.require_destination()?;
            tasks.prepare_directory(destination)?;

            let options = ArgOptions::new()
                .with("recurse", true)
                .with("destination", path_arg(destination));
            Ok(tasks.invoke(
                Executable::bundled("jsdoc"),
                tool,
                &[path_arg(input.source())],
                options,
                tool.invoke_options(),
            ))
        }
        _ => Err(unrecognized(TaskMethod::Document, task_type)),
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_document_js() {
        let temp = TempDir::new().unwrap();
        let runner = RecordingRunner::succeeding();
        let tasks = tasks(temp.path(), runner.clone());
        let docs = temp.path().join("docs");
        let task = declared("document:js", "/p/src/js", Some(docs.to_str().unwrap()));

        document(&tasks, "js", TaskInput::Declared(&task), &ToolConfig::default()).unwrap();

        assert!(docs.is_dir());
        assert_eq!(
            runner.commands(),
            vec![format!("/tools/jsdoc /p/src/js --recurse --destination {}", docs.display())]
        );
    }
}
