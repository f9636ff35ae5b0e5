//! `publish`: release the package to a registry.

use super::{unrecognized, Tasks};
use crate::build::{TaskError, TaskInput, TaskMethod, TaskStatus};
use crate::config::ToolConfig;
use crate::tool::{ArgOptions, Executable};

pub(super) fn publish(
    tasks: &Tasks,
    task_type: &str,
    _input: TaskInput<'_>,
    tool: &ToolConfig,
) -> Result<TaskStatus, TaskError> {
    match task_type {
        "npm" => Ok(tasks.invoke(
            Executable::system("npm"),
            tool,
            &["publish"],
            ArgOptions::new(),
            tool.invoke_options(),
        )),
        _ => Err(unrecognized(TaskMethod::Publish, task_type)),
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_publish_npm_runs_in_project_root() {
        let temp = TempDir::new().unwrap();
        let runner = RecordingRunner::succeeding();
        let tasks = tasks(temp.path(), runner.clone());
        let task = declared("publish:npm", ".", None);

        publish(&tasks, "npm", TaskInput::Declared(&task), &ToolConfig::default()).unwrap();

        let seen = runner.seen.lock().unwrap();
        assert_eq!(seen[0].command.to_string(), "npm publish");
        assert_eq!(seen[0].working_dir, temp.path());
    }
}
