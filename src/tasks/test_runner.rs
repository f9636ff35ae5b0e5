//! `test`: run the unit test suite.

use super::{path_arg, unrecognized, Tasks};
use crate::build::{TaskError, TaskInput, TaskMethod, TaskStatus};
use crate::config::ToolConfig;
use crate::tool::{ArgOptions, Executable};

pub(super) fn run_tests(
    tasks: &Tasks,
    task_type: &str,
    input: TaskInput<'_>,
    tool: &ToolConfig,
) -> Result<TaskStatus, TaskError> {
    match task_type {
        "js" => {
            let options = ArgOptions::new().with("recursive", true).with("reporter", "spec");
            Ok(tasks.invoke(
                Executable::bundled("mocha"),
                tool,
                &[path_arg(input.source())],
                options,
                tool.invoke_options(),
            ))
        }
        _ => Err(unrecognized(TaskMethod::Test, task_type)),
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_mocha_over_test_root() {
        let temp = TempDir::new().unwrap();
        let runner = RecordingRunner::succeeding();
        let tasks = tasks(temp.path(), runner.clone());
        let task = declared("test:js", "/p/test", None);

        let status = run_tests(&tasks, "js", TaskInput::Declared(&task), &ToolConfig::default()).unwrap();

        assert_eq!(status, TaskStatus::Success);
        assert_eq!(runner.commands(), vec!["/tools/mocha /p/test --recursive --reporter spec"]);
    }
}
