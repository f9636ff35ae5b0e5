//! `version`: release bookkeeping in git.

use super::{unrecognized, Tasks};
use crate::build::{TaskError, TaskInput, TaskMethod, TaskStatus};
use crate::config::ToolConfig;
use crate::tool::{ArgOptions, Executable};

pub(super) fn version(
    tasks: &Tasks,
    task_type: &str,
    _input: TaskInput<'_>,
    tool: &ToolConfig,
) -> Result<TaskStatus, TaskError> {
    let version = tasks.project_version();
    let args: Vec<String> = match task_type {
        "git:tag" => {
            let tag = format!("v{}", version);
            let message = format!("Release {}", tag);
            vec!["tag".into(), "-a".into(), tag, "-m".into(), message]
        }
        "git:branch" => vec!["checkout".into(), "-b".into(), format!("release/{}", version)],
        "git:push" => vec!["push".into(), "--follow-tags".into()],
        _ => return Err(unrecognized(TaskMethod::Version, task_type)),
    };

    Ok(tasks.invoke(Executable::system("git"), tool, &args, ArgOptions::new(), tool.invoke_options()))
}
