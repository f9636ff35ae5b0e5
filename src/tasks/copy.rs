//! `copy`: copy files into the destination tree.
//!
//! Runs natively rather than through an external tool. A declared (not
//! expanded) descriptor copies every file its pattern matches.

use std::fs;
use std::path::Path;

use super::{unrecognized, Tasks};
use crate::build::{discover_files, resolve_destination, TaskError, TaskInput, TaskMethod, TaskStatus};
use crate::config::{FileType, ToolConfig};

/// Types copied besides the pipeline file types.
const EXTRA_TYPES: &[&str] = &["json", "md", "txt", "xml", "eot", "otf", "ttf", "woff", "woff2"];

fn is_copyable(task_type: &str) -> bool {
    FileType::from_name(task_type).is_some() || EXTRA_TYPES.contains(&task_type)
}

pub(super) fn copy(
    tasks: &Tasks,
    task_type: &str,
    input: TaskInput<'_>,
    _tool: &ToolConfig,
) -> Result<TaskStatus, TaskError> {
    if !is_copyable(task_type) {
        return Err(unrecognized(TaskMethod::Copy, task_type));
    }

    match input {
        TaskInput::Expanded(task) => copy_file(tasks, &task.source, &task.destination),
        TaskInput::Declared(task) => {
            let (dst_root, dst_ext) =
                task.dst.as_ref().ok_or_else(|| TaskError::MissingDestination(task.id.clone()))?;
            let mut status = TaskStatus::Skipped;
            for file in discover_files(task.src_root(), task.pattern())? {
                let destination = resolve_destination(task.src_root(), &file, dst_root, dst_ext)?;
                status = copy_file(tasks, &file, &destination)?;
            }
            Ok(status)
        }
    }
}

fn copy_file(tasks: &Tasks, source: &Path, destination: &Path) -> Result<TaskStatus, TaskError> {
    if tasks.is_dry_run() {
        tracing::info!("[dry run] copy {} -> {}", source.display(), destination.display());
        return Ok(TaskStatus::Skipped);
    }

    tasks.prepare_destination(destination)?;
    fs::copy(source, destination)?;
    tracing::debug!("copied {} -> {}", source.display(), destination.display());
    Ok(TaskStatus::Success)
}
