//! Watch mode for automatic re-runs on file changes
//!
//! Watches the project's source directory with a debounced watcher. Each
//! batch of changes is mapped to file types by extension and only those
//! types' pipelines are re-run.

use notify::RecursiveMode;
use notify_debouncer_mini::{new_debouncer, DebouncedEvent, DebouncedEventKind};
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use std::time::Duration;
use thiserror::Error;

use crate::build::{BuildContext, PipelineRunner, TaskExecutor};
use crate::config::{FileType, PipelineKind};

/// Error that stops watch mode
#[derive(Debug, Error)]
pub enum WatchError {
    /// Failed to initialize file watcher
    #[error("Failed to initialize file watcher: {0}")]
    WatcherInit(notify::Error),
    /// Failed to add watch path
    #[error("Failed to watch path: {0}")]
    WatchPath(notify::Error),
    /// The event channel closed
    #[error("Watch channel error: {0}")]
    ChannelError(String),
    /// Source directory not found
    #[error("Source directory not found: {}", .0.display())]
    SourceNotFound(PathBuf),
}

/// File types of the changed paths, in first-seen order.
///
/// Files whose extension maps to no type are ignored.
pub fn changed_types<'a, I>(paths: I) -> Vec<FileType>
where
    I: IntoIterator<Item = &'a Path>,
{
    let mut types = Vec::new();
    for path in paths {
        let file_type = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(FileType::from_extension);
        if let Some(file_type) = file_type {
            if !types.contains(&file_type) {
                types.push(file_type);
            }
        }
    }
    types
}

/// Clear the terminal screen
fn clear_screen() {
    print!("\x1B[2J\x1B[1;1H");
}

/// Run `kind` once, then re-run the affected types whenever files under
/// the source directory change.
///
/// Blocks until the watcher fails. Pipeline errors are logged and watching
/// continues.
pub fn watch(
    context: &BuildContext,
    kind: PipelineKind,
    executor: &dyn TaskExecutor,
) -> Result<(), WatchError> {
    let src_dir = context.src_dir();
    if !src_dir.is_dir() {
        return Err(WatchError::SourceNotFound(src_dir));
    }

    let settings = &context.config().watch;
    let runner = PipelineRunner::new(context, executor);

    let (tx, rx) = channel();
    let debounce = Duration::from_millis(u64::from(settings.debounce_ms));
    let mut debouncer = new_debouncer(debounce, tx).map_err(WatchError::WatcherInit)?;
    debouncer.watcher().watch(&src_dir, RecursiveMode::Recursive).map_err(WatchError::WatchPath)?;

    match runner.run(kind, None) {
        Ok(result) => println!("{}", result.summary()),
        Err(e) => tracing::error!("{}", e),
    }
    tracing::info!("Watching {} for changes...", src_dir.display());

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let settled: Vec<&DebouncedEvent> =
                    events.iter().filter(|e| matches!(e.kind, DebouncedEventKind::Any)).collect();
                let types = changed_types(settled.iter().map(|e| e.path.as_path()));
                if types.is_empty() {
                    continue;
                }
                if settings.clear_screen {
                    clear_screen();
                }
                for event in &settled {
                    tracing::debug!("changed: {}", event.path.display());
                }

                for file_type in types {
                    match runner.run_type(kind, file_type) {
                        Ok(result) => println!("{}", result.summary()),
                        Err(e) => tracing::error!("{}", e),
                    }
                }
                tracing::info!("Watching {} for changes...", src_dir.display());
            }
            Ok(Err(error)) => {
                tracing::warn!("watch error: {:?}", error);
            }
            Err(e) => return Err(WatchError::ChannelError(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::{TaskError, TaskInput, TaskMethod, TaskStatus};
    use crate::config::{default_config, ToolConfig};
    use tempfile::TempDir;

    struct Never;

    impl TaskExecutor for Never {
        fn execute(
            &self,
            _method: TaskMethod,
            _task_type: &str,
            _input: TaskInput<'_>,
            _tool: &ToolConfig,
        ) -> Result<TaskStatus, TaskError> {
            panic!("nothing should run");
        }
    }

    fn types_of(paths: &[&str]) -> Vec<FileType> {
        changed_types(paths.iter().map(Path::new))
    }

    #[test]
    fn test_changed_types_dedupes_in_order() {
        let types = types_of(&[
            "/p/src/less/main.less",
            "/p/src/js/app.js",
            "/p/src/less/_vars.less",
            "/p/src/css/site.SCSS",
        ]);
        assert_eq!(types, vec![FileType::Less, FileType::Js, FileType::Sass]);
    }

    #[test]
    fn test_changed_types_ignores_unknown_files() {
        assert!(types_of(&["/p/src/README", "/p/src/notes.md", "/p/src/.jshintrc"]).is_empty());
    }

    #[test]
    fn test_watch_requires_source_directory() {
        let temp = TempDir::new().unwrap();
        let ctx = BuildContext::new(default_config(), temp.path().to_path_buf());

        let result = watch(&ctx, PipelineKind::Build, &Never);

        assert!(matches!(result, Err(WatchError::SourceNotFound(p)) if p == temp.path().join("src")));
    }
}
