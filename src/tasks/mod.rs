//! Task methods.
//!
//! Each method switches on the task type, builds the arguments for its
//! external tool and hands them to the [`ToolInvoker`]. Methods are looked
//! up through a table built once per [`Tasks`], keyed by [`TaskMethod`].
//!
//! | method | types |
//! |---|---|
//! | bundle | `js` |
//! | compress | `gif`, `jpg`, `png`, `svg`, `css`, `html`, `js`, `md`, `txt` |
//! | copy | any file type |
//! | document | `js` |
//! | lint | `js:style`, `js:quality` |
//! | minify | `css`, `html`, `js` |
//! | preprocess | `hbs`, `less`, `sass` |
//! | postprocess | `css` |
//! | publish | `npm` |
//! | test | `js` |
//! | version | `git:tag`, `git:branch`, `git:push` |

mod bundle;
mod compress;
mod copy;
mod document;
mod lint;
mod minify;
mod postprocess;
mod preprocess;
mod publish;
mod test_runner;
mod version;

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::build::{BuildContext, TaskError, TaskExecutor, TaskInput, TaskMethod, TaskStatus};
use crate::config::ToolConfig;
use crate::tool::{ArgOptions, Executable, InvokeOptions, ProcessRunner, ToolInvoker, ToolOutput};

/// Signature shared by every task method.
pub type TaskFn = fn(&Tasks, &str, TaskInput<'_>, &ToolConfig) -> Result<TaskStatus, TaskError>;

fn method_fn(method: TaskMethod) -> TaskFn {
    match method {
        TaskMethod::Bundle => bundle::bundle,
        TaskMethod::Compress => compress::compress,
        TaskMethod::Copy => copy::copy,
        TaskMethod::Document => document::document,
        TaskMethod::Lint => lint::lint,
        TaskMethod::Minify => minify::minify,
        TaskMethod::Preprocess => preprocess::preprocess,
        TaskMethod::Postprocess => postprocess::postprocess,
        TaskMethod::Publish => publish::publish,
        TaskMethod::Test => test_runner::run_tests,
        TaskMethod::Version => version::version,
    }
}

/// The task-method table and what the methods share.
pub struct Tasks {
    invoker: ToolInvoker,
    /// Working directory for every tool
    project_root: PathBuf,
    /// Used for release tags
    project_version: String,
    dry_run: bool,
    table: HashMap<TaskMethod, TaskFn>,
}

impl std::fmt::Debug for Tasks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tasks")
            .field("invoker", &self.invoker)
            .field("project_root", &self.project_root)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl Tasks {
    /// Create the table around an invoker.
    pub fn new(context: &BuildContext, invoker: ToolInvoker) -> Self {
        let table = TaskMethod::ALL.into_iter().map(|m| (m, method_fn(m))).collect();
        Self {
            invoker,
            project_root: context.project_root().to_path_buf(),
            project_version: context.config().project.version.clone(),
            dry_run: context.is_dry_run(),
            table,
        }
    }

    /// Create the table with a real process runner.
    pub fn from_context(context: &BuildContext) -> Self {
        let invoker = ToolInvoker::new(context.tools_root(), Arc::new(ProcessRunner))
            .with_dry_run(context.is_dry_run());
        Self::new(context, invoker)
    }

    pub fn invoker(&self) -> &ToolInvoker {
        &self.invoker
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn project_version(&self) -> &str {
        &self.project_version
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Run a tool for a task method.
    ///
    /// `options` are the method's own flags; the tool config's `options`
    /// are merged over them and its `executable` replaces the name of
    /// `default`, which stays bundled or system.
    pub(crate) fn invoke<S: AsRef<str>>(
        &self,
        default: Executable,
        tool: &ToolConfig,
        args: &[S],
        options: ArgOptions,
        invoke: InvokeOptions,
    ) -> TaskStatus {
        let mut options = options;
        options.merge(&tool.options);

        let executable = match &tool.executable {
            Some(path) => default.renamed(path.clone()),
            None => default,
        };

        let output = self.invoker.run(&executable, &self.project_root, args, &options, invoke);
        self.status_of(&output)
    }

    fn status_of(&self, output: &ToolOutput) -> TaskStatus {
        if self.dry_run {
            return TaskStatus::Skipped;
        }

        match output.status {
            Some(0) => TaskStatus::Success,
            Some(code) => TaskStatus::ToolFailed(format!("exit status {}", code)),
            None => TaskStatus::ToolFailed(output.stderr.trim().to_string()),
        }
    }

    /// Make sure the directory a destination file goes into exists.
    pub(crate) fn prepare_destination(&self, destination: &Path) -> Result<(), TaskError> {
        match destination.parent() {
            Some(parent) => self.prepare_directory(parent),
            None => Ok(()),
        }
    }

    /// Make sure a destination directory exists.
    pub(crate) fn prepare_directory(&self, directory: &Path) -> Result<(), TaskError> {
        if self.dry_run {
            return Ok(());
        }
        ensure_target_directory(directory)
    }
}

impl TaskExecutor for Tasks {
    fn execute(
        &self,
        method: TaskMethod,
        task_type: &str,
        input: TaskInput<'_>,
        tool: &ToolConfig,
    ) -> Result<TaskStatus, TaskError> {
        let run = self
            .table
            .get(&method)
            .ok_or_else(|| TaskError::UnrecognizedMethod(method.to_string()))?;
        run(self, task_type, input, tool)
    }
}

/// Create a directory and its parents; an existing directory is fine.
pub fn ensure_target_directory(directory: &Path) -> Result<(), TaskError> {
    fs::create_dir_all(directory)?;
    Ok(())
}

pub(crate) fn unrecognized(method: TaskMethod, task_type: &str) -> TaskError {
    TaskError::UnrecognizedType { method, task_type: task_type.to_string() }
}

pub(crate) fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_table_covers_every_method() {
        let temp = TempDir::new().unwrap();
        let tasks = tasks(temp.path(), RecordingRunner::succeeding());
        for method in TaskMethod::ALL {
            assert!(tasks.table.contains_key(&method), "missing {}", method);
        }
    }

    #[test]
    fn test_method_missing_from_table() {
        let temp = TempDir::new().unwrap();
        let runner = RecordingRunner::succeeding();
        let mut tasks = tasks(temp.path(), runner.clone());
        tasks.table.remove(&TaskMethod::Copy);
        let task = expanded("copy:css", "/p/src/a.css", "/p/build/a.css");

        let result = tasks.execute(TaskMethod::Copy, "css", TaskInput::Expanded(&task), &ToolConfig::default());

        assert!(matches!(result, Err(TaskError::UnrecognizedMethod(m)) if m == "copy"));
        assert!(runner.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_unrecognized_type_never_invokes_tool() {
        let temp = TempDir::new().unwrap();
        let runner = RecordingRunner::succeeding();
        let tasks = tasks(temp.path(), runner.clone());
        let task = expanded("x", "/p/src/a.coffee", "/p/build/a.js");

        for method in TaskMethod::ALL {
            let result =
                tasks.execute(method, "coffee", TaskInput::Expanded(&task), &ToolConfig::default());
            assert!(
                matches!(result, Err(TaskError::UnrecognizedType { method: m, .. }) if m == method),
                "{} accepted an unknown type",
                method
            );
        }
        assert!(runner.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_tool_options_merge_over_method_flags() {
        let temp = TempDir::new().unwrap();
        let runner = RecordingRunner::succeeding();
        let tasks = tasks(temp.path(), runner.clone());
        let mut tool = ToolConfig::default();
        tool.options.insert("debug".to_string(), true.into());
        tool.options.insert("extension".to_string(), ".ts".into());

        let options = ArgOptions::new().with("outfile", "out.js").with("debug", false);
        tasks.invoke(Executable::bundled("browserify"), &tool, &["in.js"], options, InvokeOptions::default());

        assert_eq!(
            runner.commands(),
            vec!["/tools/browserify in.js --outfile out.js --debug --extension .ts"]
        );
    }

    #[test]
    fn test_executable_override() {
        let temp = TempDir::new().unwrap();
        let runner = RecordingRunner::succeeding();
        let tasks = tasks(temp.path(), runner.clone());
        let tool = ToolConfig { executable: Some("/usr/local/bin/esbuild".into()), ..Default::default() };

        tasks.invoke(Executable::bundled("browserify"), &tool, &["in.js"], ArgOptions::new(), InvokeOptions::default());

        assert_eq!(runner.commands(), vec!["/usr/local/bin/esbuild in.js"]);
    }

    #[test]
    fn test_executable_override_keeps_system_lookup() {
        let temp = TempDir::new().unwrap();
        let runner = RecordingRunner::succeeding();
        let tasks = tasks(temp.path(), runner.clone());
        let tool = ToolConfig { executable: Some("git".into()), ..Default::default() };

        tasks.invoke(Executable::system("hg"), &tool, &["push"], ArgOptions::new(), InvokeOptions::default());
        tasks.invoke(Executable::bundled("jsdoc"), &tool, &["src"], ArgOptions::new(), InvokeOptions::default());

        // Found on PATH, not under /tools; a bundled default stays bundled
        assert_eq!(runner.commands(), vec!["git push", "/tools/git src"]);
    }

    #[test]
    fn test_tool_failure_is_a_status() {
        let temp = TempDir::new().unwrap();
        let runner = Arc::new(RecordingRunner {
            output: ToolOutput { status: Some(3), ..Default::default() },
            ..Default::default()
        });
        let tasks = tasks(temp.path(), runner);
        let status = tasks.invoke::<&str>(
            Executable::bundled("mocha"),
            &ToolConfig::default(),
            &[],
            ArgOptions::new(),
            InvokeOptions::default(),
        );
        assert_eq!(status, TaskStatus::ToolFailed("exit status 3".to_string()));
    }

    #[test]
    fn test_ensure_target_directory_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("build/css/theme");
        ensure_target_directory(&dir).unwrap();
        ensure_target_directory(&dir).unwrap();
        assert!(dir.is_dir());
    }

    #[test]
    fn test_ensure_target_directory_propagates_other_errors() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("occupied");
        fs::write(&file, "").unwrap();
        let result = ensure_target_directory(&file.join("sub"));
        assert!(matches!(result, Err(TaskError::Io(_))));
    }
}
