//! Task descriptors and identifiers.
//!
//! A task descriptor is one declared step of a pipeline, e.g.
//!
//! ```toml
//! [[pipelines.build.less]]
//! id = "preprocess:less"
//! src = ["src/less", "**/*.less"]
//! dst = ["build/css", ".css"]
//! ```
//!
//! Its id names the task method (`preprocess`) and the type the method
//! switches on (`less`, or `js:style` for three-part ids).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Error raised while dispatching or executing a task.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TaskError {
    /// The task method does not handle this type
    #[error("Unrecognized type '{task_type}' for task method '{method}'")]
    UnrecognizedType { method: TaskMethod, task_type: String },
    /// The id names no known task method
    #[error("Unrecognized task method '{0}'")]
    UnrecognizedMethod(String),
    /// The id is not `method:type` or `method:type:subtype`
    #[error("Malformed task id '{0}' (expected method:type[:subtype])")]
    MalformedTaskId(String),
    /// No tool configuration exists for the task in this pipeline kind
    #[error("No tool configuration for '{task_id}' in the {kind} pipeline")]
    MissingToolConfig { kind: String, task_id: String },
    /// The task needs a destination but none was declared
    #[error("Task '{0}' requires a destination")]
    MissingDestination(String),
    /// A matched file does not live under its source root
    #[error("{} is not under source root {}", .path.display(), .root.display())]
    OutsideSourceRoot { path: PathBuf, root: PathBuf },
    /// The source glob could not be parsed
    #[error("Invalid glob pattern '{0}': {1}")]
    InvalidPattern(String, glob::PatternError),
    /// Filesystem error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// The closed set of task methods a descriptor can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TaskMethod {
    Bundle,
    Compress,
    Copy,
    Document,
    Lint,
    Minify,
    Preprocess,
    Postprocess,
    Publish,
    Test,
    Version,
}

impl TaskMethod {
    /// All methods, in declaration order.
    pub const ALL: [TaskMethod; 11] = [
        TaskMethod::Bundle,
        TaskMethod::Compress,
        TaskMethod::Copy,
        TaskMethod::Document,
        TaskMethod::Lint,
        TaskMethod::Minify,
        TaskMethod::Preprocess,
        TaskMethod::Postprocess,
        TaskMethod::Publish,
        TaskMethod::Test,
        TaskMethod::Version,
    ];

    /// The name used in task ids.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskMethod::Bundle => "bundle",
            TaskMethod::Compress => "compress",
            TaskMethod::Copy => "copy",
            TaskMethod::Document => "document",
            TaskMethod::Lint => "lint",
            TaskMethod::Minify => "minify",
            TaskMethod::Preprocess => "preprocess",
            TaskMethod::Postprocess => "postprocess",
            TaskMethod::Publish => "publish",
            TaskMethod::Test => "test",
            TaskMethod::Version => "version",
        }
    }
}

impl std::fmt::Display for TaskMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskMethod {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskMethod::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| TaskError::UnrecognizedMethod(s.to_string()))
    }
}

/// A parsed task id.
///
/// `lint:js:style` parses to method `lint` and type `js:style`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskId {
    /// The task method to invoke
    pub method: TaskMethod,
    /// The type (or `type:subtype`) the method switches on
    pub task_type: String,
}

impl TaskId {
    /// Parse a `method:type[:subtype]` id.
    pub fn parse(id: &str) -> Result<Self, TaskError> {
        let parts: Vec<&str> = id.split(':').collect();
        if !(2..=3).contains(&parts.len()) || parts.iter().any(|p| p.is_empty()) {
            return Err(TaskError::MalformedTaskId(id.to_string()));
        }

        let method = parts[0].parse()?;
        let task_type = parts[1..].join(":");
        Ok(Self { method, task_type })
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.method, self.task_type)
    }
}

/// One declared step of a pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDescriptor {
    /// `method:type[:subtype]`
    pub id: String,
    /// Source root and glob pattern
    pub src: (PathBuf, String),
    /// Destination root and extension
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dst: Option<(PathBuf, String)>,
}

impl TaskDescriptor {
    /// Create a descriptor with a source and no destination.
    pub fn new(id: impl Into<String>, src_root: impl Into<PathBuf>, pattern: impl Into<String>) -> Self {
        Self { id: id.into(), src: (src_root.into(), pattern.into()), dst: None }
    }

    /// Set the destination root and extension.
    pub fn with_dst(mut self, dst_root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        self.dst = Some((dst_root.into(), extension.into()));
        self
    }

    /// The source root directory.
    pub fn src_root(&self) -> &Path {
        &self.src.0
    }

    /// The source glob, relative to the source root.
    pub fn pattern(&self) -> &str {
        &self.src.1
    }

    /// The destination root directory, if any.
    pub fn dst_root(&self) -> Option<&Path> {
        self.dst.as_ref().map(|(root, _)| root.as_path())
    }

    /// The destination extension, if any.
    pub fn dst_ext(&self) -> Option<&str> {
        self.dst.as_ref().map(|(_, ext)| ext.as_str())
    }

    /// Resolve relative source and destination roots against `root`.
    pub fn resolved_against(&self, root: &Path) -> Self {
        let resolve = |p: &Path| if p.is_absolute() { p.to_path_buf() } else { root.join(p) };
        Self {
            id: self.id.clone(),
            src: (resolve(&self.src.0), self.src.1.clone()),
            dst: self.dst.as_ref().map(|(dst_root, ext)| (resolve(dst_root), ext.clone())),
        }
    }

    /// Specialize this descriptor to one matched file.
    pub fn expand(&self, source: PathBuf, destination: PathBuf) -> ExpandedTask {
        ExpandedTask { id: self.id.clone(), source, destination }
    }
}

/// A descriptor specialized to one concrete source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandedTask {
    /// Id of the descriptor this was expanded from
    pub id: String,
    /// The matched source file
    pub source: PathBuf,
    /// The mirrored destination file
    pub destination: PathBuf,
}

/// What a task method operates on.
#[derive(Debug, Clone, Copy)]
pub enum TaskInput<'a> {
    /// The declared descriptor, for whole-directory work (lint, test, docs)
    Declared(&'a TaskDescriptor),
    /// One file from glob expansion
    Expanded(&'a ExpandedTask),
}

impl<'a> TaskInput<'a> {
    /// The task id.
    pub fn id(&self) -> &'a str {
        match self {
            TaskInput::Declared(d) => &d.id,
            TaskInput::Expanded(e) => &e.id,
        }
    }

    /// The source file, or the source root for a declared descriptor.
    pub fn source(&self) -> &'a Path {
        match self {
            TaskInput::Declared(d) => d.src_root(),
            TaskInput::Expanded(e) => &e.source,
        }
    }

    /// The destination file, or the destination root for a declared descriptor.
    pub fn destination(&self) -> Option<&'a Path> {
        match self {
            TaskInput::Declared(d) => d.dst_root(),
            TaskInput::Expanded(e) => Some(&e.destination),
        }
    }

    /// The destination, or [`TaskError::MissingDestination`].
    pub fn require_destination(&self) -> Result<&'a Path, TaskError> {
        self.destination().ok_or_else(|| TaskError::MissingDestination(self.id().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_id_two_parts() {
        let id = TaskId::parse("bundle:js").unwrap();
        assert_eq!(id.method, TaskMethod::Bundle);
        assert_eq!(id.task_type, "js");
        assert_eq!(id.to_string(), "bundle:js");
    }

    #[test]
    fn test_task_id_with_subtype() {
        let id = TaskId::parse("lint:js:style").unwrap();
        assert_eq!(id.method, TaskMethod::Lint);
        assert_eq!(id.task_type, "js:style");
    }

    #[test]
    fn test_task_id_malformed() {
        for bad in ["bundle", "", "lint:js:style:extra", "bundle:", ":js"] {
            assert!(
                matches!(TaskId::parse(bad), Err(TaskError::MalformedTaskId(_))),
                "expected malformed: {bad:?}"
            );
        }
    }

    #[test]
    fn test_task_id_unknown_method() {
        assert!(matches!(TaskId::parse("explode:js"), Err(TaskError::UnrecognizedMethod(_))));
    }

    #[test]
    fn test_task_method_roundtrip_names() {
        for method in TaskMethod::ALL {
            assert_eq!(method.as_str().parse::<TaskMethod>().unwrap(), method);
        }
    }

    #[test]
    fn test_descriptor_from_toml() {
        let toml = r#"
id = "preprocess:less"
src = ["src/less", "**/*.less"]
dst = ["build/css", ".css"]
"#;
        let d: TaskDescriptor = toml::from_str(toml).unwrap();
        assert_eq!(d.id, "preprocess:less");
        assert_eq!(d.src_root(), Path::new("src/less"));
        assert_eq!(d.pattern(), "**/*.less");
        assert_eq!(d.dst_root(), Some(Path::new("build/css")));
        assert_eq!(d.dst_ext(), Some(".css"));
    }

    #[test]
    fn test_descriptor_without_dst() {
        let d: TaskDescriptor = toml::from_str("id = \"lint:js:style\"\nsrc = [\"src/js\", \"**/*.js\"]").unwrap();
        assert!(d.dst.is_none());
        assert!(d.dst_root().is_none());
    }

    #[test]
    fn test_descriptor_resolved_against() {
        let d = TaskDescriptor::new("copy:css", "src/css", "*.css").with_dst("/abs/out", ".css");
        let r = d.resolved_against(Path::new("/project"));
        assert_eq!(r.src_root(), Path::new("/project/src/css"));
        assert_eq!(r.dst_root(), Some(Path::new("/abs/out")));
        assert_eq!(r.pattern(), "*.css");
    }

    #[test]
    fn test_task_input_accessors() {
        let d = TaskDescriptor::new("test:js", "/p/test", "**/*.js");
        let input = TaskInput::Declared(&d);
        assert_eq!(input.source(), Path::new("/p/test"));
        assert!(input.destination().is_none());
        assert!(matches!(input.require_destination(), Err(TaskError::MissingDestination(_))));

        let e = d.expand(PathBuf::from("/p/test/a.js"), PathBuf::from("/p/out/a.js"));
        let input = TaskInput::Expanded(&e);
        assert_eq!(input.id(), "test:js");
        assert_eq!(input.source(), Path::new("/p/test/a.js"));
        assert_eq!(input.destination(), Some(Path::new("/p/out/a.js")));
    }
}
