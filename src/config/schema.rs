//! Configuration schema types for `warhorse.toml`
//!
//! Defines the pipelines, tool tables and project layout, plus the
//! validation rules tying them together.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use crate::build::{TaskDescriptor, TaskId};
use crate::tool::{InvokeOptions, OptionValue, OutputMode, StdioMode};

/// The pipelines a command can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineKind {
    Build,
    Test,
    Distribute,
}

impl PipelineKind {
    pub const ALL: [PipelineKind; 3] =
        [PipelineKind::Build, PipelineKind::Test, PipelineKind::Distribute];

    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineKind::Build => "build",
            PipelineKind::Test => "test",
            PipelineKind::Distribute => "distribute",
        }
    }

    /// Parse a command name into a pipeline kind.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == name)
    }
}

impl std::fmt::Display for PipelineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// File types pipelines are declared for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Css,
    Gif,
    Hbs,
    Html,
    Ico,
    Jpg,
    Js,
    Less,
    Png,
    Sass,
    Svg,
}

impl FileType {
    pub const ALL: [FileType; 11] = [
        FileType::Css,
        FileType::Gif,
        FileType::Hbs,
        FileType::Html,
        FileType::Ico,
        FileType::Jpg,
        FileType::Js,
        FileType::Less,
        FileType::Png,
        FileType::Sass,
        FileType::Svg,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Css => "css",
            FileType::Gif => "gif",
            FileType::Hbs => "hbs",
            FileType::Html => "html",
            FileType::Ico => "ico",
            FileType::Jpg => "jpg",
            FileType::Js => "js",
            FileType::Less => "less",
            FileType::Png => "png",
            FileType::Sass => "sass",
            FileType::Svg => "svg",
        }
    }

    /// Parse a type name as given on the command line.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }

    /// Map a file extension (without dot) to the type whose pipeline handles it.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "css" => Some(FileType::Css),
            "gif" => Some(FileType::Gif),
            "hbs" | "handlebars" => Some(FileType::Hbs),
            "html" | "htm" => Some(FileType::Html),
            "ico" => Some(FileType::Ico),
            "jpg" | "jpeg" => Some(FileType::Jpg),
            "js" => Some(FileType::Js),
            "less" => Some(FileType::Less),
            "png" => Some(FileType::Png),
            "sass" | "scss" => Some(FileType::Sass),
            "svg" => Some(FileType::Svg),
            _ => None,
        }
    }
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Execution policy for one task id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolConfig {
    /// Shown in the dispatch banner
    #[serde(default)]
    pub description: String,
    /// Suppress the dispatch banner
    #[serde(default)]
    pub silent: bool,
    /// Whether tools run with debug output (e.g. source maps)
    #[serde(default)]
    pub debug: bool,
    /// Expand the source glob into one invocation per file
    #[serde(default)]
    pub expand_globs: bool,
    /// What to do with the tool's stdout
    #[serde(default)]
    pub output: OutputMode,
    /// Emit `--key=value` instead of `--key value`
    #[serde(default)]
    pub use_equals_sign: bool,
    /// Child stream wiring
    #[serde(default)]
    pub stdio: StdioMode,
    /// Pass our environment to the child
    #[serde(default = "default_true")]
    pub inherit_env: bool,
    /// Replace the task method's built-in executable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executable: Option<String>,
    /// Extra options merged over the method's own flags
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub options: BTreeMap<String, OptionValue>,
}

fn default_true() -> bool {
    true
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            description: String::new(),
            silent: false,
            debug: false,
            expand_globs: false,
            output: OutputMode::Stdout,
            use_equals_sign: false,
            stdio: StdioMode::Inherit,
            inherit_env: true,
            executable: None,
            options: BTreeMap::new(),
        }
    }
}

impl ToolConfig {
    /// The invocation policy this config describes.
    pub fn invoke_options(&self) -> InvokeOptions {
        InvokeOptions {
            output: self.output,
            stdio: self.stdio,
            inherit_env: self.inherit_env,
            use_equals_sign: self.use_equals_sign,
        }
    }
}

/// Project layout section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project name
    pub name: String,
    /// Project version, used for release tags
    #[serde(default = "default_version")]
    pub version: String,
    /// Source directory
    #[serde(default = "default_src")]
    pub src: PathBuf,
    /// Test directory
    #[serde(default = "default_test")]
    pub test: PathBuf,
    /// Build output directory
    #[serde(default = "default_build")]
    pub build: PathBuf,
    /// Distribution output directory
    #[serde(default = "default_dist")]
    pub dist: PathBuf,
    /// Generated documentation directory
    #[serde(default = "default_docs")]
    pub docs: PathBuf,
}

fn default_version() -> String {
    "0.1.0".to_string()
}

fn default_src() -> PathBuf {
    PathBuf::from("src")
}

fn default_test() -> PathBuf {
    PathBuf::from("test")
}

fn default_build() -> PathBuf {
    PathBuf::from("build")
}

fn default_dist() -> PathBuf {
    PathBuf::from("dist")
}

fn default_docs() -> PathBuf {
    PathBuf::from("docs")
}

fn default_tools_root() -> PathBuf {
    PathBuf::from("node_modules/.bin")
}

/// Watch mode configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Debounce delay in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u32,
    /// Clear terminal between rebuilds
    #[serde(default)]
    pub clear_screen: bool,
}

fn default_debounce_ms() -> u32 {
    100
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self { debounce_ms: 100, clear_screen: false }
    }
}

/// Task lists per file type, in declaration order.
///
/// An unfiltered pipeline run visits types in this order, so it is kept as
/// an association list rather than a hash map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypePipelines {
    entries: Vec<(FileType, Vec<TaskDescriptor>)>,
}

impl TypePipelines {
    pub fn new() -> Self {
        Self::default()
    }

    /// Task list for a type, if declared.
    pub fn get(&self, file_type: FileType) -> Option<&[TaskDescriptor]> {
        self.entries.iter().find(|(t, _)| *t == file_type).map(|(_, tasks)| tasks.as_slice())
    }

    /// Set a type's task list, replacing an existing one in place.
    pub fn insert(&mut self, file_type: FileType, tasks: Vec<TaskDescriptor>) {
        match self.entries.iter_mut().find(|(t, _)| *t == file_type) {
            Some(entry) => entry.1 = tasks,
            None => self.entries.push((file_type, tasks)),
        }
    }

    /// Declared types, in order.
    pub fn types(&self) -> impl Iterator<Item = FileType> + '_ {
        self.entries.iter().map(|(t, _)| *t)
    }

    /// Iterate in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (FileType, &[TaskDescriptor])> {
        self.entries.iter().map(|(t, tasks)| (*t, tasks.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for TypePipelines {
    type Item = (FileType, Vec<TaskDescriptor>);
    type IntoIter = std::vec::IntoIter<(FileType, Vec<TaskDescriptor>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for TypePipelines {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_map(self.entries.iter().map(|(t, tasks)| (t, tasks)))
    }
}

// Visits the table in document order; `toml` hands keys over as written.
impl<'de> Deserialize<'de> for TypePipelines {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::{MapAccess, Visitor};
        use std::fmt;

        struct TypePipelinesVisitor;

        impl<'de> Visitor<'de> for TypePipelinesVisitor {
            type Value = TypePipelines;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a table of file types to task lists")
            }

            fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut pipelines = TypePipelines::new();
                while let Some((file_type, tasks)) =
                    map.next_entry::<FileType, Vec<TaskDescriptor>>()?
                {
                    pipelines.insert(file_type, tasks);
                }
                Ok(pipelines)
            }
        }

        deserializer.deserialize_map(TypePipelinesVisitor)
    }
}

/// Tool configs per task id.
pub type ToolTable = HashMap<String, ToolConfig>;

/// Complete warhorse configuration.
///
/// Built once per run (defaults merged with `warhorse.toml`) and never
/// mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarhorseConfig {
    /// Project layout
    pub project: ProjectConfig,
    /// Installation root of bundled tools, relative to the project root
    #[serde(default = "default_tools_root")]
    pub tools_root: PathBuf,
    /// `pipelines.<kind>.<type>` task lists
    #[serde(default)]
    pub pipelines: HashMap<PipelineKind, TypePipelines>,
    /// `tools.<kind>."<task id>"` policies; `publish` is a kind here too
    #[serde(default)]
    pub tools: HashMap<String, ToolTable>,
    /// Tasks run by the publish command, in order
    #[serde(default)]
    pub publish: Vec<TaskDescriptor>,
    /// Watch mode settings
    #[serde(default)]
    pub watch: WatchConfig,
}

/// Name of the tool table used by the publish command.
pub const PUBLISH_TOOLS: &str = "publish";

/// Configuration validation error
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "pipelines.build.js[0].id")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "warhorse.toml: '{}' {}", self.field, self.message)
    }
}

impl WarhorseConfig {
    /// Task list for a kind and type; empty when none is declared.
    pub fn pipeline(&self, kind: PipelineKind, file_type: FileType) -> &[TaskDescriptor] {
        self.pipelines.get(&kind).and_then(|types| types.get(file_type)).unwrap_or(&[])
    }

    /// Types with a declared task list for a kind, in declaration order.
    pub fn declared_types(&self, kind: PipelineKind) -> Vec<FileType> {
        self.pipelines.get(&kind).map(|types| types.types().collect()).unwrap_or_default()
    }

    /// Tool table for a kind name.
    pub fn tool_table(&self, kind: &str) -> Option<&ToolTable> {
        self.tools.get(kind)
    }

    /// Look up the tool config for a task id within a kind.
    pub fn tool_config(&self, kind: &str, task_id: &str) -> Option<&ToolConfig> {
        self.tools.get(kind).and_then(|table| table.get(task_id))
    }

    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        if self.project.name.is_empty() {
            errors.push(ConfigValidationError {
                field: "project.name".to_string(),
                message: "must be a non-empty string".to_string(),
            });
        }

        for kind in PipelineKind::ALL {
            for file_type in self.declared_types(kind) {
                for (i, task) in self.pipeline(kind, file_type).iter().enumerate() {
                    let field = format!("pipelines.{}.{}[{}]", kind, file_type, i);
                    self.validate_task(kind.as_str(), &field, task, &mut errors);
                }
            }
        }

        for (i, task) in self.publish.iter().enumerate() {
            let field = format!("publish[{}]", i);
            self.validate_task(PUBLISH_TOOLS, &field, task, &mut errors);
        }

        errors
    }

    fn validate_task(
        &self,
        kind: &str,
        field: &str,
        task: &TaskDescriptor,
        errors: &mut Vec<ConfigValidationError>,
    ) {
        if let Err(e) = TaskId::parse(&task.id) {
            errors.push(ConfigValidationError {
                field: format!("{}.id", field),
                message: e.to_string(),
            });
            return;
        }

        match self.tool_config(kind, &task.id) {
            None => errors.push(ConfigValidationError {
                field: format!("{}.id", field),
                message: format!("'{}' has no entry in [tools.{}]", task.id, kind),
            }),
            Some(tool) if tool.expand_globs && task.dst.is_none() => {
                errors.push(ConfigValidationError {
                    field: format!("{}.dst", field),
                    message: format!("'{}' expands globs and needs a destination", task.id),
                })
            }
            Some(_) => {}
        }
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}
