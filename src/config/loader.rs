//! Configuration loading and discovery for `warhorse.toml`
//!
//! The built-in defaults are merged with the project's `warhorse.toml` and
//! then with command-line overrides, producing the one immutable
//! [`WarhorseConfig`] a run works from.

use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::schema::{PipelineKind, ToolTable, TypePipelines, WarhorseConfig, WatchConfig};
use crate::build::TaskDescriptor;

/// Name of the project configuration file.
pub const CONFIG_FILE: &str = "warhorse.toml";

const DEFAULTS: &str = include_str!("defaults.toml");

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse warhorse.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// Project section of a user config; every field optional.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct UserProjectConfig {
    pub name: Option<String>,
    pub version: Option<String>,
    pub src: Option<PathBuf>,
    pub test: Option<PathBuf>,
    pub build: Option<PathBuf>,
    pub dist: Option<PathBuf>,
    pub docs: Option<PathBuf>,
}

/// A `warhorse.toml` as written by the user, before merging.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct UserConfig {
    #[serde(default)]
    pub project: UserProjectConfig,
    pub tools_root: Option<PathBuf>,
    #[serde(default)]
    pub pipelines: HashMap<PipelineKind, TypePipelines>,
    #[serde(default)]
    pub tools: HashMap<String, ToolTable>,
    pub publish: Option<Vec<TaskDescriptor>>,
    pub watch: Option<WatchConfig>,
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Override the tool installation root
    pub tools_root: Option<PathBuf>,
}

/// Find warhorse.toml by walking up from the current working directory.
pub fn find_config() -> Option<PathBuf> {
    env::current_dir().ok().and_then(find_config_from)
}

/// Find warhorse.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// The built-in configuration.
pub fn default_config() -> WarhorseConfig {
    // defaults.toml is embedded at compile time and parsed in tests
    toml::from_str(DEFAULTS).expect("embedded defaults.toml is valid")
}

/// Final component of a directory, used as a fallback project name.
pub fn dir_name(dir: &Path) -> Option<String> {
    dir.file_name().map(|n| n.to_string_lossy().into_owned())
}

/// Merge a user config over a base config.
///
/// A pipeline kind or tool kind the user declares replaces the base one
/// wholesale, keeping the user's type order; kinds the user leaves out keep
/// the base value.
pub fn merge_user_config(mut base: WarhorseConfig, user: UserConfig) -> WarhorseConfig {
    let project = user.project;
    if let Some(name) = project.name {
        base.project.name = name;
    }
    if let Some(version) = project.version {
        base.project.version = version;
    }
    if let Some(src) = project.src {
        base.project.src = src;
    }
    if let Some(test) = project.test {
        base.project.test = test;
    }
    if let Some(build) = project.build {
        base.project.build = build;
    }
    if let Some(dist) = project.dist {
        base.project.dist = dist;
    }
    if let Some(docs) = project.docs {
        base.project.docs = docs;
    }

    if let Some(tools_root) = user.tools_root {
        base.tools_root = tools_root;
    }

    base.pipelines.extend(user.pipelines);
    base.tools.extend(user.tools);

    if let Some(publish) = user.publish {
        base.publish = publish;
    }
    if let Some(watch) = user.watch {
        base.watch = watch;
    }

    base
}

/// Load configuration.
///
/// With a path, loads that file over the defaults. Without one, uses
/// [`find_config`]; if nothing is found the defaults are returned, named
/// after the current directory.
pub fn load_config(path: Option<&Path>) -> Result<WarhorseConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => load_config_file(&p),
        None => {
            let mut config = default_config();
            if let Some(name) = env::current_dir().ok().as_deref().and_then(dir_name) {
                config.project.name = name;
            }
            Ok(config)
        }
    }
}

/// Load configuration from a specific file path.
///
/// Without a `project.name` the project is named after the directory
/// holding the file.
fn load_config_file(path: &Path) -> Result<WarhorseConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let user: UserConfig = toml::from_str(&contents)?;
    let unnamed = user.project.name.is_none();
    let mut config = merge_user_config(default_config(), user);

    if unnamed {
        let root = fs::canonicalize(path)?;
        if let Some(name) = root.parent().and_then(dir_name) {
            config.project.name = name;
        }
    }

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }

    Ok(config)
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values.
pub fn merge_cli_overrides(config: &mut WarhorseConfig, overrides: &CliOverrides) {
    if let Some(ref tools_root) = overrides.tools_root {
        config.tools_root = tools_root.clone();
    }
}

/// Get the project root directory from a config file path.
pub fn project_root(config_path: &Path) -> Option<&Path> {
    config_path.parent()
}
