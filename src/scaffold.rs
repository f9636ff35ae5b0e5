//! Project scaffolding for `warhorse create`
//!
//! Lays out a new project from a named [`Convention`] and the answers
//! collected on the command line.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::CONFIG_FILE;
use crate::templates::{generate_config, Convention};

/// Error during project scaffolding
#[derive(Debug, Error)]
pub enum ScaffoldError {
    /// Project already has a warhorse.toml
    #[error("File already exists: {}", .0.display())]
    FileExists(PathBuf),
    /// Failed to create directory
    #[error("Failed to create directory: {0}")]
    CreateDir(std::io::Error),
    /// Failed to write file
    #[error("Failed to write file: {0}")]
    WriteFile(std::io::Error),
    /// No convention with that name
    #[error("Unknown convention '{0}'. Available: web, library")]
    UnknownConvention(String),
    /// Invalid project name
    #[error("Invalid project name '{0}'. Use lowercase letters, numbers, '-', '_' and '.'.")]
    InvalidName(String),
}

/// Answers used to fill in the project templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldAnswers {
    pub name: String,
    pub version: String,
    pub description: String,
    pub author: String,
}

impl Default for ScaffoldAnswers {
    fn default() -> Self {
        Self {
            name: String::new(),
            version: "0.1.0".to_string(),
            description: "A warhorse project".to_string(),
            author: String::new(),
        }
    }
}

/// Validate a project name.
///
/// Names follow npm package naming: non-empty, lowercase, and made of
/// letters, digits, `-`, `_` and `.`, not starting with `.` or `_`.
fn validate_name(name: &str) -> Result<(), ScaffoldError> {
    let valid = match name.chars().next() {
        Some(first) => {
            first != '.'
                && first != '_'
                && name.chars().all(|c| {
                    c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '_' | '.')
                })
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(ScaffoldError::InvalidName(name.to_string()))
    }
}

/// Create a project in `root` from a named convention.
///
/// Refuses to touch a directory that already has a `warhorse.toml`. Other
/// existing starter files are left as they are.
///
/// Returns the paths written, `warhorse.toml` first.
pub fn scaffold(
    root: &Path,
    convention: &str,
    answers: &ScaffoldAnswers,
) -> Result<Vec<PathBuf>, ScaffoldError> {
    let convention = Convention::from_str(convention)
        .ok_or_else(|| ScaffoldError::UnknownConvention(convention.to_string()))?;
    validate_name(&answers.name)?;

    let config_path = root.join(CONFIG_FILE);
    if config_path.exists() {
        return Err(ScaffoldError::FileExists(config_path));
    }

    for dir in convention.directories() {
        create_dir(&root.join(dir))?;
    }

    write_file(&config_path, &generate_config(convention, answers))?;
    let mut written = vec![config_path];

    for (relative, contents) in convention.starter_files(answers) {
        let path = root.join(relative);
        if path.exists() {
            tracing::debug!("keeping existing {}", path.display());
            continue;
        }
        if let Some(parent) = path.parent() {
            create_dir(parent)?;
        }
        write_file(&path, &contents)?;
        written.push(path);
    }

    tracing::info!(
        "Created {} project '{}' in {}",
        convention.name(),
        answers.name,
        root.display()
    );
    Ok(written)
}

fn create_dir(path: &Path) -> Result<(), ScaffoldError> {
    fs::create_dir_all(path).map_err(ScaffoldError::CreateDir)
}

fn write_file(path: &Path, content: &str) -> Result<(), ScaffoldError> {
    fs::write(path, content).map_err(ScaffoldError::WriteFile)
}
