//! Deployment setup for `warhorse deploy`
//!
//! Writes an embedded [`DeployTarget`] template into the project root.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::templates::DeployTarget;

/// Error while writing a deployment template
#[derive(Debug, Error)]
pub enum DeployError {
    #[error("Unknown deployment target '{0}'. Available: travis, github, netlify")]
    UnknownTarget(String),
    /// A template file is already present; nothing was written
    #[error("File already exists: {}", .0.display())]
    FileExists(PathBuf),
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Unpack the template for `target` into `root`.
///
/// Every file is checked before anything is written, so an existing file
/// leaves the project untouched.
pub fn deploy(root: &Path, target: &str) -> Result<Vec<PathBuf>, DeployError> {
    let target =
        DeployTarget::from_str(target).ok_or_else(|| DeployError::UnknownTarget(target.to_string()))?;

    let files: Vec<(PathBuf, &str)> =
        target.files().iter().map(|(relative, contents)| (root.join(relative), *contents)).collect();

    if let Some((path, _)) = files.iter().find(|(path, _)| path.exists()) {
        return Err(DeployError::FileExists(path.clone()));
    }

    let mut written = Vec::with_capacity(files.len());
    for (path, contents) in files {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|source| DeployError::Write { path: parent.to_path_buf(), source })?;
        }
        fs::write(&path, contents).map_err(|source| DeployError::Write { path: path.clone(), source })?;
        tracing::info!("Wrote {}", path.display());
        written.push(path);
    }

    Ok(written)
}
