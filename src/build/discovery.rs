//! Source file discovery for glob expansion.

use crate::build::TaskError;
use glob::{glob, Pattern};
use std::path::{Path, PathBuf};

/// Discover files matching a glob pattern under a base directory.
///
/// Only `pattern` is matched as a glob; `base_dir` is taken literally.
/// Directories are skipped. The result is sorted so expansion order is
/// stable across platforms.
pub fn discover_files(base_dir: &Path, pattern: &str) -> Result<Vec<PathBuf>, TaskError> {
    let escaped_base = PathBuf::from(Pattern::escape(&base_dir.to_string_lossy()));
    let full_pattern = escaped_base.join(pattern);
    let pattern_str = full_pattern.to_string_lossy();

    let paths = glob(&pattern_str).map_err(|e| TaskError::InvalidPattern(pattern.to_string(), e))?;

    let mut files = Vec::new();
    for entry in paths {
        match entry {
            Ok(path) => {
                if path.is_file() {
                    files.push(path);
                }
            }
            Err(e) => {
                tracing::warn!("error reading path: {}", e);
            }
        }
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_discover_files_recursive() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "b.less");
        touch(temp.path(), "nested/a.less");
        touch(temp.path(), "nested/skip.css");

        let files = discover_files(temp.path(), "**/*.less").unwrap();
        assert_eq!(files, vec![temp.path().join("b.less"), temp.path().join("nested/a.less")]);
    }

    #[test]
    fn test_discover_files_skips_directories() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("dir.js")).unwrap();
        touch(temp.path(), "real.js");

        let files = discover_files(temp.path(), "*.js").unwrap();
        assert_eq!(files, vec![temp.path().join("real.js")]);
    }

    #[test]
    fn test_discover_files_partials_excluded() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "main.scss");
        touch(temp.path(), "_vars.scss");

        let files = discover_files(temp.path(), "**/[!_]*.scss").unwrap();
        assert_eq!(files, vec![temp.path().join("main.scss")]);
    }

    #[test]
    fn test_discover_files_base_with_glob_characters() {
        let temp = TempDir::new().unwrap();
        let base = temp.path().join("site[v2]").join("src*");
        touch(&base, "css/a.css");
        touch(&temp.path().join("site2").join("srcx"), "css/b.css");

        let files = discover_files(&base, "**/*.css").unwrap();
        assert_eq!(files, vec![base.join("css/a.css")]);
    }

    #[test]
    fn test_discover_files_no_matches() {
        let temp = TempDir::new().unwrap();
        assert!(discover_files(temp.path(), "**/*.js").unwrap().is_empty());
    }

    #[test]
    fn test_discover_files_invalid_pattern() {
        let temp = TempDir::new().unwrap();
        let result = discover_files(temp.path(), "[unclosed");
        assert!(matches!(result, Err(TaskError::InvalidPattern(_, _))));
    }
}
