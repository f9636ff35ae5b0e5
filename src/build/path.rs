//! Path algebra for task sources and destinations.
//!
//! Splits file paths into their parts and mirrors a source file's location
//! under a source root onto a destination root, optionally swapping the
//! extension on the way (`src/less/a/b.less` -> `build/css/a/b.css`).

use regex::Regex;
use std::path::{Component, Path, PathBuf};
use std::sync::OnceLock;

use crate::build::TaskError;

/// The parts of a file path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitPath {
    /// The path as given
    pub path: String,
    /// Parent directory (empty when the path has no directory part)
    pub directory: String,
    /// Final path component, `stem + extension`
    pub name: String,
    /// Name without its extension
    pub stem: String,
    /// Extension including the leading dot, or empty
    pub extension: String,
    /// Whether this is an rc-style dotfile such as `.jshintrc`
    pub is_config_file: bool,
}

fn config_file_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\..*rc$").expect("static pattern is valid"))
}

/// Split a path into directory, name, stem and extension.
///
/// The extension starts at the last `.` of the name, unless that dot is the
/// first character (dotfiles have no extension). Returns `None` for an empty
/// path.
///
/// # Examples
///
/// ```
/// use warhorse::build::split_path;
///
/// let parts = split_path("src/js/index.js").unwrap();
/// assert_eq!(parts.directory, "src/js");
/// assert_eq!(parts.stem, "index");
/// assert_eq!(parts.extension, ".js");
///
/// assert!(split_path(".jshintrc").unwrap().is_config_file);
/// assert!(split_path("").is_none());
/// ```
pub fn split_path(file_path: &str) -> Option<SplitPath> {
    if file_path.is_empty() {
        return None;
    }

    let path = Path::new(file_path);
    let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    let directory = path.parent().map(|p| p.to_string_lossy().into_owned()).unwrap_or_default();

    let (stem, extension) = match name.rfind('.') {
        Some(idx) if idx > 0 => (name[..idx].to_string(), name[idx..].to_string()),
        _ => (name.clone(), String::new()),
    };

    let is_config_file =
        extension.is_empty() && !name.is_empty() && config_file_pattern().is_match(&name);

    Some(SplitPath { path: file_path.to_string(), directory, name, stem, extension, is_config_file })
}

/// Compute the mirrored destination of `src_path`.
///
/// The path of `src_path` relative to `src_root` is kept, the file stem gets
/// `dst_ext` appended in place of the original extension, and the result is
/// joined onto `dst_root`.
///
/// `src_path` must lie under `src_root`; anything else is rejected with
/// [`TaskError::OutsideSourceRoot`].
///
/// # Examples
///
/// ```
/// use std::path::{Path, PathBuf};
/// use warhorse::build::resolve_destination;
///
/// let dst = resolve_destination(
///     Path::new("/p/src"),
///     Path::new("/p/src/js/a/b.less"),
///     Path::new("/p/dist"),
///     ".css",
/// )
/// .unwrap();
/// assert_eq!(dst, PathBuf::from("/p/dist/js/a/b.css"));
/// ```
pub fn resolve_destination(
    src_root: &Path,
    src_path: &Path,
    dst_root: &Path,
    dst_ext: &str,
) -> Result<PathBuf, TaskError> {
    let src_root = normalize(src_root);
    let src_path = normalize(src_path);

    let relative = src_path.strip_prefix(&src_root).map_err(|_| TaskError::OutsideSourceRoot {
        path: src_path.clone(),
        root: src_root.clone(),
    })?;

    let relative_str = relative.to_string_lossy();
    let parts = split_path(&relative_str).ok_or_else(|| TaskError::OutsideSourceRoot {
        path: src_path.clone(),
        root: src_root.clone(),
    })?;

    let file_name = format!("{}{}", parts.stem, dst_ext);
    let mirrored = match relative.parent() {
        Some(parent) => parent.join(file_name),
        None => PathBuf::from(file_name),
    };

    Ok(normalize(&dst_root.join(mirrored)))
}

/// Lexically normalize a path, dropping `.` and folding `..`.
///
/// Does not touch the filesystem, so the path need not exist.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_path_simple() {
        let parts = split_path("/p/src/js/index.js").unwrap();
        assert_eq!(parts.path, "/p/src/js/index.js");
        assert_eq!(parts.directory, "/p/src/js");
        assert_eq!(parts.name, "index.js");
        assert_eq!(parts.stem, "index");
        assert_eq!(parts.extension, ".js");
        assert!(!parts.is_config_file);
    }

    #[test]
    fn test_split_path_multiple_dots() {
        let parts = split_path("dist/app.min.js").unwrap();
        assert_eq!(parts.stem, "app.min");
        assert_eq!(parts.extension, ".js");
        assert_eq!(format!("{}{}", parts.stem, parts.extension), parts.name);
    }

    #[test]
    fn test_split_path_no_directory() {
        let parts = split_path("README").unwrap();
        assert_eq!(parts.directory, "");
        assert_eq!(parts.name, "README");
        assert_eq!(parts.stem, "README");
        assert_eq!(parts.extension, "");
    }

    #[test]
    fn test_split_path_empty() {
        assert!(split_path("").is_none());
    }

    #[test]
    fn test_split_path_config_files() {
        assert!(split_path(".jshintrc").unwrap().is_config_file);
        assert!(split_path("project/.babelrc").unwrap().is_config_file);
        assert!(!split_path(".env").unwrap().is_config_file);
        assert!(!split_path("index.js").unwrap().is_config_file);
        // Has an extension, so not an rc file even though it ends in "rc"
        assert!(!split_path("config.rc").unwrap().is_config_file);
    }

    #[test]
    fn test_split_path_name_matches_basename() {
        for p in ["a/b/c.txt", "c.txt", "/abs/.jscsrc", "x/y.tar.gz"] {
            let parts = split_path(p).unwrap();
            let basename = Path::new(p).file_name().unwrap().to_string_lossy().into_owned();
            assert_eq!(parts.name, basename);
            if !parts.extension.is_empty() {
                assert_eq!(format!("{}{}", parts.stem, parts.extension), parts.name);
            }
        }
    }

    #[test]
    fn test_resolve_destination_mirrors_structure() {
        let dst = resolve_destination(
            Path::new("/p/src"),
            Path::new("/p/src/js/a/b.less"),
            Path::new("/p/dist"),
            ".css",
        )
        .unwrap();
        assert_eq!(dst, PathBuf::from("/p/dist/js/a/b.css"));
    }

    #[test]
    fn test_resolve_destination_top_level_file() {
        let dst = resolve_destination(
            Path::new("/p/build/js"),
            Path::new("/p/build/js/app.js"),
            Path::new("/p/dist/js"),
            ".min.js",
        )
        .unwrap();
        assert_eq!(dst, PathBuf::from("/p/dist/js/app.min.js"));
    }

    #[test]
    fn test_resolve_destination_dotted_root() {
        let dst = resolve_destination(
            Path::new("/p/./src/"),
            Path::new("/p/src/css/site.css"),
            Path::new("/p/build/../dist"),
            ".css",
        )
        .unwrap();
        assert_eq!(dst, PathBuf::from("/p/dist/css/site.css"));
    }

    #[test]
    fn test_resolve_destination_outside_root() {
        let result = resolve_destination(
            Path::new("/p/src"),
            Path::new("/elsewhere/a.js"),
            Path::new("/p/dist"),
            ".js",
        );
        assert!(matches!(result, Err(TaskError::OutsideSourceRoot { .. })));
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
        assert_eq!(normalize(Path::new("a/b/")), PathBuf::from("a/b"));
    }
}
