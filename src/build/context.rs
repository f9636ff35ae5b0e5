//! Run context: the merged configuration plus the flags of one invocation.

use crate::config::WarhorseConfig;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Everything a pipeline run reads, fixed before the run starts.
///
/// The configuration is shared behind an [`Arc`] so watch mode can re-run
/// pipelines without cloning it.
#[derive(Debug, Clone)]
pub struct BuildContext {
    /// The merged configuration
    config: Arc<WarhorseConfig>,
    /// Project root directory (where warhorse.toml is located)
    project_root: PathBuf,
    /// Log command lines instead of running tools
    dry_run: bool,
    /// Worker count for per-file expansion
    jobs: usize,
}

impl BuildContext {
    /// Create a new build context.
    pub fn new(config: WarhorseConfig, project_root: PathBuf) -> Self {
        Self { config: Arc::new(config), project_root, dry_run: false, jobs: 1 }
    }

    /// Get the configuration.
    pub fn config(&self) -> &WarhorseConfig {
        &self.config
    }

    /// Get the project root directory.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Source directory (resolved to absolute path).
    pub fn src_dir(&self) -> PathBuf {
        self.resolve_path(&self.config.project.src)
    }

    /// Build output directory (resolved to absolute path).
    pub fn build_dir(&self) -> PathBuf {
        self.resolve_path(&self.config.project.build)
    }

    /// Distribution directory (resolved to absolute path).
    pub fn dist_dir(&self) -> PathBuf {
        self.resolve_path(&self.config.project.dist)
    }

    /// Tool installation root (resolved to absolute path).
    pub fn tools_root(&self) -> PathBuf {
        self.resolve_path(&self.config.tools_root)
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Worker count for per-file expansion; always at least 1.
    pub fn jobs(&self) -> usize {
        self.jobs
    }

    /// Set dry-run mode.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Set the number of parallel jobs.
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    /// Resolve a path relative to the project root.
    ///
    /// If the path is absolute, returns it unchanged.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_root.join(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_config;

    fn ctx() -> BuildContext {
        BuildContext::new(default_config(), PathBuf::from("/project"))
    }

    #[test]
    fn test_build_context_new() {
        let ctx = ctx();
        assert_eq!(ctx.project_root(), Path::new("/project"));
        assert!(!ctx.is_dry_run());
        assert_eq!(ctx.jobs(), 1);
    }

    #[test]
    fn test_build_context_flags() {
        let ctx = ctx().with_dry_run(true).with_jobs(4);
        assert!(ctx.is_dry_run());
        assert_eq!(ctx.jobs(), 4);
    }

    #[test]
    fn test_build_context_jobs_floor() {
        assert_eq!(ctx().with_jobs(0).jobs(), 1);
    }

    #[test]
    fn test_build_context_resolve_path() {
        let ctx = ctx();
        assert_eq!(ctx.resolve_path(Path::new("/other/path")), PathBuf::from("/other/path"));
        assert_eq!(ctx.resolve_path(Path::new("src/js")), PathBuf::from("/project/src/js"));
    }

    #[test]
    fn test_build_context_dirs() {
        let ctx = ctx();
        assert_eq!(ctx.src_dir(), PathBuf::from("/project/src"));
        assert_eq!(ctx.build_dir(), PathBuf::from("/project/build"));
        assert_eq!(ctx.dist_dir(), PathBuf::from("/project/dist"));
        assert_eq!(ctx.tools_root(), PathBuf::from("/project/node_modules/.bin"));
    }
}
