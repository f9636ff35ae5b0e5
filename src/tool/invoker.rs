//! External tool invocation.
//!
//! The invoker resolves an executable, compiles the command line, runs it
//! through a [`ToolRunner`] and routes the captured output: passed through
//! to the console, parsed as a lint report, or dropped.

use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::tool::{
    build_command_line, parse_quality_report, parse_style_report, print_quality_report,
    print_style_report, ArgOptions, Invocation, ReportStyle, StdioMode, ToolOutput, ToolRunner,
};

/// What to do with a tool's standard output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum OutputMode {
    /// Discard
    Silent,
    /// Echo to the console
    #[default]
    Stdout,
    /// Parse as a style lint report and print it
    StyleReport,
    /// Parse as a quality lint report and print it
    QualityReport,
}

/// Where an executable lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Executable {
    /// Relative to the tool installation root
    Bundled(String),
    /// Looked up on `PATH`
    System(String),
}

impl Executable {
    pub fn bundled(name: impl Into<String>) -> Self {
        Executable::Bundled(name.into())
    }

    pub fn system(name: impl Into<String>) -> Self {
        Executable::System(name.into())
    }

    /// Same lookup kind under another name.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        match self {
            Executable::Bundled(_) => Executable::Bundled(name.into()),
            Executable::System(_) => Executable::System(name.into()),
        }
    }
}

/// Per-invocation execution policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvokeOptions {
    pub output: OutputMode,
    pub stdio: StdioMode,
    pub inherit_env: bool,
    pub use_equals_sign: bool,
}

impl Default for InvokeOptions {
    fn default() -> Self {
        Self {
            output: OutputMode::Stdout,
            stdio: StdioMode::Inherit,
            inherit_env: true,
            use_equals_sign: false,
        }
    }
}

/// Runs external tools and reports on their output.
pub struct ToolInvoker {
    /// Tool installation root for bundled executables
    tool_root: PathBuf,
    /// Process runner
    runner: Arc<dyn ToolRunner>,
    /// Log command lines instead of running them
    dry_run: bool,
    /// Report rendering
    style: ReportStyle,
    /// Console output (for testing)
    output: Mutex<Box<dyn Write + Send>>,
}

impl std::fmt::Debug for ToolInvoker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolInvoker")
            .field("tool_root", &self.tool_root)
            .field("dry_run", &self.dry_run)
            .field("style", &self.style)
            .finish()
    }
}

impl ToolInvoker {
    /// Create an invoker writing to stdout.
    pub fn new(tool_root: PathBuf, runner: Arc<dyn ToolRunner>) -> Self {
        Self {
            tool_root,
            runner,
            dry_run: false,
            style: ReportStyle::detect(),
            output: Mutex::new(Box::new(std::io::stdout())),
        }
    }

    /// Write console output somewhere else (disables colors).
    pub fn with_output<W: Write + Send + 'static>(mut self, output: W) -> Self {
        self.output = Mutex::new(Box::new(output));
        self.style = ReportStyle { color: false };
        self
    }

    /// Set dry-run mode.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// The tool installation root.
    pub fn tool_root(&self) -> &Path {
        &self.tool_root
    }

    /// Resolve an executable to the program path handed to the OS.
    pub fn resolve_executable(&self, executable: &Executable) -> String {
        match executable {
            Executable::Bundled(rel) => self.tool_root.join(rel).to_string_lossy().into_owned(),
            Executable::System(name) => name.clone(),
        }
    }

    /// Run a tool and route its output. Never fails.
    pub fn run<S: AsRef<str>>(
        &self,
        executable: &Executable,
        working_dir: &Path,
        args: &[S],
        options: &ArgOptions,
        invoke: InvokeOptions,
    ) -> ToolOutput {
        let program = self.resolve_executable(executable);
        let command = build_command_line(&program, args, options, invoke.use_equals_sign);
        let working_dir = absolute(working_dir);

        if self.dry_run {
            tracing::info!("[dry run] {}", command);
            return ToolOutput { status: Some(0), ..Default::default() };
        }

        tracing::debug!("running `{}` in {}", command, working_dir.display());
        let invocation =
            Invocation { command, working_dir, stdio: invoke.stdio, inherit_env: invoke.inherit_env };
        let output = self.runner.run(&invocation);

        if !output.is_success() {
            let stderr = output.stderr.trim();
            match output.status {
                Some(code) if stderr.is_empty() => {
                    tracing::warn!("{} exited with status {}", invocation.command.program, code)
                }
                Some(code) => tracing::warn!(
                    "{} exited with status {}: {}",
                    invocation.command.program,
                    code,
                    stderr
                ),
                None => tracing::warn!("{}", stderr),
            }
        } else if !output.stderr.trim().is_empty() {
            tracing::debug!("{}", output.stderr.trim());
        }

        self.emit(&output, invoke.output);
        output
    }

    fn emit(&self, output: &ToolOutput, mode: OutputMode) {
        let mut out = match self.output.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let written = match mode {
            OutputMode::Silent => Ok(()),
            OutputMode::Stdout => {
                if output.stdout.is_empty() {
                    Ok(())
                } else {
                    out.write_all(output.stdout.as_bytes())
                }
            }
            OutputMode::StyleReport => match parse_style_report(&output.stdout) {
                Ok(report) => print_style_report(&mut **out, self.style, &report).map(|_| ()),
                Err(e) => {
                    tracing::warn!("could not report on style lint data: {}", e);
                    Ok(())
                }
            },
            OutputMode::QualityReport => match parse_quality_report(&output.stdout) {
                Ok(report) => print_quality_report(&mut **out, self.style, &report).map(|_| ()),
                Err(e) => {
                    tracing::warn!("could not report on quality lint data: {}", e);
                    Ok(())
                }
            },
        };

        if let Err(e) = written.and_then(|_| out.flush()) {
            tracing::warn!("could not write tool output: {}", e);
        }
    }
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir().map(|cwd| cwd.join(path)).unwrap_or_else(|_| path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Shared buffer for capturing console output.
    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuf {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    /// Returns canned output and remembers what it was asked to run.
    struct CannedRunner {
        output: ToolOutput,
        seen: Mutex<Vec<Invocation>>,
    }

    impl CannedRunner {
        fn new(stdout: &str, status: Option<i32>) -> Arc<Self> {
            Arc::new(Self {
                output: ToolOutput { stdout: stdout.to_string(), stderr: String::new(), status },
                seen: Mutex::new(vec![]),
            })
        }
    }

    impl ToolRunner for CannedRunner {
        fn run(&self, invocation: &Invocation) -> ToolOutput {
            self.seen.lock().unwrap().push(invocation.clone());
            self.output.clone()
        }
    }

    fn invoker(runner: Arc<CannedRunner>) -> (ToolInvoker, SharedBuf) {
        let buf = SharedBuf::default();
        let invoker =
            ToolInvoker::new(PathBuf::from("/tools/bin"), runner).with_output(buf.clone());
        (invoker, buf)
    }

    #[test]
    fn test_resolve_executable() {
        let (invoker, _) = invoker(CannedRunner::new("", Some(0)));
        assert_eq!(invoker.resolve_executable(&Executable::bundled("jshint")), "/tools/bin/jshint");
        assert_eq!(invoker.resolve_executable(&Executable::system("git")), "git");
    }

    #[test]
    fn test_run_builds_invocation() {
        let runner = CannedRunner::new("", Some(0));
        let (invoker, _) = invoker(runner.clone());
        let options = ArgOptions::new().with("outfile", "/out/a.js").with("debug", false);
        invoker.run(
            &Executable::bundled("browserify"),
            Path::new("/project"),
            &["/project/src/a.js"],
            &options,
            InvokeOptions::default(),
        );

        let seen = runner.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].command.to_string(), "/tools/bin/browserify /project/src/a.js --outfile /out/a.js");
        assert_eq!(seen[0].working_dir, PathBuf::from("/project"));
        assert_eq!(seen[0].stdio, StdioMode::Inherit);
    }

    #[test]
    fn test_failure_is_returned_as_data() {
        let runner = CannedRunner::new("partial output\n", Some(2));
        let (invoker, buf) = invoker(runner);
        let output = invoker.run::<&str>(
            &Executable::bundled("mocha"),
            Path::new("/p"),
            &[],
            &ArgOptions::new(),
            InvokeOptions::default(),
        );
        assert_eq!(output.status, Some(2));
        assert_eq!(output.stdout, "partial output\n");
        assert_eq!(buf.contents(), "partial output\n");
    }

    #[test]
    fn test_silent_mode_prints_nothing() {
        let (invoker, buf) = invoker(CannedRunner::new("noise", Some(0)));
        invoker.run::<&str>(
            &Executable::bundled("x"),
            Path::new("/p"),
            &[],
            &ArgOptions::new(),
            InvokeOptions { output: OutputMode::Silent, ..Default::default() },
        );
        assert_eq!(buf.contents(), "");
    }

    #[test]
    fn test_style_report_mode_prints_report() {
        let json = r#"{"a.js": [{"line": 1, "column": 1, "message": "Oops"}]}"#;
        let (invoker, buf) = invoker(CannedRunner::new(json, Some(2)));
        invoker.run(
            &Executable::bundled("jscs"),
            Path::new("/p"),
            &["src"],
            &ArgOptions::new(),
            InvokeOptions { output: OutputMode::StyleReport, stdio: StdioMode::Pipe, ..Default::default() },
        );
        assert_eq!(buf.contents(), "✕ a.js (1 issue)\n    line 1, column 1: Oops\n");
    }

    #[test]
    fn test_unparseable_report_is_not_fatal() {
        let (invoker, buf) = invoker(CannedRunner::new("Segmentation fault", Some(139)));
        let output = invoker.run(
            &Executable::bundled("jshint"),
            Path::new("/p"),
            &["src"],
            &ArgOptions::new(),
            InvokeOptions { output: OutputMode::QualityReport, stdio: StdioMode::Pipe, ..Default::default() },
        );
        assert_eq!(output.status, Some(139));
        assert_eq!(buf.contents(), "");
    }

    #[test]
    fn test_dry_run_skips_runner() {
        let runner = CannedRunner::new("should not appear", Some(1));
        let (invoker, buf) = invoker(runner.clone());
        let invoker = invoker.with_dry_run(true);
        let output = invoker.run::<&str>(
            &Executable::bundled("x"),
            Path::new("/p"),
            &[],
            &ArgOptions::new(),
            InvokeOptions::default(),
        );
        assert!(output.is_success());
        assert!(runner.seen.lock().unwrap().is_empty());
        assert_eq!(buf.contents(), "");
    }

    #[test]
    fn test_output_mode_serde() {
        #[derive(Deserialize)]
        struct W {
            output: OutputMode,
        }
        let w: W = toml::from_str("output = \"quality-report\"").unwrap();
        assert_eq!(w.output, OutputMode::QualityReport);
        let w: W = toml::from_str("output = \"style-report\"").unwrap();
        assert_eq!(w.output, OutputMode::StyleReport);
    }
}
