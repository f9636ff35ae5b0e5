//! Lint report normalization.
//!
//! Two linters emit two JSON shapes. The style linter keys findings by file:
//!
//! ```json
//! { "src/a.js": [ { "line": 1, "column": 4, "message": "..." } ] }
//! ```
//!
//! The quality linter emits a flat list with a `file` field per finding:
//!
//! ```json
//! { "result": [ { "file": "src/a.js", "error": { "line": 1, "character": 4, "reason": "...", "code": "W033" } } ] }
//! ```
//!
//! Both are normalized into files-then-issues in first-seen order and printed
//! in the same layout.

use serde::Deserialize;
use std::io::{self, Write};
use thiserror::Error;

const ANSI_RESET: &str = "\x1b[0m";
const ANSI_GREEN: &str = "\x1b[32m";
const ANSI_RED: &str = "\x1b[31m";
const ANSI_DIM: &str = "\x1b[2m";

/// Error parsing a lint report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The tool printed nothing
    #[error("no output to parse")]
    Empty,
    /// The output is not JSON of the expected shape
    #[error("malformed report: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// One finding from the style linter.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StyleIssue {
    #[serde(default)]
    pub line: u64,
    #[serde(default)]
    pub column: u64,
    #[serde(default)]
    pub message: String,
}

/// One finding from the quality linter.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QualityIssue {
    #[serde(default)]
    pub line: u64,
    #[serde(default)]
    pub character: u64,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct QualityEntry {
    file: String,
    error: QualityIssue,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RawQualityReport {
    #[serde(default)]
    result: Vec<QualityEntry>,
}

/// Findings grouped per file, in first-seen file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport<I> {
    pub files: Vec<(String, Vec<I>)>,
}

impl<I> Default for FileReport<I> {
    fn default() -> Self {
        Self { files: Vec::new() }
    }
}

impl<I> FileReport<I> {
    /// Append an issue to its file's group, creating the group on first sight.
    pub fn push(&mut self, file: &str, issue: I) {
        match self.files.iter_mut().find(|(f, _)| f == file) {
            Some((_, issues)) => issues.push(issue),
            None => self.files.push((file.to_string(), vec![issue])),
        }
    }

    /// Total number of issues across all files.
    pub fn issue_count(&self) -> usize {
        self.files.iter().map(|(_, issues)| issues.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Style linter findings.
pub type StyleReport = FileReport<StyleIssue>;
/// Quality linter findings.
pub type QualityReport = FileReport<QualityIssue>;

/// Parse style linter output.
pub fn parse_style_report(stdout: &str) -> Result<StyleReport, ReportError> {
    if stdout.trim().is_empty() {
        return Err(ReportError::Empty);
    }

    let raw: serde_json::Map<String, serde_json::Value> = serde_json::from_str(stdout)?;
    let mut report = StyleReport::default();
    for (file, issues) in raw {
        let issues: Vec<StyleIssue> = serde_json::from_value(issues)?;
        report.files.push((file, issues));
    }
    Ok(report)
}

/// Parse quality linter output, regrouping its flat list by file.
pub fn parse_quality_report(stdout: &str) -> Result<QualityReport, ReportError> {
    if stdout.trim().is_empty() {
        return Err(ReportError::Empty);
    }

    let raw: RawQualityReport = serde_json::from_str(stdout)?;
    let mut report = QualityReport::default();
    for entry in raw.result {
        report.push(&entry.file, entry.error);
    }
    Ok(report)
}

/// Console rendering options.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportStyle {
    /// Emit ANSI colors
    pub color: bool,
}

impl ReportStyle {
    /// Color when stdout is a terminal.
    pub fn detect() -> Self {
        Self { color: atty::is(atty::Stream::Stdout) }
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.color {
            format!("{}{}{}", code, text, ANSI_RESET)
        } else {
            text.to_string()
        }
    }
}

fn write_file_header(
    out: &mut dyn Write,
    style: ReportStyle,
    file: &str,
    issue_count: usize,
) -> io::Result<()> {
    if issue_count == 0 {
        writeln!(out, "{} {}", style.paint(ANSI_GREEN, "✓"), file)
    } else {
        writeln!(
            out,
            "{} {} ({} issue{})",
            style.paint(ANSI_RED, "✕"),
            file,
            issue_count,
            if issue_count == 1 { "" } else { "s" }
        )
    }
}

/// Print a style report. Returns the total number of issues.
pub fn print_style_report(
    out: &mut dyn Write,
    style: ReportStyle,
    report: &StyleReport,
) -> io::Result<usize> {
    let mut total = 0;
    for (file, issues) in &report.files {
        write_file_header(out, style, file, issues.len())?;
        for issue in issues {
            let location = format!("line {}, column {}:", issue.line, issue.column);
            writeln!(out, "    {} {}", style.paint(ANSI_DIM, &location), issue.message)?;
        }
        total += issues.len();
    }
    Ok(total)
}

/// Print a quality report. Returns the total number of issues.
///
/// An empty report prints a single "Nothing to report" line.
pub fn print_quality_report(
    out: &mut dyn Write,
    style: ReportStyle,
    report: &QualityReport,
) -> io::Result<usize> {
    if report.is_empty() {
        writeln!(out, "Nothing to report")?;
        return Ok(0);
    }

    let mut total = 0;
    for (file, issues) in &report.files {
        write_file_header(out, style, file, issues.len())?;
        for issue in issues {
            let location = format!("line {}, character {}:", issue.line, issue.character);
            match &issue.code {
                Some(code) => writeln!(
                    out,
                    "    {} {} ({})",
                    style.paint(ANSI_DIM, &location),
                    issue.reason,
                    code
                )?,
                None => writeln!(out, "    {} {}", style.paint(ANSI_DIM, &location), issue.reason)?,
            }
        }
        total += issues.len();
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut dyn Write) -> io::Result<usize>,
    {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_parse_style_report_keeps_file_order() {
        let json = r#"{
            "src/z.js": [],
            "src/a.js": [{"line": 3, "column": 7, "message": "Missing semicolon"}]
        }"#;
        let report = parse_style_report(json).unwrap();
        assert_eq!(report.files[0].0, "src/z.js");
        assert_eq!(report.files[1].0, "src/a.js");
        assert_eq!(report.issue_count(), 1);
    }

    #[test]
    fn test_print_style_report() {
        let json = r#"{"clean.js": [], "dirty.js": [{"line": 1, "column": 2, "message": "Bad"}, {"line": 5, "column": 1, "message": "Worse"}]}"#;
        let report = parse_style_report(json).unwrap();
        let mut total = 0;
        let out = render(|w| {
            total = print_style_report(w, ReportStyle::default(), &report)?;
            Ok(total)
        });
        assert_eq!(total, 2);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "✓ clean.js");
        assert_eq!(lines[1], "✕ dirty.js (2 issues)");
        assert_eq!(lines[2], "    line 1, column 2: Bad");
        assert_eq!(lines[3], "    line 5, column 1: Worse");
    }

    #[test]
    fn test_parse_quality_report_groups_by_file() {
        let json = r#"{"result": [
            {"file": "b.js", "error": {"line": 1, "character": 1, "reason": "first", "code": "W001"}},
            {"file": "a.js", "error": {"line": 2, "character": 2, "reason": "second", "code": "W002"}},
            {"file": "b.js", "error": {"line": 3, "character": 3, "reason": "third", "code": "W003"}}
        ]}"#;
        let report = parse_quality_report(json).unwrap();
        assert_eq!(report.files.len(), 2);
        assert_eq!(report.files[0].0, "b.js");
        let reasons: Vec<_> = report.files[0].1.iter().map(|i| i.reason.as_str()).collect();
        assert_eq!(reasons, vec!["first", "third"]);
        assert_eq!(report.files[1].0, "a.js");
    }

    #[test]
    fn test_print_quality_report() {
        let json = r#"{"result": [{"file": "a.js", "error": {"line": 4, "character": 9, "reason": "Missing semicolon.", "code": "W033"}}]}"#;
        let report = parse_quality_report(json).unwrap();
        let out = render(|w| print_quality_report(w, ReportStyle::default(), &report));
        assert_eq!(out, "✕ a.js (1 issue)\n    line 4, character 9: Missing semicolon. (W033)\n");
    }

    #[test]
    fn test_print_quality_report_nothing_to_report() {
        let report = parse_quality_report(r#"{"result": []}"#).unwrap();
        let out = render(|w| print_quality_report(w, ReportStyle::default(), &report));
        assert_eq!(out, "Nothing to report\n");

        let report = parse_quality_report("{}").unwrap();
        let out = render(|w| print_quality_report(w, ReportStyle::default(), &report));
        assert_eq!(out.matches("Nothing to report").count(), 1);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(parse_style_report(""), Err(ReportError::Empty)));
        assert!(matches!(parse_quality_report("  \n"), Err(ReportError::Empty)));
        assert!(matches!(parse_style_report("not json"), Err(ReportError::Malformed(_))));
        assert!(matches!(parse_quality_report("[1, 2]"), Err(ReportError::Malformed(_))));
    }

    #[test]
    fn test_color_output() {
        let report = parse_style_report(r#"{"a.js": []}"#).unwrap();
        let out = render(|w| print_style_report(w, ReportStyle { color: true }, &report));
        assert!(out.starts_with("\x1b[32m✓\x1b[0m a.js"));
    }
}
