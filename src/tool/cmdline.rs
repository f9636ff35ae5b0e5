//! Command-line compilation for external tools.
//!
//! Positional arguments and an ordered set of `--key value` options are
//! compiled into both an argv vector (what actually gets executed) and the
//! equivalent single-line string (what gets logged).

use serde::{Deserialize, Serialize};

/// The value of a command-line option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    /// `true` emits a bare `--key`, `false` emits nothing
    Flag(bool),
    /// Integer value, emitted as `--key N`
    Number(i64),
    /// String value, emitted as `--key value`
    Text(String),
    /// Unset; the key is dropped entirely
    #[serde(skip)]
    Unset,
}

impl From<bool> for OptionValue {
    fn from(b: bool) -> Self {
        OptionValue::Flag(b)
    }
}

impl From<&str> for OptionValue {
    fn from(s: &str) -> Self {
        OptionValue::Text(s.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(s: String) -> Self {
        OptionValue::Text(s)
    }
}

impl From<i64> for OptionValue {
    fn from(n: i64) -> Self {
        OptionValue::Number(n)
    }
}

impl<T: Into<OptionValue>> From<Option<T>> for OptionValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(OptionValue::Unset)
    }
}

/// Options in insertion order.
///
/// Order is part of the contract: options compile in the order they were
/// added, and replacing an existing key keeps its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgOptions {
    entries: Vec<(String, OptionValue)>,
}

impl ArgOptions {
    /// Create an empty option set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an option, builder style.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Add or replace an option.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<OptionValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Look up an option.
    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Merge `overrides` on top, in their iteration order.
    pub fn merge<'a, I>(&mut self, overrides: I)
    where
        I: IntoIterator<Item = (&'a String, &'a OptionValue)>,
    {
        for (key, value) in overrides {
            self.set(key.clone(), value.clone());
        }
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Join positional arguments with single spaces.
pub fn compile_args<S: AsRef<str>>(args: &[S]) -> String {
    args.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(" ")
}

/// Compile options into argv tokens.
///
/// With `use_equals_sign` a value is attached as `--key=value` (one token),
/// otherwise it follows as its own token.
pub fn option_tokens(options: &ArgOptions, use_equals_sign: bool) -> Vec<String> {
    let mut tokens = Vec::new();
    for (key, value) in options.iter() {
        let rendered = match value {
            OptionValue::Unset | OptionValue::Flag(false) => continue,
            OptionValue::Flag(true) => {
                tokens.push(format!("--{}", key));
                continue;
            }
            OptionValue::Number(n) => n.to_string(),
            OptionValue::Text(s) => s.clone(),
        };

        if use_equals_sign {
            tokens.push(format!("--{}={}", key, rendered));
        } else {
            tokens.push(format!("--{}", key));
            tokens.push(rendered);
        }
    }
    tokens
}

/// Compile options into a single string.
///
/// # Examples
///
/// ```
/// use warhorse::tool::{compile_options, ArgOptions};
///
/// let options = ArgOptions::new()
///     .with("debug", false)
///     .with("recurse", true)
///     .with("outfile", "x.js");
/// assert_eq!(compile_options(&options, false), "--recurse --outfile x.js");
/// assert_eq!(compile_options(&options, true), "--recurse --outfile=x.js");
/// ```
pub fn compile_options(options: &ArgOptions, use_equals_sign: bool) -> String {
    option_tokens(options, use_equals_sign).join(" ")
}

/// A fully compiled tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    /// Executable to run
    pub program: String,
    /// Positional arguments followed by option tokens
    pub args: Vec<String>,
}

impl std::fmt::Display for CommandLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Compile an executable, positional arguments and options into a command line.
pub fn build_command_line<S: AsRef<str>>(
    executable: &str,
    args: &[S],
    options: &ArgOptions,
    use_equals_sign: bool,
) -> CommandLine {
    let mut argv: Vec<String> =
        args.iter().map(|a| a.as_ref().to_string()).filter(|a| !a.is_empty()).collect();
    argv.extend(option_tokens(options, use_equals_sign));
    CommandLine { program: executable.to_string(), args: argv }
}

/// Compile a command line to its string form.
///
/// # Examples
///
/// ```
/// use warhorse::tool::{compile_command_line, ArgOptions};
///
/// let line = compile_command_line("/bin/tool", &["a.js"], &ArgOptions::new().with("recurse", true), false);
/// assert_eq!(line, "/bin/tool a.js --recurse");
/// ```
pub fn compile_command_line<S: AsRef<str>>(
    executable: &str,
    args: &[S],
    options: &ArgOptions,
    use_equals_sign: bool,
) -> String {
    build_command_line(executable, args, options, use_equals_sign).to_string()
}
