//! Warhorse - a configurable task runner for web projects
//!
//! This library provides functionality to:
//! - Load a layered `warhorse.toml` configuration of pipelines and tools
//! - Expand task descriptors into per-file invocations with mirrored destinations
//! - Compile and run external tool command lines, and normalise their lint reports
//! - Scaffold projects, write deployment templates and watch sources for changes

pub mod build;
pub mod cli;
pub mod config;
pub mod deploy;
pub mod scaffold;
pub mod tasks;
pub mod templates;
pub mod tool;
pub mod watch;
