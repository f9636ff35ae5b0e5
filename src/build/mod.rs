//! Pipeline execution engine.
//!
//! # Overview
//!
//! - **Tasks**: descriptors and ids parsed from the configuration
//! - **Discovery**: expand a descriptor's source glob into files
//! - **Paths**: mirror each source file into the destination tree
//! - **Dispatch**: call the task method once, or once per matched file
//! - **Pipelines**: walk a kind's task lists type by type
//!
//! # Example
//!
//! ```ignore
//! use warhorse::build::{BuildContext, PipelineRunner};
//! use warhorse::config::{load_config, PipelineKind};
//! use warhorse::tasks::Tasks;
//!
//! let config = load_config(None)?;
//! let context = BuildContext::new(config, project_root);
//! let tasks = Tasks::from_context(&context);
//!
//! let result = PipelineRunner::new(&context, &tasks).run(PipelineKind::Build, Some("css"))?;
//! println!("{}", result.summary());
//! ```

pub mod context;
pub mod discovery;
pub mod dispatch;
pub mod path;
pub mod pipeline;
pub mod result;
pub mod task;

pub use context::*;
pub use discovery::*;
pub use dispatch::*;
pub use path::*;
pub use pipeline::*;
pub use result::*;
pub use task::*;
