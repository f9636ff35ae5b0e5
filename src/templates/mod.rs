//! Embedded project and deployment templates.
//!
//! ```ignore
//! use warhorse::templates::{Convention, generate_config};
//!
//! let content = generate_config(Convention::Web, &answers);
//! std::fs::write("warhorse.toml", content)?;
//! ```
//!
//! Conventions (`warhorse create <convention>`):
//! - `web`: static site with pages, scripts, stylesheets and images
//! - `library`: script library with tests and API docs
//!
//! Deployment targets (`warhorse deploy <target>`): `travis`, `github`,
//! `netlify`.

pub mod deploy;
pub mod project;

pub use deploy::*;
pub use project::*;
