//! Configuration module for the warhorse task runner
//!
//! Provides types and parsing for `warhorse.toml` project configuration,
//! layered over the built-in defaults in `defaults.toml`.

pub mod loader;
pub mod schema;

pub use loader::*;
pub use schema::*;
