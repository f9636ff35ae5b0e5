//! External tool plumbing.
//!
//! - **cmdline**: compile positional args and ordered options into a command line
//! - **process**: run a command line as a child process
//! - **invoker**: resolve executables, run them, and route their output
//! - **report**: parse and print the two lint report shapes

pub mod cmdline;
pub mod invoker;
pub mod process;
pub mod report;

pub use cmdline::*;
pub use invoker::*;
pub use process::*;
pub use report::*;
