//! # CLI Command Implementations
//!
//! Each subcommand of the `resource-locator` tool lives in its own file with
//! an `Args` struct derived using `clap` and an `execute` function that calls
//! into the `resource_locator` library.

pub mod completions;
pub mod dump;
pub mod locate;
