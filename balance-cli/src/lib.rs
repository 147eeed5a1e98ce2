//! Balance CLI
//!
//! Straight-line flows behind the `balance` binary. Each flow talks to its
//! provider through a capability trait and writes results to the given
//! writer, so the binary passes stdout and tests pass a buffer.

pub mod cli;
pub mod flows;
pub mod logging;

pub use cli::{exit_code_for, exit_codes, Cli, Commands};
