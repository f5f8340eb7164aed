//! Verity CLI library.
//!
//! Configuration, command execution and output formatting for the `verity`
//! binary. Commands are generic over the research provider and document store
//! so they can run against mocks in tests.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
