//! Storefront CLI library.
//!
//! Argument parsing, configuration and the two commands live here so they
//! can be tested without spawning the binary.

pub mod cli;
pub mod config;
pub mod interactive;
pub mod logging;
pub mod suggest_cmd;

pub use cli::{Cli, Command};
pub use config::CliConfig;
