//! Working hours CLI library.
//!
//! This crate provides the CLI interface, configuration and event sources
//! around `wh-core`.

mod cli;
pub mod commands;
mod config;
pub mod source;

pub use cli::{Cli, Commands, ReportArgs};
pub use config::{Config, ConfigError};
