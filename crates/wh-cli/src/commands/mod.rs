//! CLI subcommand implementations.

pub mod report;
pub mod rules;
pub mod util;
