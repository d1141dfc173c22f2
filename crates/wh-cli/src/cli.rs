//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::Config;

/// Working hours from machine uptime.
///
/// Reconstructs daily working sessions from boot, shutdown, sleep and resume
/// events and reports booked hours and flex-time per day.
#[derive(Debug, Parser)]
#[command(name = "wh", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show booked hours and flex-time per day.
    Report(ReportArgs),

    /// List the event classification rules in effect.
    Rules {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
}

/// Options for `wh report`. Each one overrides the matching config key.
#[derive(Debug, Default, Args)]
pub struct ReportArgs {
    /// Days of history to include, counting today.
    #[arg(short, long)]
    pub days: Option<u32>,

    /// Nominal working hours per day.
    #[arg(long)]
    pub hours: Option<f64>,

    /// Lunch break in hours, subtracted from each day.
    #[arg(long)]
    pub lunch: Option<f64>,

    /// Rounding denominator: 1 = whole hours, 4 = quarter hours.
    #[arg(long)]
    pub precision: Option<u32>,

    /// Date column format (strftime syntax).
    #[arg(long)]
    pub date_format: Option<String>,

    /// JSON lines file with power events, or `-` for stdin.
    #[arg(short, long)]
    pub events: Option<PathBuf>,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,

    /// List days oldest first.
    #[arg(long)]
    pub oldest_first: bool,

    /// Disable colored output.
    #[arg(long)]
    pub no_color: bool,
}

impl ReportArgs {
    /// Applies command-line overrides on top of the loaded configuration.
    pub fn apply(&self, config: &mut Config) {
        if let Some(days) = self.days {
            config.history_days = days;
        }
        if let Some(hours) = self.hours {
            config.working_hours_per_day = hours;
        }
        if let Some(lunch) = self.lunch {
            config.lunch_break_hours = lunch;
        }
        if let Some(precision) = self.precision {
            config.precision = precision;
        }
        if let Some(format) = &self.date_format {
            config.date_format.clone_from(format);
        }
        if let Some(events) = &self.events {
            config.events_path.clone_from(events);
        }
    }
}
