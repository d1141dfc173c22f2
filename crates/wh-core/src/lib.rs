//! Core domain logic for uptime-based timesheets.
//!
//! This crate contains the fundamental types and logic for:
//! - Classification: mapping raw power events to session start/stop markers
//! - Reconstruction: pairing markers into per-day uptime intervals
//! - Aggregation: booked hours and flex-time per day
//!
//! Nothing here performs I/O; event sources and rendering live in `wh-cli`.

pub mod aggregate;
pub mod classify;
pub mod event;
pub mod reconstruct;
pub mod settings;

pub use aggregate::{
    DayAttributes, DayReport, Emphasis, PeriodTotals, attributes_of, crosses_week, format_flex,
    is_weekend, summarize,
};
pub use classify::{ClassificationRule, ClassificationTable, normalize};
pub use event::{EventKind, RawEvent, SessionEvent};
pub use reconstruct::{DayBucket, Interval, reconstruct};
pub use settings::{ReportSettings, ValidationError, check_history_days};
