//! Validated report parameters.

use serde::Serialize;
use thiserror::Error;

/// Largest accepted value for any per-day hour setting.
pub const MAX_DAY_HOURS: f64 = 24.0;
/// Largest accepted precision denominator.
pub const MAX_PRECISION: u32 = 100;

/// Validation errors for report parameters.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// An hour value was negative, above 24 or not a number.
    #[error("{field} must be between 0 and 24 hours, got {value}")]
    HoursOutOfRange { field: &'static str, value: f64 },

    /// The precision denominator was outside 1..=100.
    #[error("precision must be between 1 and 100, got {value}")]
    PrecisionOutOfRange { value: u32 },

    /// The history length was zero.
    #[error("history length must be at least one day")]
    EmptyHistory,
}

/// Parameters for turning uptime into booked hours.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReportSettings {
    lunch_break_hours: f64,
    working_hours_per_day: f64,
    precision: u32,
}

impl ReportSettings {
    /// Creates settings after range validation.
    pub fn new(
        lunch_break_hours: f64,
        working_hours_per_day: f64,
        precision: u32,
    ) -> Result<Self, ValidationError> {
        check_hours("lunch_break_hours", lunch_break_hours)?;
        check_hours("working_hours_per_day", working_hours_per_day)?;
        if !(1..=MAX_PRECISION).contains(&precision) {
            return Err(ValidationError::PrecisionOutOfRange { value: precision });
        }
        Ok(Self {
            lunch_break_hours,
            working_hours_per_day,
            precision,
        })
    }

    pub const fn lunch_break_hours(&self) -> f64 {
        self.lunch_break_hours
    }

    pub const fn working_hours_per_day(&self) -> f64 {
        self.working_hours_per_day
    }

    /// Rounding granularity divisor: 1 rounds to hours, 4 to quarter hours.
    pub const fn precision(&self) -> u32 {
        self.precision
    }
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            lunch_break_hours: 1.0,
            working_hours_per_day: 8.0,
            precision: 4,
        }
    }
}

fn check_hours(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if (0.0..=MAX_DAY_HOURS).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::HoursOutOfRange { field, value })
    }
}

/// Validates a history length in days.
pub const fn check_history_days(days: u32) -> Result<u32, ValidationError> {
    if days == 0 {
        Err(ValidationError::EmptyHistory)
    } else {
        Ok(days)
    }
}
