//! Per-day aggregation: booked hours, flex-time and interval summaries.
//!
//! # Rounding
//!
//! Booked hours are rounded with [`f64::round`], which rounds half away from
//! zero. With quarter-hour precision a net time of 7h07m30s (28.5 quarters)
//! books as 7.25, and -0.125h books as -0.25.

use chrono::{Datelike, Duration, NaiveDate};

use crate::reconstruct::{DayBucket, Interval};
use crate::settings::ReportSettings;

/// Separator between formatted intervals in a day summary.
pub const INTERVAL_SEPARATOR: &str = ", ";

const SECONDS_PER_HOUR: f64 = 3600.0;

/// How a day's flex-time should be emphasized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Emphasis {
    /// Exactly on target.
    Neutral,
    /// More hours than the target.
    Ahead,
    /// Fewer hours than the target.
    Behind,
}

impl Emphasis {
    /// Classifies a flex value as displayed with two decimals.
    pub fn of(flex_delta: f64) -> Self {
        match hundredths(flex_delta) {
            0 => Self::Neutral,
            n if n > 0 => Self::Ahead,
            _ => Self::Behind,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::Ahead => "ahead",
            Self::Behind => "behind",
        }
    }
}

/// Derived figures for one day.
#[derive(Debug, Clone, PartialEq)]
pub struct DayAttributes {
    pub total_uptime: Duration,
    pub booked_hours: f64,
    pub flex_delta: f64,
    pub interval_summary: Vec<String>,
    pub emphasis: Emphasis,
}

impl DayAttributes {
    /// The interval summary joined into a single line.
    pub fn intervals_text(&self) -> String {
        self.interval_summary.join(INTERVAL_SEPARATOR)
    }
}

/// Computes the attributes of a day bucket.
pub fn attributes_of(bucket: &DayBucket, settings: &ReportSettings) -> DayAttributes {
    let total_uptime = bucket.total_uptime();
    let booked = booked_hours(total_uptime, settings);
    let flex_delta = booked - settings.working_hours_per_day();

    DayAttributes {
        total_uptime,
        booked_hours: booked,
        flex_delta,
        interval_summary: bucket.intervals().iter().map(format_interval).collect(),
        emphasis: Emphasis::of(flex_delta),
    }
}

/// Net hours after lunch, rounded to `1 / precision` of an hour.
#[allow(clippy::cast_precision_loss)]
pub fn booked_hours(total_uptime: Duration, settings: &ReportSettings) -> f64 {
    let hours = total_uptime.num_seconds() as f64 / SECONDS_PER_HOUR;
    let precision = f64::from(settings.precision());
    ((hours - settings.lunch_break_hours()) * precision).round() / precision
}

/// Formats an interval as `HH:MM-HH:MM`.
pub fn format_interval(interval: &Interval) -> String {
    format!(
        "{}-{}",
        interval.start().format("%H:%M"),
        interval.end().format("%H:%M")
    )
}

/// Formats hours with a leading sign and two decimals, e.g. `+0.25` or `-0.75`.
pub fn format_flex(hours: f64) -> String {
    let cents = hundredths(hours);
    let sign = if cents < 0 { '-' } else { '+' };
    let abs = cents.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

#[allow(clippy::cast_possible_truncation)]
fn hundredths(hours: f64) -> i64 {
    (hours * 100.0).round() as i64
}

/// Monday = 0 through Sunday = 6.
pub fn weekday_index(date: NaiveDate) -> u32 {
    date.weekday().num_days_from_monday()
}

/// Saturdays and Sundays.
pub fn is_weekend(date: NaiveDate) -> bool {
    weekday_index(date) >= 5
}

/// Whether a week boundary lies between two consecutive report rows.
///
/// Works for either row order: going forward the weekday index drops when a
/// new week starts, going backward it rises. Gaps of a week or more always
/// cross a boundary.
pub fn crosses_week(previous: NaiveDate, current: NaiveDate) -> bool {
    if (current - previous).num_days().abs() >= 7 {
        return true;
    }
    let (prev, cur) = (weekday_index(previous), weekday_index(current));
    if current >= previous {
        cur < prev
    } else {
        cur > prev
    }
}

/// One report row.
#[derive(Debug, Clone, PartialEq)]
pub struct DayReport {
    pub date: NaiveDate,
    pub attributes: DayAttributes,
}

impl DayReport {
    pub fn is_weekend(&self) -> bool {
        is_weekend(self.date)
    }
}

/// Computes a report row for every bucket, preserving bucket order.
pub fn summarize(buckets: &[DayBucket], settings: &ReportSettings) -> Vec<DayReport> {
    buckets
        .iter()
        .map(|bucket| DayReport {
            date: bucket.date(),
            attributes: attributes_of(bucket, settings),
        })
        .collect()
}

/// Sums over all rows of a report.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodTotals {
    pub days: usize,
    pub total_uptime: Duration,
    pub booked_hours: f64,
    pub flex_delta: f64,
}

impl PeriodTotals {
    pub fn from_rows(rows: &[DayReport]) -> Self {
        rows.iter().fold(
            Self {
                days: 0,
                total_uptime: Duration::zero(),
                booked_hours: 0.0,
                flex_delta: 0.0,
            },
            |acc, row| Self {
                days: acc.days + 1,
                total_uptime: acc.total_uptime + row.attributes.total_uptime,
                booked_hours: acc.booked_hours + row.attributes.booked_hours,
                flex_delta: acc.flex_delta + row.attributes.flex_delta,
            },
        )
    }

    pub fn emphasis(&self) -> Emphasis {
        Emphasis::of(self.flex_delta)
    }
}
