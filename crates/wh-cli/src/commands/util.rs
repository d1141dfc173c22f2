//! Shared utilities for CLI commands.

use std::io::IsTerminal;

use chrono::{
    DateTime, Days, Duration, FixedOffset, Local, LocalResult, NaiveDate, NaiveTime, TimeZone,
};

/// ANSI style codes used by the text renderers.
pub mod ansi {
    pub const GREEN: &str = "32";
    pub const RED: &str = "31";
    pub const DIM: &str = "2";
    pub const BOLD: &str = "1";
}

/// Whether stdout should receive ANSI colors.
///
/// Honors `NO_COLOR` and `TERM=dumb`, and never colors redirected output.
pub fn color_enabled(no_color_flag: bool) -> bool {
    if no_color_flag || std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    let term = std::env::var("TERM").unwrap_or_default();
    std::io::stdout().is_terminal() && term != "dumb"
}

/// Wraps `text` in an ANSI style when `enabled`.
pub fn paint(text: &str, code: &str, enabled: bool) -> String {
    if enabled {
        format!("\x1b[{code}m{text}\x1b[0m")
    } else {
        text.to_string()
    }
}

/// Formats a duration as "Xh Ym" if >= 1 hour, "Xm" if < 1 hour.
/// Negative durations are treated as 0m.
pub fn format_duration(duration: Duration) -> String {
    let total_minutes = duration.num_minutes();
    if total_minutes < 0 {
        return "0m".to_string();
    }
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if hours >= 1 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

/// Converts a local date at midnight to a fixed-offset timestamp.
/// Handles DST ambiguity by picking the earlier time.
pub fn local_midnight(date: NaiveDate) -> Option<DateTime<FixedOffset>> {
    let midnight = date.and_time(NaiveTime::MIN);
    match Local.from_local_datetime(&midnight) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => Some(dt.fixed_offset()),
        LocalResult::None => {
            // Midnight fell into a DST gap; 1am local exists.
            let one_am = date.and_time(NaiveTime::from_hms_opt(1, 0, 0)?);
            Local
                .from_local_datetime(&one_am)
                .earliest()
                .map(|dt| dt.fixed_offset())
        }
    }
}

/// Start of the history window: local midnight `days - 1` days before `today`.
///
/// A window of one day covers only `today`. Returns `None` when the window
/// reaches past the earliest representable date.
pub fn history_start(today: NaiveDate, days: u32) -> Option<DateTime<FixedOffset>> {
    let first_day = today.checked_sub_days(Days::new(u64::from(days.saturating_sub(1))))?;
    local_midnight(first_day)
}

/// Re-expresses a timestamp in the machine's local offset.
pub fn to_local(ts: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    ts.with_timezone(&Local).fixed_offset()
}
