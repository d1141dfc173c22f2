//! Report command for booked hours and flex-time.
//!
//! This module implements `wh report`: it fetches power events, reconstructs
//! daily uptime and renders one row per day, either as a text table or JSON.

use std::fmt::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, Local};
use serde::Serialize;
use wh_core::{
    ClassificationTable, DayReport, Emphasis, PeriodTotals, RawEvent, ReportSettings,
    crosses_week, format_flex, normalize, reconstruct, summarize,
};

use super::util::{self, ansi, format_duration, paint};
use crate::Config;
use crate::source::{EventSource, JsonlSource};

/// Width of the booked and flex columns.
const HOURS_WIDTH: usize = 6;
/// Width of the uptime column.
const UPTIME_WIDTH: usize = 7;
/// Marker appended to the date of weekend rows.
const WEEKEND_MARK: char = '*';

/// Presentation choices that do not affect the computed figures.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub date_format: String,
    pub history_days: u32,
    pub color: bool,
}

/// Computed report data.
#[derive(Debug)]
pub struct ReportData {
    pub generated_at: DateTime<FixedOffset>,
    pub settings: ReportSettings,
    pub rows: Vec<DayReport>,
    pub totals: PeriodTotals,
}

// ========== Report Generation ==========

/// Classifies, reconstructs and aggregates `events`.
///
/// Rows come back most recent day first. Event timestamps should already be in
/// the offset whose calendar dates the report is meant to show.
pub fn generate_report_data(
    events: &[RawEvent],
    table: &ClassificationTable,
    settings: &ReportSettings,
    now: DateTime<FixedOffset>,
) -> ReportData {
    let markers = normalize(table, events);
    tracing::debug!(
        raw = events.len(),
        classified = markers.len(),
        "classified events"
    );

    let buckets = reconstruct(&markers, now);
    let rows = summarize(&buckets, settings);
    let totals = PeriodTotals::from_rows(&rows);
    tracing::info!(days = rows.len(), booked = totals.booked_hours, "report generated");

    ReportData {
        generated_at: now,
        settings: *settings,
        rows,
        totals,
    }
}

// ========== Text Output ==========

fn paint_flex(text: &str, emphasis: Emphasis, color: bool) -> String {
    match emphasis {
        Emphasis::Ahead => paint(text, ansi::GREEN, color),
        Emphasis::Behind => paint(text, ansi::RED, color),
        Emphasis::Neutral => text.to_string(),
    }
}

fn days_label(days: u32) -> String {
    if days == 1 {
        "today".to_string()
    } else {
        format!("last {days} days")
    }
}

/// Formats the human-readable report output.
pub fn format_report(data: &ReportData, options: &RenderOptions) -> String {
    let mut output = String::new();
    let color = options.color;

    writeln!(
        output,
        "WORKING HOURS: {}",
        days_label(options.history_days)
    )
    .unwrap();
    writeln!(
        output,
        "Target {:.2}h/day, lunch break {:.2}h, rounding 1/{}h",
        data.settings.working_hours_per_day(),
        data.settings.lunch_break_hours(),
        data.settings.precision()
    )
    .unwrap();

    if data.rows.is_empty() {
        writeln!(output).unwrap();
        writeln!(output, "No sessions recorded in this period.").unwrap();
        writeln!(output).unwrap();
        writeln!(output, "Hint: Run 'wh rules' to see which events are counted.").unwrap();
        return output;
    }

    let dates: Vec<String> = data
        .rows
        .iter()
        .map(|row| row.date.format(&options.date_format).to_string())
        .collect();
    let date_width = dates
        .iter()
        .map(|d| d.chars().count())
        .max()
        .unwrap_or(0)
        .max("DATE".len());
    let rule = "─".repeat(date_width + 2 + HOURS_WIDTH + 2 + HOURS_WIDTH + 2 + UPTIME_WIDTH);

    writeln!(output).unwrap();
    let header = format!(
        "{:<date_width$}  {:>HOURS_WIDTH$}  {:>HOURS_WIDTH$}  {:>UPTIME_WIDTH$}  INTERVALS",
        "DATE", "BOOKED", "FLEX", "UPTIME"
    );
    writeln!(output, "{}", paint(&header, ansi::BOLD, color)).unwrap();

    let mut previous = None;
    for (row, date) in data.rows.iter().zip(&dates) {
        if previous.is_some_and(|prev| crosses_week(prev, row.date)) {
            writeln!(output, "{}", paint(&rule, ansi::DIM, color)).unwrap();
        }
        previous = Some(row.date);

        let attrs = &row.attributes;
        let (date_cell, mark) = if row.is_weekend() {
            (
                paint(&format!("{date:<date_width$}"), ansi::DIM, color),
                WEEKEND_MARK,
            )
        } else {
            (format!("{date:<date_width$}"), ' ')
        };
        let flex_cell = paint_flex(
            &format!("{:>HOURS_WIDTH$}", format_flex(attrs.flex_delta)),
            attrs.emphasis,
            color,
        );

        writeln!(
            output,
            "{date_cell}{mark} {:>HOURS_WIDTH$.2}  {flex_cell}  {:>UPTIME_WIDTH$}  {}",
            attrs.booked_hours,
            format_duration(attrs.total_uptime),
            attrs.intervals_text()
        )
        .unwrap();
    }

    // SUMMARY section
    let totals = &data.totals;
    writeln!(output).unwrap();
    writeln!(output, "SUMMARY").unwrap();
    writeln!(output, "───────").unwrap();
    writeln!(output, "Days:          {}", totals.days).unwrap();
    writeln!(
        output,
        "Uptime:        {}",
        format_duration(totals.total_uptime)
    )
    .unwrap();
    writeln!(output, "Booked hours:  {:.2}", totals.booked_hours).unwrap();
    writeln!(
        output,
        "Flex balance:  {}",
        paint_flex(&format_flex(totals.flex_delta), totals.emphasis(), color)
    )
    .unwrap();

    if data.rows.iter().any(DayReport::is_weekend) {
        writeln!(output).unwrap();
        writeln!(output, "{WEEKEND_MARK} weekend").unwrap();
    }

    output
}

// ========== JSON Output ==========

/// JSON report structure.
#[derive(Debug, Serialize)]
pub struct JsonReport {
    pub generated_at: String,
    pub settings: ReportSettings,
    pub days: Vec<JsonDay>,
    pub totals: JsonTotals,
}

#[derive(Debug, Serialize)]
pub struct JsonDay {
    pub date: String,
    pub weekend: bool,
    pub uptime_minutes: i64,
    pub booked_hours: f64,
    pub flex_hours: f64,
    pub emphasis: &'static str,
    pub intervals: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct JsonTotals {
    pub days: usize,
    pub uptime_minutes: i64,
    pub booked_hours: f64,
    pub flex_hours: f64,
}

/// Rounds to two decimals so float noise does not leak into JSON.
fn cents(hours: f64) -> f64 {
    (hours * 100.0).round() / 100.0
}

/// Formats report data as JSON.
pub fn format_report_json(data: &ReportData) -> Result<String> {
    let report = JsonReport {
        generated_at: data.generated_at.to_rfc3339(),
        settings: data.settings,
        days: data
            .rows
            .iter()
            .map(|row| JsonDay {
                date: row.date.format("%Y-%m-%d").to_string(),
                weekend: row.is_weekend(),
                uptime_minutes: row.attributes.total_uptime.num_minutes(),
                booked_hours: cents(row.attributes.booked_hours),
                flex_hours: cents(row.attributes.flex_delta),
                emphasis: row.attributes.emphasis.as_str(),
                intervals: row.attributes.interval_summary.clone(),
            })
            .collect(),
        totals: JsonTotals {
            days: data.totals.days,
            uptime_minutes: data.totals.total_uptime.num_minutes(),
            booked_hours: cents(data.totals.booked_hours),
            flex_hours: cents(data.totals.flex_delta),
        },
    };

    Ok(serde_json::to_string_pretty(&report)?)
}

// ========== Public Interface ==========

/// Runs the report command.
pub fn run(config: &Config, oldest_first: bool, color: bool, json: bool) -> Result<()> {
    let settings = config.validate().context("invalid configuration")?;
    let table = config.classification_table();
    let now = Local::now().fixed_offset();
    let since = util::history_start(now.date_naive(), config.history_days)
        .context("could not determine the start of the history window")?;

    let source = JsonlSource::from_path(&config.events_path);
    let events: Vec<RawEvent> = source
        .fetch_events(&table.providers(), since)
        .context("failed to fetch power events")?
        .into_iter()
        .map(|event| RawEvent {
            timestamp: util::to_local(event.timestamp),
            ..event
        })
        .collect();

    let mut data = generate_report_data(&events, &table, &settings, now);
    if oldest_first {
        data.rows.reverse();
    }

    if json {
        let output = format_report_json(&data)?;
        println!("{output}");
    } else {
        let options = RenderOptions {
            date_format: config.date_format.clone(),
            history_days: config.history_days,
            color,
        };
        print!("{}", format_report(&data, &options));
    }

    Ok(())
}
