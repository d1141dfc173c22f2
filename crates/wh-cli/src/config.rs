//! Configuration loading and management.

use std::fmt::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use wh_core::{ClassificationRule, ClassificationTable, ReportSettings, ValidationError};

/// Errors from validating a loaded configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// The date format contains a malformed specifier or one a date cannot fill.
    #[error("invalid date format: {0:?}")]
    DateFormat(String),
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// How many days of event history to report on, including today.
    pub history_days: u32,
    /// Nominal working hours per day; the flex-time baseline.
    pub working_hours_per_day: f64,
    /// Hours subtracted from each day's uptime.
    pub lunch_break_hours: f64,
    /// Rounding denominator for booked hours (4 = quarter hours).
    pub precision: u32,
    /// `strftime` format for the date column.
    pub date_format: String,
    /// JSON lines file of raw power events; `-` reads stdin.
    pub events_path: PathBuf,
    /// Extra classification rules, applied on top of the built-in table.
    #[serde(default)]
    pub rules: Vec<ClassificationRule>,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        Self {
            history_days: 14,
            working_hours_per_day: 8.0,
            lunch_break_hours: 1.0,
            precision: 4,
            date_format: "%a %d.%m.%Y".to_string(),
            events_path: data_dir.join("events.jsonl"),
            rules: Vec::new(),
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (WH_*)
        figment = figment.merge(Env::prefixed("WH_"));

        figment.extract()
    }

    /// Checks all ranges and returns the settings the aggregator needs.
    pub fn validate(&self) -> Result<ReportSettings, ConfigError> {
        wh_core::check_history_days(self.history_days)?;
        check_date_format(&self.date_format)?;
        Ok(ReportSettings::new(
            self.lunch_break_hours,
            self.working_hours_per_day,
            self.precision,
        )?)
    }

    /// The built-in classification table extended with configured rules.
    pub fn classification_table(&self) -> ClassificationTable {
        ClassificationTable::default().with_rules(self.rules.iter().cloned())
    }
}

/// Renders a sample date, which fails for unknown specifiers and for time or
/// offset fields such as `%H` or `%z`.
fn check_date_format(format: &str) -> Result<(), ConfigError> {
    let mut sample = String::new();
    write!(sample, "{}", NaiveDate::default().format(format))
        .map_err(|_| ConfigError::DateFormat(format.to_string()))
}

/// Returns the platform-specific config directory for wh.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("wh"))
}

/// Returns the platform-specific data directory for wh.
///
/// On Linux: `~/.local/share/wh`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("wh"))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use wh_core::EventKind;

    use super::*;

    #[test]
    fn test_dirs_data_path_ends_with_wh() {
        let path = dirs_data_path().unwrap();
        assert_eq!(path.file_name().unwrap(), "wh");
    }

    #[test]
    fn test_default_config_uses_data_dir_for_events() {
        let config = Config::default();
        let data_dir = dirs_data_path().unwrap();
        assert_eq!(config.events_path, data_dir.join("events.jsonl"));
    }

    #[test]
    fn test_default_config_is_valid() {
        let settings = Config::default().validate().unwrap();
        assert_eq!(settings, ReportSettings::default());
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
history_days = 30
working_hours_per_day = 7.5
precision = 1

[[rules]]
provider = "systemd-logind"
id = 7
kind = "stop"
"#
        )
        .unwrap();

        let config = Config::load_from(Some(file.path())).unwrap();

        assert_eq!(config.history_days, 30);
        assert!((config.working_hours_per_day - 7.5).abs() < f64::EPSILON);
        assert_eq!(config.precision, 1);
        assert!((config.lunch_break_hours - 1.0).abs() < f64::EPSILON);
        assert_eq!(
            config.rules,
            vec![ClassificationRule::new("systemd-logind", 7, EventKind::Stop)]
        );
        assert_eq!(config.classification_table().len(), 5);
    }

    #[test]
    fn test_validate_rejects_zero_history() {
        let config = Config {
            history_days: 0,
            ..Config::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid(ValidationError::EmptyHistory)
        ));
    }

    #[test]
    fn test_validate_rejects_out_of_range_hours() {
        let config = Config {
            lunch_break_hours: 25.0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_date_format() {
        let config = Config {
            date_format: "%Q".to_string(),
            ..Config::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err.to_string(), r#"invalid date format: "%Q""#);
    }

    #[test]
    fn test_validate_rejects_time_specifier() {
        for format in ["%d.%m %H:%M", "%Y-%m-%d %z"] {
            let config = Config {
                date_format: format.to_string(),
                ..Config::default()
            };
            let err = config.validate().unwrap_err();
            assert!(
                matches!(&err, ConfigError::DateFormat(f) if f == format),
                "{format} should be rejected, got {err:?}"
            );
        }
    }

    #[test]
    fn test_validate_accepts_date_only_specifiers() {
        let config = Config {
            date_format: "%A %e %B %Y (week %V)".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_ok());
    }
}
