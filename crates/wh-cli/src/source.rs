//! Event sources: where raw power events come from.
//!
//! The bundled source reads newline-delimited JSON, one [`RawEvent`] per line.
//! Exports of the Windows System log work as-is when they carry
//! `TimeCreated` (RFC 3339), `Id` and `ProviderName`.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset};
use thiserror::Error;
use wh_core::RawEvent;

/// Errors while fetching events. All are fatal; nothing is retried.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to open event log {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read line {line} of {origin}")]
    Read {
        origin: String,
        line: usize,
        #[source]
        source: io::Error,
    },
    #[error("invalid event on line {line} of {origin}")]
    Parse {
        origin: String,
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// A supplier of raw power events.
pub trait EventSource {
    /// Returns all events at or after `since` whose provider (lowercased) is in
    /// `providers`, in no particular order.
    fn fetch_events(
        &self,
        providers: &BTreeSet<String>,
        since: DateTime<FixedOffset>,
    ) -> Result<Vec<RawEvent>, SourceError>;
}

/// Reads events from a JSON lines file, or stdin for `-`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JsonlSource {
    File(PathBuf),
    Stdin,
}

impl JsonlSource {
    pub fn from_path(path: &Path) -> Self {
        if path.as_os_str() == "-" {
            Self::Stdin
        } else {
            Self::File(path.to_path_buf())
        }
    }

    fn origin(&self) -> String {
        match self {
            Self::File(path) => path.display().to_string(),
            Self::Stdin => "stdin".to_string(),
        }
    }
}

impl EventSource for JsonlSource {
    fn fetch_events(
        &self,
        providers: &BTreeSet<String>,
        since: DateTime<FixedOffset>,
    ) -> Result<Vec<RawEvent>, SourceError> {
        let origin = self.origin();
        let events = match self {
            Self::File(path) => {
                let file = File::open(path).map_err(|source| SourceError::Open {
                    path: path.clone(),
                    source,
                })?;
                parse_events(BufReader::new(file), &origin, providers, since)?
            }
            Self::Stdin => parse_events(io::stdin().lock(), &origin, providers, since)?,
        };
        tracing::debug!(count = events.len(), %origin, %since, "fetched events");
        Ok(events)
    }
}

/// Parses JSON lines, keeping events that pass the provider and time filters.
///
/// Blank lines are skipped.
pub fn parse_events<R: BufRead>(
    reader: R,
    origin: &str,
    providers: &BTreeSet<String>,
    since: DateTime<FixedOffset>,
) -> Result<Vec<RawEvent>, SourceError> {
    let mut events = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| SourceError::Read {
            origin: origin.to_string(),
            line: idx + 1,
            source,
        })?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let event: RawEvent =
            serde_json::from_str(trimmed).map_err(|source| SourceError::Parse {
                origin: origin.to_string(),
                line: idx + 1,
                source,
            })?;
        if event.timestamp >= since && providers.contains(&event.provider.to_ascii_lowercase()) {
            events.push(event);
        }
    }
    Ok(events)
}
