//! Raw power events and the session markers derived from them.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// A power/uptime record as read from the platform event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEvent {
    /// When the event was logged.
    #[serde(alias = "TimeCreated", alias = "time_created")]
    pub timestamp: DateTime<FixedOffset>,
    /// The provider-specific event code.
    #[serde(alias = "Id", alias = "event_id")]
    pub id: u32,
    /// The provider that logged the event (e.g. `Microsoft-Windows-Kernel-General`).
    #[serde(alias = "ProviderName", alias = "provider_name")]
    pub provider: String,
}

/// Whether an event begins or ends a period of machine activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// Boot or resume from sleep.
    Start,
    /// Shutdown or suspend.
    Stop,
}

impl EventKind {
    /// String representation for display.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified session marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// The machine became active.
    Start(DateTime<FixedOffset>),
    /// The machine went down or to sleep.
    Stop(DateTime<FixedOffset>),
}

impl SessionEvent {
    /// Builds a marker of the given kind.
    pub const fn new(kind: EventKind, timestamp: DateTime<FixedOffset>) -> Self {
        match kind {
            EventKind::Start => Self::Start(timestamp),
            EventKind::Stop => Self::Stop(timestamp),
        }
    }

    /// Returns when the marker occurred.
    pub const fn timestamp(&self) -> DateTime<FixedOffset> {
        match self {
            Self::Start(ts) | Self::Stop(ts) => *ts,
        }
    }

    /// Returns true for [`SessionEvent::Start`].
    pub const fn is_start(&self) -> bool {
        matches!(self, Self::Start(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_event_accepts_event_log_field_names() {
        let json = r#"{
            "TimeCreated": "2025-01-27T08:02:11+01:00",
            "Id": 12,
            "ProviderName": "Microsoft-Windows-Kernel-General"
        }"#;
        let event: RawEvent = serde_json::from_str(json).unwrap();

        assert_eq!(event.id, 12);
        assert_eq!(event.provider, "Microsoft-Windows-Kernel-General");
        assert_eq!(event.timestamp.offset().local_minus_utc(), 3600);
    }

    #[test]
    fn raw_event_rejects_missing_timestamp() {
        let json = r#"{"id": 12, "provider": "Microsoft-Windows-Kernel-General"}"#;
        let result: Result<RawEvent, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn session_event_from_kind() {
        let ts = DateTime::parse_from_rfc3339("2025-01-27T08:00:00+01:00").unwrap();
        let start = SessionEvent::new(EventKind::Start, ts);
        let stop = SessionEvent::new(EventKind::Stop, ts);

        assert_eq!(start, SessionEvent::Start(ts));
        assert!(start.is_start());
        assert!(!stop.is_start());
        assert_eq!(stop.timestamp(), ts);
    }

    #[test]
    fn event_kind_display() {
        assert_eq!(EventKind::Start.to_string(), "start");
        assert_eq!(EventKind::Stop.to_string(), "stop");
    }
}
