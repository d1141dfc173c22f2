//! Event classification.
//!
//! Maps `(provider, id)` pairs from the platform event log to session
//! markers. The reconstructor only ever sees [`SessionEvent`]s, so supporting
//! another event source means adding rules here and nothing else.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::event::{EventKind, RawEvent, SessionEvent};

/// Provider of the kernel boot/shutdown events.
pub const KERNEL_GENERAL: &str = "Microsoft-Windows-Kernel-General";
/// Provider of the resume-from-sleep event.
pub const POWER_TROUBLESHOOTER: &str = "Microsoft-Windows-Power-Troubleshooter";
/// Provider of the enter-sleep event.
pub const KERNEL_POWER: &str = "Microsoft-Windows-Kernel-Power";

/// A single classification rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationRule {
    pub provider: String,
    pub id: u32,
    pub kind: EventKind,
}

impl ClassificationRule {
    pub fn new(provider: impl Into<String>, id: u32, kind: EventKind) -> Self {
        Self {
            provider: provider.into(),
            id,
            kind,
        }
    }

    fn key(&self) -> (String, u32) {
        (self.provider.to_ascii_lowercase(), self.id)
    }
}

/// Lookup table from `(provider, id)` to [`EventKind`].
///
/// Provider names compare ASCII case-insensitively. Adding a rule for a key
/// that already exists replaces the earlier rule.
#[derive(Debug, Clone)]
pub struct ClassificationTable {
    rules: BTreeMap<(String, u32), ClassificationRule>,
}

impl Default for ClassificationTable {
    fn default() -> Self {
        Self::empty()
            .with_rule(ClassificationRule::new(KERNEL_GENERAL, 12, EventKind::Start))
            .with_rule(ClassificationRule::new(KERNEL_GENERAL, 13, EventKind::Stop))
            .with_rule(ClassificationRule::new(
                POWER_TROUBLESHOOTER,
                1,
                EventKind::Start,
            ))
            .with_rule(ClassificationRule::new(KERNEL_POWER, 42, EventKind::Stop))
    }
}

impl ClassificationTable {
    /// A table that classifies nothing.
    pub const fn empty() -> Self {
        Self {
            rules: BTreeMap::new(),
        }
    }

    /// Returns the table with `rule` added.
    #[must_use]
    pub fn with_rule(mut self, rule: ClassificationRule) -> Self {
        self.insert(rule);
        self
    }

    /// Returns the table with all `rules` added, in order.
    #[must_use]
    pub fn with_rules(mut self, rules: impl IntoIterator<Item = ClassificationRule>) -> Self {
        for rule in rules {
            self.insert(rule);
        }
        self
    }

    fn insert(&mut self, rule: ClassificationRule) {
        self.rules.insert(rule.key(), rule);
    }

    /// Returns the kind of session marker `event` denotes, if any.
    pub fn kind_of(&self, event: &RawEvent) -> Option<EventKind> {
        self.rules
            .get(&(event.provider.to_ascii_lowercase(), event.id))
            .map(|rule| rule.kind)
    }

    /// Classifies a single raw event.
    pub fn classify(&self, event: &RawEvent) -> Option<SessionEvent> {
        self.kind_of(event)
            .map(|kind| SessionEvent::new(kind, event.timestamp))
    }

    /// Lowercased names of all providers the table has rules for.
    ///
    /// Event sources use this as their fetch filter.
    pub fn providers(&self) -> BTreeSet<String> {
        self.rules.keys().map(|(provider, _)| provider.clone()).collect()
    }

    /// Iterates over all rules, ordered by provider then id.
    pub fn rules(&self) -> impl Iterator<Item = &ClassificationRule> {
        self.rules.values()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Classifies `events` and returns the session markers in ascending time order.
///
/// Events without a matching rule are dropped. Markers with equal timestamps
/// keep their input order.
pub fn normalize<'a>(
    table: &ClassificationTable,
    events: impl IntoIterator<Item = &'a RawEvent>,
) -> Vec<SessionEvent> {
    let mut markers: Vec<SessionEvent> = events
        .into_iter()
        .filter_map(|event| {
            let marker = table.classify(event);
            if marker.is_none() {
                tracing::trace!(
                    provider = %event.provider,
                    id = event.id,
                    timestamp = %event.timestamp,
                    "ignoring unclassified event"
                );
            }
            marker
        })
        .collect();
    markers.sort_by_key(SessionEvent::timestamp);
    markers
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;

    use super::*;

    fn raw(ts: &str, provider: &str, id: u32) -> RawEvent {
        RawEvent {
            timestamp: DateTime::parse_from_rfc3339(ts).unwrap(),
            id,
            provider: provider.to_string(),
        }
    }

    #[test]
    fn default_table_classifies_boot_and_shutdown() {
        let table = ClassificationTable::default();

        let boot = raw("2025-01-27T08:00:00+01:00", KERNEL_GENERAL, 12);
        let shutdown = raw("2025-01-27T17:00:00+01:00", KERNEL_GENERAL, 13);

        assert_eq!(table.kind_of(&boot), Some(EventKind::Start));
        assert_eq!(table.kind_of(&shutdown), Some(EventKind::Stop));
    }

    #[test]
    fn default_table_classifies_sleep_and_resume() {
        let table = ClassificationTable::default();

        let resume = raw("2025-01-27T13:00:00+01:00", POWER_TROUBLESHOOTER, 1);
        let sleep = raw("2025-01-27T12:00:00+01:00", KERNEL_POWER, 42);

        assert_eq!(table.kind_of(&resume), Some(EventKind::Start));
        assert_eq!(table.kind_of(&sleep), Some(EventKind::Stop));
    }

    #[test]
    fn unknown_pairs_are_not_classified() {
        let table = ClassificationTable::default();

        assert_eq!(
            table.kind_of(&raw("2025-01-27T08:00:00Z", KERNEL_GENERAL, 1)),
            None
        );
        assert_eq!(
            table.kind_of(&raw("2025-01-27T08:00:00Z", "Service Control Manager", 12)),
            None
        );
    }

    #[test]
    fn provider_match_ignores_case() {
        let table = ClassificationTable::default();
        let event = raw("2025-01-27T08:00:00Z", "microsoft-windows-kernel-general", 12);
        assert_eq!(table.kind_of(&event), Some(EventKind::Start));
    }

    #[test]
    fn added_rule_extends_table() {
        let table = ClassificationTable::default().with_rule(ClassificationRule::new(
            "systemd-logind",
            1,
            EventKind::Stop,
        ));

        assert_eq!(table.len(), 5);
        let event = raw("2025-01-27T08:00:00Z", "systemd-logind", 1);
        assert_eq!(table.kind_of(&event), Some(EventKind::Stop));
        assert!(table.providers().contains("systemd-logind"));
    }

    #[test]
    fn added_rule_overrides_existing_key() {
        let table = ClassificationTable::default().with_rule(ClassificationRule::new(
            "MICROSOFT-WINDOWS-KERNEL-POWER",
            42,
            EventKind::Start,
        ));

        assert_eq!(table.len(), 4);
        let event = raw("2025-01-27T08:00:00Z", KERNEL_POWER, 42);
        assert_eq!(table.kind_of(&event), Some(EventKind::Start));
    }

    #[test]
    fn providers_are_deduplicated_and_lowercased() {
        let providers = ClassificationTable::default().providers();
        let expected: BTreeSet<String> = [
            "microsoft-windows-kernel-general",
            "microsoft-windows-kernel-power",
            "microsoft-windows-power-troubleshooter",
        ]
        .into_iter()
        .map(String::from)
        .collect();
        assert_eq!(providers, expected);
    }

    #[test]
    fn normalize_drops_unknown_and_sorts() {
        let table = ClassificationTable::default();
        let events = vec![
            raw("2025-01-27T17:00:00+01:00", KERNEL_GENERAL, 13),
            raw("2025-01-27T09:00:00+01:00", "Service Control Manager", 7036),
            raw("2025-01-27T08:00:00+01:00", KERNEL_GENERAL, 12),
        ];

        let markers = normalize(&table, &events);

        assert_eq!(markers.len(), 2);
        assert!(markers[0].is_start());
        assert!(matches!(markers[1], SessionEvent::Stop(_)));
        assert!(markers[0].timestamp() < markers[1].timestamp());
    }

    #[test]
    fn normalize_orders_across_offsets_by_instant() {
        let table = ClassificationTable::default();
        // 08:30+01:00 is 07:30Z, which is earlier than 08:00Z.
        let events = vec![
            raw("2025-01-27T08:00:00Z", KERNEL_GENERAL, 13),
            raw("2025-01-27T08:30:00+01:00", KERNEL_GENERAL, 12),
        ];

        let markers = normalize(&table, &events);

        assert!(markers[0].is_start());
        assert!(matches!(markers[1], SessionEvent::Stop(_)));
    }

    #[test]
    fn empty_table_classifies_nothing() {
        let table = ClassificationTable::empty();
        let events = vec![raw("2025-01-27T08:00:00Z", KERNEL_GENERAL, 12)];
        assert!(table.is_empty());
        assert!(normalize(&table, &events).is_empty());
    }
}
