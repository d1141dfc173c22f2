//! Uptime interval reconstruction.
//!
//! Pairs session markers into `(start, stop)` intervals and groups them by the
//! calendar date of their start.
//!
//! # Algorithm Summary
//!
//! The marker sequence is walked from the most recent event backward:
//!
//! 1. Find a stop. On the very first step a trailing start means the machine
//!    is still running, so a virtual stop at `now` is used. Otherwise leading
//!    starts are discarded until a stop is found.
//! 2. Find a start, discarding any further stops on the way.
//! 3. Emit the interval into the bucket of its start date.
//!
//! Running out of markers in step 1 or 2 ends reconstruction. Whatever was
//! built so far is returned; the unmatched remainder is dropped.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate};

use crate::event::SessionEvent;

/// A continuous period of machine activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
}

impl Interval {
    /// Creates an interval. An `end` before `start` is clamped to `start`.
    pub fn new(start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    pub const fn start(&self) -> DateTime<FixedOffset> {
        self.start
    }

    pub const fn end(&self) -> DateTime<FixedOffset> {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// The calendar date the interval is booked on.
    pub fn date(&self) -> NaiveDate {
        self.start.date_naive()
    }
}

/// All intervals starting on one calendar date, oldest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayBucket {
    date: NaiveDate,
    intervals: Vec<Interval>,
}

impl DayBucket {
    fn new(first: Interval) -> Self {
        Self {
            date: first.date(),
            intervals: vec![first],
        }
    }

    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    /// Sum of all interval durations.
    pub fn total_uptime(&self) -> Duration {
        self.intervals
            .iter()
            .map(Interval::duration)
            .fold(Duration::zero(), |acc, d| acc + d)
    }
}

/// Reconstructs per-day uptime from session markers.
///
/// `events` may be in any order; a sorted copy is processed. `now` closes a
/// session that has started but not yet stopped. Buckets are returned most
/// recent day first.
pub fn reconstruct(events: &[SessionEvent], now: DateTime<FixedOffset>) -> Vec<DayBucket> {
    let mut sorted = events.to_vec();
    sorted.sort_by_key(SessionEvent::timestamp);

    let mut cursor = Cursor::new(&sorted);
    let mut buckets: Vec<DayBucket> = Vec::new();
    let mut first = true;

    while !cursor.is_exhausted() {
        let end = if first && cursor.peek().is_some_and(SessionEvent::is_start) {
            tracing::debug!(%now, "no stop after last start, closing session at now");
            Some(now)
        } else {
            cursor.take_stop()
        };
        first = false;

        let Some(end) = end else {
            break;
        };
        let Some(start) = cursor.take_start() else {
            tracing::debug!(%end, "dropping stop without a matching start");
            break;
        };

        // A virtual stop can precede the start if the clock moved backward.
        let interval = Interval::new(start, end);

        match buckets.last_mut() {
            Some(bucket) if bucket.date == interval.date() => bucket.intervals.insert(0, interval),
            _ => buckets.push(DayBucket::new(interval)),
        }
    }

    buckets
}

/// Backward-moving read position over a sorted marker slice.
struct Cursor<'a> {
    events: &'a [SessionEvent],
    remaining: usize,
}

impl<'a> Cursor<'a> {
    const fn new(events: &'a [SessionEvent]) -> Self {
        Self {
            events,
            remaining: events.len(),
        }
    }

    const fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    fn peek(&self) -> Option<&SessionEvent> {
        self.remaining
            .checked_sub(1)
            .and_then(|idx| self.events.get(idx))
    }

    fn pop(&mut self) -> Option<SessionEvent> {
        let event = *self.peek()?;
        self.remaining -= 1;
        Some(event)
    }

    /// Consumes markers until a stop is found, discarding starts on the way.
    fn take_stop(&mut self) -> Option<DateTime<FixedOffset>> {
        while let Some(event) = self.pop() {
            match event {
                SessionEvent::Stop(ts) => return Some(ts),
                SessionEvent::Start(ts) => {
                    tracing::debug!(%ts, "discarding start without a following stop");
                }
            }
        }
        None
    }

    /// Consumes markers until a start is found, discarding stops on the way.
    fn take_start(&mut self) -> Option<DateTime<FixedOffset>> {
        while let Some(event) = self.pop() {
            match event {
                SessionEvent::Start(ts) => return Some(ts),
                SessionEvent::Stop(ts) => {
                    tracing::debug!(%ts, "discarding stop without a preceding start");
                }
            }
        }
        None
    }
}
