//! Busy-interval normalization: turn a day's raw events into busy intervals
//! clamped to that day's active window.
//!
//! Overlapping or adjacent intervals are left unmerged; the free-slot sweep
//! in [`crate::freebusy`] tolerates them.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::event::Event;
use crate::window::TimeWindow;

/// A busy range clamped to one [`TimeWindow`]. Never zero-length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyInterval {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

/// The outcome of normalizing one day's events.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NormalizedDay {
    /// Clamped busy intervals sorted by start. Empty when `blocks_whole_day`.
    pub busy: Vec<BusyInterval>,
    /// A whole-day event covers the window's date; the day has no free time.
    pub blocks_whole_day: bool,
}

/// Normalize `events` against `window`.
///
/// - A valid whole-day event covering the window's date short-circuits: the
///   result is blocked and carries no intervals.
/// - Timed events that ended at or before `now` are ignored.
/// - Remaining timed events are clamped to `[day_start, day_end]`; those
///   that clamp to nothing are dropped.
/// - Malformed events are skipped with a warning.
pub fn normalize(
    events: &[Event],
    window: &TimeWindow,
    now: DateTime<FixedOffset>,
) -> NormalizedDay {
    let valid: Vec<&Event> = events
        .iter()
        .filter(|event| match event.validate() {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "skipping malformed event");
                false
            }
        })
        .collect();

    if valid.iter().any(|event| event.covers_date(window.date)) {
        return NormalizedDay {
            busy: Vec::new(),
            blocks_whole_day: true,
        };
    }

    let offset = window.offset();
    let mut busy: Vec<BusyInterval> = valid
        .into_iter()
        .filter_map(|event| match event {
            Event::Timed { start, end } if *end > now => {
                let start = (*start).max(window.day_start).with_timezone(&offset);
                let end = (*end).min(window.day_end).with_timezone(&offset);
                (start < end).then_some(BusyInterval { start, end })
            }
            _ => None,
        })
        .collect();

    busy.sort_by_key(|interval| (interval.start, interval.end));

    NormalizedDay {
        busy,
        blocks_whole_day: false,
    }
}
