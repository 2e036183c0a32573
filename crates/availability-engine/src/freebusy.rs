//! Compute free time slots for one day.
//!
//! A single sweep over the day's busy intervals (sorted by start) emits the
//! gaps between them. Overlapping intervals are absorbed by only ever moving
//! the cursor forward.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::normalize::BusyInterval;
use crate::window::TimeWindow;

/// A free time slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeSlot {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub duration_minutes: i64,
}

impl FreeSlot {
    /// Build a slot, or `None` if it would last less than one whole minute.
    pub fn new(start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> Option<Self> {
        let duration_minutes = (end - start).num_minutes();
        (duration_minutes > 0).then_some(Self {
            start,
            end,
            duration_minutes,
        })
    }

    /// True when the half-open ranges of `self` and `other` share any time.
    pub fn overlaps(&self, other: &FreeSlot) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// True when `other` lies entirely within `self`.
    pub fn contains(&self, other: &FreeSlot) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

/// Extract the free slots of `window` given its busy intervals.
///
/// `busy` must be sorted by start (as produced by [`crate::normalize::normalize`])
/// but may overlap. The sweep starts at `max(start_cursor, window.day_start)`,
/// which lets the caller begin "today" at the current moment.
pub fn extract(
    window: &TimeWindow,
    busy: &[BusyInterval],
    start_cursor: DateTime<FixedOffset>,
) -> Vec<FreeSlot> {
    let mut free_slots = Vec::new();
    let mut cursor = start_cursor
        .with_timezone(&window.offset())
        .max(window.day_start);

    for interval in busy {
        if cursor < interval.start {
            free_slots.extend(FreeSlot::new(cursor, interval.start));
        }
        cursor = cursor.max(interval.end);
    }

    // Trailing free slot after the last busy interval.
    if cursor < window.day_end {
        free_slots.extend(FreeSlot::new(cursor, window.day_end));
    }

    free_slots
}

/// Find the first slot lasting at least `min_duration_minutes`.
pub fn find_first_free_slot(slots: &[FreeSlot], min_duration_minutes: i64) -> Option<FreeSlot> {
    slots
        .iter()
        .find(|slot| slot.duration_minutes >= min_duration_minutes)
        .copied()
}

/// Keep only slots lasting at least `min_duration_minutes`, preserving order.
pub fn filter_min_duration(slots: &[FreeSlot], min_duration_minutes: i64) -> Vec<FreeSlot> {
    slots
        .iter()
        .filter(|slot| slot.duration_minutes >= min_duration_minutes)
        .copied()
        .collect()
}
