//! Common availability for a group.
//!
//! Each member's free slots are re-expressed as `(day_offset, minute range)`
//! tuples relative to that member's own day 0, then intersected day by day.
//! Members are assumed to share the same current civil date; the engine does
//! not detect a violation.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Timelike};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EngineConfig;
use crate::error::Result;
use crate::freebusy::FreeSlot;
use crate::window::civil_instant;

const MINUTES_PER_DAY: i64 = 24 * 60;

/// One member's computed free time and the civil date it counts from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberFreeTime {
    /// The member's day 0.
    pub reference_date: NaiveDate,
    pub slots: Vec<FreeSlot>,
}

/// A free range on a day relative to a reference date, in minutes of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DaySlot {
    pub day_offset: i64,
    pub start_minute: u32,
    pub end_minute: u32,
}

impl DaySlot {
    fn intersection(&self, other: &DaySlot) -> Option<DaySlot> {
        if self.day_offset != other.day_offset {
            return None;
        }
        let start_minute = self.start_minute.max(other.start_minute);
        let end_minute = self.end_minute.min(other.end_minute);
        (start_minute < end_minute).then_some(DaySlot {
            day_offset: self.day_offset,
            start_minute,
            end_minute,
        })
    }
}

/// Intersects members' free time.
#[derive(Debug, Clone, Default)]
pub struct GroupIntersector {
    config: EngineConfig,
}

impl GroupIntersector {
    /// # Errors
    /// Returns `AvailabilityError::InvalidConfig` if `config` fails validation.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Convert a member's slots into day-aligned tuples clamped to the
    /// active window. Starts round up and ends round down to whole minutes.
    pub fn to_day_slots(&self, member: &MemberFreeTime) -> Vec<DaySlot> {
        let offset = self.config.offset();
        let window_start = i64::from(self.config.active_start_minute());
        let window_end = i64::from(self.config.active_end_minute());

        member
            .slots
            .iter()
            .filter_map(|slot| {
                let start = slot.start.with_timezone(&offset);
                let end = slot.end.with_timezone(&offset);
                let day = start.date_naive();
                let day_offset = (day - member.reference_date).num_days();

                let start_minute = minute_of_day(&start, Rounding::Up).max(window_start);
                let end_minute = ((end.date_naive() - day).num_days() * MINUTES_PER_DAY
                    + minute_of_day(&end, Rounding::Down))
                .min(window_end);

                (start_minute < end_minute).then(|| DaySlot {
                    day_offset,
                    start_minute: start_minute as u32,
                    end_minute: end_minute as u32,
                })
            })
            .collect()
    }

    /// Intersect members' free time, returning sorted day-aligned tuples.
    ///
    /// No members, or any member with no overlap, yields an empty result.
    pub fn intersect_day_slots(&self, members: &[MemberFreeTime]) -> Vec<DaySlot> {
        let Some((first, rest)) = members.split_first() else {
            return Vec::new();
        };

        let mut common = self.to_day_slots(first);
        for (index, member) in rest.iter().enumerate() {
            if common.is_empty() {
                break;
            }
            let next = self.to_day_slots(member);
            common = common
                .iter()
                .flat_map(|c| next.iter().filter_map(move |s| c.intersection(s)))
                .collect();
            if common.is_empty() {
                debug!(member = index + 1, "no common availability left");
            }
        }

        common.sort();
        common
    }

    /// Intersect members' free time, anchored at the first member's
    /// reference date and sorted by start.
    pub fn intersect(&self, members: &[MemberFreeTime]) -> Vec<FreeSlot> {
        let Some(anchor) = members.first().map(|m| m.reference_date) else {
            return Vec::new();
        };
        let offset = self.config.offset();

        self.intersect_day_slots(members)
            .into_iter()
            .filter_map(|slot| {
                let date = anchor.checked_add_signed(Duration::days(slot.day_offset))?;
                FreeSlot::new(
                    civil_instant(date, slot.start_minute, offset),
                    civil_instant(date, slot.end_minute, offset),
                )
            })
            .collect()
    }
}

/// Intersect members' free time with the default configuration.
pub fn intersect(members: &[MemberFreeTime]) -> Vec<FreeSlot> {
    GroupIntersector::default().intersect(members)
}

enum Rounding {
    Up,
    Down,
}

fn minute_of_day(instant: &DateTime<FixedOffset>, rounding: Rounding) -> i64 {
    let minutes = i64::from(instant.hour() * 60 + instant.minute());
    let partial = instant.second() > 0 || instant.nanosecond() > 0;
    match rounding {
        Rounding::Up if partial => minutes + 1,
        _ => minutes,
    }
}
