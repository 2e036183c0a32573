//! The daily active window: the span of a civil date inside which free time
//! is computed (07:00-21:00 by default).

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;

/// One civil day's active boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// The civil date this window belongs to.
    pub date: NaiveDate,
    /// `date` at the configured opening hour.
    pub day_start: DateTime<FixedOffset>,
    /// `date` at the configured closing hour.
    pub day_end: DateTime<FixedOffset>,
}

impl TimeWindow {
    /// Build the window for `date` under `config`.
    pub fn for_date(date: NaiveDate, config: &EngineConfig) -> Self {
        let offset = config.offset();
        Self {
            date,
            day_start: civil_instant(date, config.active_start_minute(), offset),
            day_end: civil_instant(date, config.active_end_minute(), offset),
        }
    }

    /// The offset the window's instants are expressed in.
    pub fn offset(&self) -> FixedOffset {
        *self.day_start.offset()
    }

    /// Whole minutes between `day_start` and `day_end`.
    pub fn duration_minutes(&self) -> i64 {
        (self.day_end - self.day_start).num_minutes()
    }

    /// True when `instant` lies in `[day_start, day_end]`.
    pub fn contains(&self, instant: DateTime<FixedOffset>) -> bool {
        self.day_start <= instant && instant <= self.day_end
    }

    /// True when the half-open range `[start, end)` overlaps the window.
    pub fn overlaps(&self, start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> bool {
        start < self.day_end && end > self.day_start
    }
}

/// The default (07:00-21:00, UTC+3) window for `date`.
pub fn window_for(date: NaiveDate) -> TimeWindow {
    TimeWindow::for_date(date, &EngineConfig::default())
}

/// `date` at `minute_of_day` civil time in `offset`.
///
/// `minute_of_day` may be 1440, which yields midnight of the following day.
pub(crate) fn civil_instant(
    date: NaiveDate,
    minute_of_day: u32,
    offset: FixedOffset,
) -> DateTime<FixedOffset> {
    let local = date.and_time(NaiveTime::MIN) + Duration::minutes(i64::from(minute_of_day));
    let utc = local - Duration::seconds(i64::from(offset.local_minus_utc()));
    DateTime::from_naive_utc_and_offset(utc, offset)
}

/// Round `instant` up to the next whole minute (unchanged if already whole).
pub(crate) fn ceil_to_minute(instant: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    let floor = floor_to_minute(instant);
    if floor == instant {
        instant
    } else {
        floor + Duration::minutes(1)
    }
}

/// Drop the seconds and sub-second part of `instant`.
pub(crate) fn floor_to_minute(instant: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    let seconds = instant.timestamp().rem_euclid(60);
    let nanos = i64::from(instant.timestamp_subsec_nanos());
    instant - Duration::seconds(seconds) - Duration::nanoseconds(nanos)
}
