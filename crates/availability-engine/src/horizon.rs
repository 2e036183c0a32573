//! Free time across a rolling horizon of civil days.
//!
//! Day 0 is the civil date of `now` and starts at the current moment; every
//! later day is a fixed calendar step and starts at its window's opening.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::error::{AvailabilityError, Result};
use crate::event::Event;
use crate::freebusy::{self, FreeSlot};
use crate::group::MemberFreeTime;
use crate::normalize;
use crate::window::{ceil_to_minute, TimeWindow};

/// Free time for one civil day of the horizon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayFreeTime {
    /// Days after the reference date (0 = today).
    pub day_offset: i64,
    pub date: NaiveDate,
    /// A whole-day event blocks this date.
    pub blocked: bool,
    /// Free slots sorted by start.
    pub slots: Vec<FreeSlot>,
}

/// Drives the per-day extraction across the horizon.
#[derive(Debug, Clone, Default)]
pub struct HorizonScheduler {
    config: EngineConfig,
}

impl HorizonScheduler {
    /// # Errors
    /// Returns `AvailabilityError::InvalidConfig` if `config` fails validation.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Compute free time for each of the `horizon_days` civil days starting
    /// at `now`'s date (in the configured offset).
    ///
    /// Malformed events are dropped with a warning; they never fail the
    /// computation.
    ///
    /// # Errors
    /// Returns `AvailabilityError::InvalidHorizon` when `horizon_days` is 0.
    pub fn compute_days(
        &self,
        events: &[Event],
        now: DateTime<FixedOffset>,
        horizon_days: u32,
    ) -> Result<Vec<DayFreeTime>> {
        if horizon_days == 0 {
            return Err(AvailabilityError::InvalidHorizon(horizon_days));
        }

        let now = now.with_timezone(&self.config.offset());
        let today = now.date_naive();

        // Filter once; each day then picks the events touching its window.
        let pending: Vec<Event> = events
            .iter()
            .filter(|event| match event.validate() {
                Ok(()) => !event.is_past(now, today),
                Err(e) => {
                    warn!(error = %e, "skipping malformed event");
                    false
                }
            })
            .cloned()
            .collect();

        let days = today
            .iter_days()
            .take(horizon_days as usize)
            .zip(0i64..)
            .map(|(date, day_offset)| {
                let window = TimeWindow::for_date(date, &self.config);
                let start_cursor = if day_offset == 0 {
                    ceil_to_minute(now).max(window.day_start)
                } else {
                    window.day_start
                };

                let day_events: Vec<Event> = pending
                    .iter()
                    .filter(|event| event.touches(&window))
                    .cloned()
                    .collect();
                let normalized = normalize::normalize(&day_events, &window, now);

                let slots = if normalized.blocks_whole_day || start_cursor >= window.day_end {
                    Vec::new()
                } else {
                    freebusy::extract(&window, &normalized.busy, start_cursor)
                };

                debug!(
                    %date,
                    day_offset,
                    busy = normalized.busy.len(),
                    slots = slots.len(),
                    blocked = normalized.blocks_whole_day,
                    "computed day"
                );

                DayFreeTime {
                    day_offset,
                    date,
                    blocked: normalized.blocks_whole_day,
                    slots,
                }
            })
            .collect();

        Ok(days)
    }

    /// Compute one ordered free-slot list spanning the whole horizon.
    ///
    /// # Errors
    /// Returns `AvailabilityError::InvalidHorizon` when `horizon_days` is 0.
    pub fn compute_free_time(
        &self,
        events: &[Event],
        now: DateTime<FixedOffset>,
        horizon_days: u32,
    ) -> Result<Vec<FreeSlot>> {
        let days = self.compute_days(events, now, horizon_days)?;
        Ok(days.into_iter().flat_map(|day| day.slots).collect())
    }

    /// Like [`compute_free_time`](Self::compute_free_time), packaged with the
    /// reference date needed for group intersection.
    ///
    /// # Errors
    /// Returns `AvailabilityError::InvalidHorizon` when `horizon_days` is 0.
    pub fn member_free_time(
        &self,
        events: &[Event],
        now: DateTime<FixedOffset>,
        horizon_days: u32,
    ) -> Result<MemberFreeTime> {
        let slots = self.compute_free_time(events, now, horizon_days)?;
        Ok(MemberFreeTime {
            reference_date: now.with_timezone(&self.config.offset()).date_naive(),
            slots,
        })
    }
}

/// Compute free time with the default configuration.
///
/// # Errors
/// Returns `AvailabilityError::InvalidHorizon` when `horizon_days` is 0.
pub fn compute_free_time(
    events: &[Event],
    now: DateTime<FixedOffset>,
    horizon_days: u32,
) -> Result<Vec<FreeSlot>> {
    HorizonScheduler::default().compute_free_time(events, now, horizon_days)
}
