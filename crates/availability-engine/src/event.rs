//! Calendar events as supplied by the calendar provider, already expanded to
//! concrete instances.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{AvailabilityError, Result};
use crate::window::TimeWindow;

/// A busy entry on a user's calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Event {
    /// An event with concrete start and end instants.
    Timed {
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    },
    /// A date-only event. `end_date` is exclusive, following the usual
    /// calendar convention, so `start_date == end_date` blocks nothing.
    WholeDay {
        start_date: NaiveDate,
        end_date: NaiveDate,
    },
}

impl Event {
    /// Reject events whose range is empty or inverted.
    ///
    /// # Errors
    /// Returns `AvailabilityError::InvalidEvent` for a timed event with
    /// `start >= end` or a whole-day event with `end_date < start_date`.
    pub fn validate(&self) -> Result<()> {
        match self {
            Event::Timed { start, end } if start >= end => Err(AvailabilityError::InvalidEvent(
                format!("timed event starts at {} but ends at {}", start, end),
            )),
            Event::WholeDay {
                start_date,
                end_date,
            } if end_date < start_date => Err(AvailabilityError::InvalidEvent(format!(
                "whole-day event starts on {} but ends on {}",
                start_date, end_date
            ))),
            _ => Ok(()),
        }
    }

    /// Whether this is a whole-day event blocking the civil date `date`.
    ///
    /// Timed events never block a whole date, even when they span it.
    pub fn covers_date(&self, date: NaiveDate) -> bool {
        match self {
            Event::Timed { .. } => false,
            Event::WholeDay {
                start_date,
                end_date,
            } => *start_date <= date && date < *end_date,
        }
    }

    /// Whether the event is entirely behind `now` (whose civil date is `today`).
    pub fn is_past(&self, now: DateTime<FixedOffset>, today: NaiveDate) -> bool {
        match self {
            Event::Timed { end, .. } => *end <= now,
            Event::WholeDay { end_date, .. } => *end_date < today,
        }
    }

    /// Whether the event has any bearing on `window`'s day.
    pub fn touches(&self, window: &TimeWindow) -> bool {
        match self {
            Event::Timed { start, end } => window.overlaps(*start, *end),
            Event::WholeDay { .. } => self.covers_date(window.date),
        }
    }
}
