//! JSON boundary shapes for hosts of the engine.
//!
//! Instants travel as minute-precision ISO-8601 text without a zone suffix
//! (`2024-06-02T10:00`), always in the configured civil offset. Events
//! arrive in the calendar provider's shape, where `start`/`end` carry either
//! a `dateTime` (timed) or a `date` (whole-day).

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{AvailabilityError, Result};
use crate::event::Event;
use crate::freebusy::FreeSlot;
use crate::group::MemberFreeTime;
use crate::window::{ceil_to_minute, floor_to_minute};

const INSTANT_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Render `instant` in `offset` as `YYYY-MM-DDTHH:MM`.
pub fn format_instant(instant: &DateTime<FixedOffset>, offset: FixedOffset) -> String {
    instant.with_timezone(&offset).format(INSTANT_FORMAT).to_string()
}

/// Parse an instant.
///
/// Accepts RFC 3339 with an explicit offset (converted to `offset`) or a
/// naive `YYYY-MM-DDTHH:MM[:SS[.fff]]`, which is read as civil time in `offset`.
///
/// # Errors
/// Returns `AvailabilityError::InvalidDateTime` if neither form matches.
pub fn parse_instant(s: &str, offset: FixedOffset) -> Result<DateTime<FixedOffset>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&offset));
    }
    let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, INSTANT_FORMAT))
        .map_err(|e| AvailabilityError::InvalidDateTime(format!("'{}': {}", s, e)))?;
    offset
        .from_local_datetime(&naive)
        .single()
        .ok_or_else(|| AvailabilityError::InvalidDateTime(format!("'{}' is ambiguous", s)))
}

/// Parse a `YYYY-MM-DD` civil date.
///
/// # Errors
/// Returns `AvailabilityError::InvalidDateTime` on malformed input.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| AvailabilityError::InvalidDateTime(format!("'{}': {}", s, e)))
}

/// One side of a provider event: a timestamp or a bare date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEventTime {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// A calendar event as delivered by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub start: RawEventTime,
    pub end: RawEventTime,
}

impl RawEvent {
    /// Convert to an [`Event`], reading naive timestamps in `offset`.
    ///
    /// Range checks are left to [`Event::validate`].
    ///
    /// # Errors
    /// Returns `AvailabilityError::InvalidRecord` when the two sides are not
    /// both timestamps or both dates, and `InvalidDateTime` when a value
    /// does not parse.
    pub fn to_event(&self, offset: FixedOffset) -> Result<Event> {
        match (&self.start, &self.end) {
            (
                RawEventTime {
                    date_time: Some(start),
                    ..
                },
                RawEventTime {
                    date_time: Some(end),
                    ..
                },
            ) => Ok(Event::Timed {
                start: parse_instant(start, offset)?,
                end: parse_instant(end, offset)?,
            }),
            (
                RawEventTime {
                    date_time: None,
                    date: Some(start),
                },
                RawEventTime {
                    date_time: None,
                    date: Some(end),
                },
            ) => Ok(Event::WholeDay {
                start_date: parse_date(start)?,
                end_date: parse_date(end)?,
            }),
            _ => Err(AvailabilityError::InvalidRecord(format!(
                "event {:?} needs dateTime or date on both start and end",
                self.summary.as_deref().unwrap_or("<untitled>")
            ))),
        }
    }
}

/// Parse a JSON array of provider events.
///
/// Nested arrays (batches of events appended per fetch) are flattened.
/// Records that fail to convert are skipped with a warning.
///
/// # Errors
/// Returns `AvailabilityError::InvalidRecord` if `json` is not a JSON array.
pub fn parse_events(json: &str, offset: FixedOffset) -> Result<Vec<Event>> {
    let values: Vec<serde_json::Value> = serde_json::from_str(json)
        .map_err(|e| AvailabilityError::InvalidRecord(format!("events JSON: {}", e)))?;

    let mut events = Vec::new();
    let mut stack: Vec<serde_json::Value> = values.into_iter().rev().collect();
    while let Some(value) = stack.pop() {
        if let serde_json::Value::Array(batch) = value {
            stack.extend(batch.into_iter().rev());
            continue;
        }
        let converted = serde_json::from_value::<RawEvent>(value)
            .map_err(|e| AvailabilityError::InvalidRecord(e.to_string()))
            .and_then(|raw| raw.to_event(offset));
        match converted {
            Ok(event) => events.push(event),
            Err(e) => warn!(error = %e, "skipping event record"),
        }
    }
    Ok(events)
}

/// The exchanged shape of a free slot; `duration` is in minutes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotRecord {
    pub start: String,
    pub end: String,
    pub duration: i64,
}

impl SlotRecord {
    /// Render `slot` at minute precision, rounding its bounds inward.
    ///
    /// Returns `None` when nothing of the slot is left after rounding.
    pub fn from_slot(slot: &FreeSlot, offset: FixedOffset) -> Option<Self> {
        let start = ceil_to_minute(slot.start.with_timezone(&offset));
        let end = floor_to_minute(slot.end.with_timezone(&offset));
        let duration = (end - start).num_minutes();
        if duration <= 0 {
            return None;
        }
        Some(Self {
            start: format_instant(&start, offset),
            end: format_instant(&end, offset),
            duration,
        })
    }

    /// Parse back into a [`FreeSlot`]. The stored `duration` is recomputed.
    ///
    /// # Errors
    /// Returns `InvalidDateTime` for unparseable bounds and `InvalidRecord`
    /// for a slot shorter than one minute.
    pub fn to_slot(&self, offset: FixedOffset) -> Result<FreeSlot> {
        let start = parse_instant(&self.start, offset)?;
        let end = parse_instant(&self.end, offset)?;
        FreeSlot::new(start, end).ok_or_else(|| {
            AvailabilityError::InvalidRecord(format!(
                "slot {} - {} is empty",
                self.start, self.end
            ))
        })
    }
}

/// Render slots as records, dropping any that round away to nothing.
pub fn to_slot_records(slots: &[FreeSlot], offset: FixedOffset) -> Vec<SlotRecord> {
    slots
        .iter()
        .filter_map(|slot| SlotRecord::from_slot(slot, offset))
        .collect()
}

/// A stored member entry: a reference date and its computed free time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberRecord {
    pub reference_date: NaiveDate,
    pub free_time: Vec<SlotRecord>,
}

impl MemberRecord {
    /// # Errors
    /// Fails on the first slot that does not parse.
    pub fn to_member(&self, offset: FixedOffset) -> Result<MemberFreeTime> {
        let slots = self
            .free_time
            .iter()
            .map(|record| record.to_slot(offset))
            .collect::<Result<Vec<_>>>()?;
        Ok(MemberFreeTime {
            reference_date: self.reference_date,
            slots,
        })
    }
}

/// Parse a JSON array of slot records.
///
/// # Errors
/// Returns `InvalidRecord` for malformed JSON and propagates slot errors.
pub fn parse_slots(json: &str, offset: FixedOffset) -> Result<Vec<FreeSlot>> {
    let records: Vec<SlotRecord> = serde_json::from_str(json)
        .map_err(|e| AvailabilityError::InvalidRecord(format!("slots JSON: {}", e)))?;
    records.iter().map(|record| record.to_slot(offset)).collect()
}
