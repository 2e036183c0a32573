//! WASM bindings for availability-engine.
//!
//! Exposes per-user free time and group intersection to the browser UI via
//! `wasm-bindgen`. All complex values are passed as JSON strings in the
//! shapes defined by [`availability_engine::wire`].
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p availability-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir web/pkg \
//!   target/wasm32-unknown-unknown/release/availability_engine_wasm.wasm
//! ```

use chrono::FixedOffset;
use serde::Deserialize;
use wasm_bindgen::prelude::*;

use availability_engine::wire::{self, MemberRecord, SlotRecord};
use availability_engine::{EngineConfig, GroupIntersector, HorizonScheduler, MemberFreeTime};

/// A member entry as stored by the host: `{ "freeTime": [...] }`, with an
/// optional `referenceDate` that defaults to the call's reference date.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MemberInput {
    reference_date: Option<String>,
    free_time: Vec<SlotRecord>,
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn offset() -> FixedOffset {
    EngineConfig::default().offset()
}

fn slots_to_json(slots: &[availability_engine::FreeSlot]) -> Result<String, JsValue> {
    let records = wire::to_slot_records(slots, offset());
    serde_json::to_string(&records)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Compute a user's free time over the next `horizon_days` days.
///
/// `events_json` is a JSON array of calendar-provider events
/// (`{start: {dateTime|date}, end: {dateTime|date}}`); `now` is an ISO 8601
/// datetime. Returns a JSON array of `{start, end, duration}` slot records.
#[wasm_bindgen(js_name = "computeFreeTime")]
pub fn compute_free_time(
    events_json: &str,
    now: &str,
    horizon_days: u32,
) -> Result<String, JsValue> {
    let offset = offset();
    let events = wire::parse_events(events_json, offset).map_err(js_err)?;
    let now = wire::parse_instant(now, offset).map_err(js_err)?;

    let slots = HorizonScheduler::default()
        .compute_free_time(&events, now, horizon_days)
        .map_err(js_err)?;

    slots_to_json(&slots)
}

/// Intersect the stored free time of several group members.
///
/// `members_json` is a JSON array of `{referenceDate?, freeTime}` objects;
/// members without a `referenceDate` count from `reference_date`
/// (`YYYY-MM-DD`). Returns a JSON array of common slot records.
#[wasm_bindgen(js_name = "intersect")]
pub fn intersect(members_json: &str, reference_date: &str) -> Result<String, JsValue> {
    let offset = offset();
    let fallback = wire::parse_date(reference_date).map_err(js_err)?;
    let inputs: Vec<MemberInput> = serde_json::from_str(members_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid members JSON: {}", e)))?;

    let members = inputs
        .into_iter()
        .map(|input| {
            let reference_date = match input.reference_date {
                Some(date) => wire::parse_date(&date)?,
                None => fallback,
            };
            MemberRecord {
                reference_date,
                free_time: input.free_time,
            }
            .to_member(offset)
        })
        .collect::<Result<Vec<MemberFreeTime>, _>>()
        .map_err(js_err)?;

    let common = GroupIntersector::default().intersect(&members);
    slots_to_json(&common)
}
