//! # availability-engine
//!
//! Free-time computation for calendar users and groups.
//!
//! Given a user's calendar events, the engine computes the free windows
//! inside a bounded daily active window (07:00-21:00 civil time by default)
//! across a rolling horizon of days. For groups, it intersects members' free
//! windows day by day to find common availability.
//!
//! Everything here is pure and synchronous: callers pass in events and the
//! current moment, and get a fresh result back. Nothing touches I/O.
//!
//! ## Modules
//!
//! - [`config`] -- Fixed civil offset, active hours, default horizon
//! - [`window`] -- A civil date's active window
//! - [`event`] -- Timed and whole-day calendar events
//! - [`normalize`] -- Events → busy intervals clamped to one window
//! - [`freebusy`] -- Busy intervals → free slots for one day
//! - [`horizon`] -- Free slots across today and the following days
//! - [`group`] -- Intersection of several members' free slots
//! - [`wire`] -- JSON shapes used at the host boundary
//! - [`error`] -- Error types

pub mod config;
pub mod error;
pub mod event;
pub mod freebusy;
pub mod group;
pub mod horizon;
pub mod normalize;
pub mod window;
pub mod wire;

pub use config::EngineConfig;
pub use error::AvailabilityError;
pub use event::Event;
pub use freebusy::{extract, find_first_free_slot, FreeSlot};
pub use group::{intersect, DaySlot, GroupIntersector, MemberFreeTime};
pub use horizon::{compute_free_time, DayFreeTime, HorizonScheduler};
pub use normalize::{normalize, BusyInterval, NormalizedDay};
pub use window::{window_for, TimeWindow};
