//! Engine configuration: the fixed civil offset, the daily active window and
//! the default scheduling horizon.

use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AvailabilityError, Result};

const MINUTES_PER_DAY: i32 = 24 * 60;

/// Tunables shared by every component.
///
/// All civil-time arithmetic happens in the single offset given by
/// `utc_offset_minutes`; no daylight-saving shifts are modelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Offset of civil time from UTC, in minutes (UTC+3 is `180`).
    pub utc_offset_minutes: i32,
    /// Hour at which the daily active window opens.
    pub active_start_hour: u32,
    /// Hour at which the daily active window closes (at most 24).
    pub active_end_hour: u32,
    /// Number of civil days (today included) a host computes by default.
    pub horizon_days: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            utc_offset_minutes: 180,
            active_start_hour: 7,
            active_end_hour: 21,
            horizon_days: 7,
        }
    }
}

impl EngineConfig {
    /// Check the invariants the engine relies on.
    ///
    /// # Errors
    /// Returns `AvailabilityError::InvalidConfig` when the offset is a day or
    /// more, the window is empty or inverted, or the horizon is zero.
    pub fn validate(&self) -> Result<()> {
        if self.utc_offset_minutes.abs() >= MINUTES_PER_DAY {
            return Err(AvailabilityError::InvalidConfig(format!(
                "utc_offset_minutes {} is outside (-1440, 1440)",
                self.utc_offset_minutes
            )));
        }
        if self.active_end_hour > 24 {
            return Err(AvailabilityError::InvalidConfig(format!(
                "active_end_hour {} is past midnight",
                self.active_end_hour
            )));
        }
        if self.active_start_hour >= self.active_end_hour {
            return Err(AvailabilityError::InvalidConfig(format!(
                "active window {}:00-{}:00 is empty",
                self.active_start_hour, self.active_end_hour
            )));
        }
        if self.horizon_days == 0 {
            return Err(AvailabilityError::InvalidConfig(
                "horizon_days must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// The fixed civil offset.
    ///
    /// Falls back to UTC for an out-of-range offset; call [`validate`](Self::validate)
    /// first to reject those instead.
    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes * 60).unwrap_or_else(|| Utc.fix())
    }

    /// Minute-of-day at which the active window opens.
    pub fn active_start_minute(&self) -> u32 {
        self.active_start_hour * 60
    }

    /// Minute-of-day at which the active window closes.
    pub fn active_end_minute(&self) -> u32 {
        self.active_end_hour * 60
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_utc_plus_three_seven_to_nine() {
        let cfg = EngineConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.offset().local_minus_utc(), 3 * 3600);
        assert_eq!(cfg.active_start_minute(), 420);
        assert_eq!(cfg.active_end_minute(), 1260);
        assert_eq!(cfg.horizon_days, 7);
    }

    #[test]
    fn inverted_window_rejected() {
        let cfg = EngineConfig {
            active_start_hour: 21,
            active_end_hour: 7,
            ..EngineConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(AvailabilityError::InvalidConfig(_))
        ));
    }

    #[test]
    fn window_past_midnight_rejected() {
        let cfg = EngineConfig {
            active_end_hour: 25,
            ..EngineConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn offset_of_a_full_day_rejected() {
        let cfg = EngineConfig {
            utc_offset_minutes: -1440,
            ..EngineConfig::default()
        };
        assert!(cfg.validate().is_err());
        // Still usable: falls back to UTC.
        assert_eq!(cfg.offset().local_minus_utc(), 0);
    }

    #[test]
    fn zero_horizon_rejected() {
        let cfg = EngineConfig {
            horizon_days: 0,
            ..EngineConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: EngineConfig = serde_json::from_str(r#"{"utc_offset_minutes": 0}"#).unwrap();
        assert_eq!(cfg.utc_offset_minutes, 0);
        assert_eq!(cfg.active_start_hour, 7);
        assert_eq!(cfg.active_end_hour, 21);
    }

    #[test]
    fn unknown_field_rejected() {
        let parsed: std::result::Result<EngineConfig, _> =
            serde_json::from_str(r#"{"timezone": "Asia/Jerusalem"}"#);
        assert!(parsed.is_err());
    }
}
