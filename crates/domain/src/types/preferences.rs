//! Host scheduling preferences (working hours)

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_WORK_END_HOUR, DEFAULT_WORK_START_HOUR};
use crate::types::time::ClockTime;

/// A wall-clock boundary for one ISO weekday (1 = Monday .. 7 = Sunday).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayTime {
    pub day: u8,
    pub hour: u32,
    pub minutes: u32,
}

impl DayTime {
    pub fn clock_time(&self) -> ClockTime {
        ClockTime::new(self.hour, self.minutes).unwrap_or(ClockTime { hour: 0, minute: 0 })
    }
}

/// A user's scheduling preferences, the inputs to slot generation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    pub user_id: String,
    /// Work-day start per ISO weekday. Missing days fall back to the default.
    #[serde(default)]
    pub start_times: Vec<DayTime>,
    /// Work-day end per ISO weekday. Missing days fall back to the default.
    #[serde(default)]
    pub end_times: Vec<DayTime>,
}

impl UserPreferences {
    /// Work-day start for an ISO weekday, defaulting when unset.
    pub fn work_start(&self, iso_day: u8) -> ClockTime {
        self.start_times
            .iter()
            .find(|t| t.day == iso_day)
            .map(DayTime::clock_time)
            .unwrap_or(ClockTime { hour: DEFAULT_WORK_START_HOUR, minute: 0 })
    }

    /// Work-day end for an ISO weekday, defaulting when unset.
    pub fn work_end(&self, iso_day: u8) -> ClockTime {
        self.end_times
            .iter()
            .find(|t| t.day == iso_day)
            .map(DayTime::clock_time)
            .unwrap_or(ClockTime { hour: DEFAULT_WORK_END_HOUR, minute: 0 })
    }
}
