//! Wall-clock time and recurrence descriptor types

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::errors::ConcordError;

/// A wall-clock time of day (`HH:MM`), detached from any date or zone.
///
/// Preferred time ranges and working-hour boundaries are carried in this
/// form and only pinned to a date when converting between timezones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ClockTime {
    pub hour: u32,
    pub minute: u32,
}

impl ClockTime {
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        (hour < 24 && minute < 60).then_some(Self { hour, minute })
    }

    pub fn to_naive(self) -> NaiveTime {
        // Bounds are enforced at construction and parse time.
        NaiveTime::from_hms_opt(self.hour, self.minute, 0)
            .unwrap_or(NaiveTime::MIN)
    }

    pub fn from_naive(t: NaiveTime) -> Self {
        use chrono::Timelike;
        Self { hour: t.hour(), minute: t.minute() }
    }

    /// Minutes since midnight.
    pub fn minutes_from_midnight(self) -> u32 {
        self.hour * 60 + self.minute
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for ClockTime {
    type Err = ConcordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (h, m) = s
            .split_once(':')
            .ok_or_else(|| ConcordError::InvalidInput(format!("not a HH:MM time: {s:?}")))?;
        let hour: u32 = h
            .parse()
            .map_err(|_| ConcordError::InvalidInput(format!("bad hour in time: {s:?}")))?;
        let minute: u32 = m
            .parse()
            .map_err(|_| ConcordError::InvalidInput(format!("bad minute in time: {s:?}")))?;
        Self::new(hour, minute)
            .ok_or_else(|| ConcordError::InvalidInput(format!("time out of range: {s:?}")))
    }
}

impl Serialize for ClockTime {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Recurrence cadence of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceFrequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

/// A weekday constraint on a recurrence rule (`BYDAY`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecurrenceDay {
    #[serde(rename = "MO")]
    Mo,
    #[serde(rename = "TU")]
    Tu,
    #[serde(rename = "WE")]
    We,
    #[serde(rename = "TH")]
    Th,
    #[serde(rename = "FR")]
    Fr,
    #[serde(rename = "SA")]
    Sa,
    #[serde(rename = "SU")]
    Su,
}

impl RecurrenceDay {
    pub fn to_weekday(self) -> Weekday {
        match self {
            Self::Mo => Weekday::Mon,
            Self::Tu => Weekday::Tue,
            Self::We => Weekday::Wed,
            Self::Th => Weekday::Thu,
            Self::Fr => Weekday::Fri,
            Self::Sa => Weekday::Sat,
            Self::Su => Weekday::Sun,
        }
    }
}

/// Recurrence descriptor carried on an event.
///
/// `interval` is forwarded to the rule as given; callers own its sanity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recurrence {
    pub frequency: RecurrenceFrequency,
    pub interval: u16,
    /// Last instant the rule is effective (`UNTIL`).
    pub end_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub by_day: Vec<RecurrenceDay>,
}
