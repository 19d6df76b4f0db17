//! Meeting-assist entities
//!
//! A meeting assist is a scheduling-negotiation session: attendees submit
//! preferred time ranges inside a window until enough have responded, then
//! final scheduling is kicked off.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::types::time::ClockTime;

/// A meeting-assist session record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingAssist {
    pub id: String,
    /// The host.
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub window_start_date: DateTime<Utc>,
    pub window_end_date: DateTime<Utc>,
    /// Host timezone; preferred times are persisted in this zone.
    pub timezone: String,
    /// Meeting length, also the slot granularity, in minutes.
    pub duration: u32,
    /// Attendee responses needed before scheduling starts.
    pub min_threshold_count: u32,
    #[serde(default)]
    pub attendee_responded_count: u32,
    #[serde(default)]
    pub attendee_count: u32,
    #[serde(default)]
    pub cancelled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expire_date: Option<DateTime<Utc>>,
    /// Whether attendees may submit preferences at all.
    #[serde(default)]
    pub enable_attendee_preferences: bool,
    /// Permission gate for fully custom (non-slot) time ranges.
    #[serde(default)]
    pub guarantee_availability: bool,
    #[serde(default)]
    pub attendee_can_modify: bool,
    /// Set once final scheduling has produced an event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_meeting_id: Option<String>,
    pub created_date: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An attendee of a meeting-assist session.
///
/// External attendees have no account; their busy intervals come from
/// meeting-assist event records rather than the primary event store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingAssistAttendee {
    pub id: String,
    pub meeting_id: String,
    pub host_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub emails: Vec<String>,
    pub timezone: String,
    #[serde(default)]
    pub external_attendee: bool,
    pub created_date: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A busy interval of an external attendee, captured on the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingAssistEvent {
    pub id: String,
    pub attendee_id: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub timezone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transparency: Option<crate::types::event::Transparency>,
}

/// A preferred time range submitted by an attendee.
///
/// Wall-clock times are captured in the attendee's zone and converted to the
/// host zone before persistence. `day_of_week` is an ISO weekday (1 = Monday);
/// `None` means any day in the window.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferredTimeRange {
    pub id: String,
    pub meeting_id: String,
    pub attendee_id: String,
    pub host_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_week: Option<u8>,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    pub created_date: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A candidate meeting slot offered to an attendee.
///
/// Ephemeral: generated per viewed date from the host's working hours and
/// everyone's busy intervals, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableSlot {
    pub id: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

/// Generated slots grouped by calendar date (in the viewer's zone).
pub type AvailableSlotsByDate = std::collections::BTreeMap<NaiveDate, Vec<AvailableSlot>>;

/// An interval already taken by an existing booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusyInterval {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}
