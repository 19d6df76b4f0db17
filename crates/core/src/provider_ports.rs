//! Calendar and conference provider port interfaces
//!
//! The shapes here are the subset of the provider payloads this engine
//! actually drives; the provider contracts themselves are the providers'.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use concord_domain::{ConferenceData, Result, SendUpdates, Transparency, Visibility};
use serde::{Deserialize, Serialize};

/// An attendee as handed to a calendar provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderAttendee {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub optional: bool,
}

/// Reminder overrides for a provider event write.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderReminders {
    pub use_default: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub overrides: Vec<i32>,
}

/// The event payload written at a calendar provider.
#[derive(Debug, Clone)]
pub struct ProviderEventWrite {
    pub calendar_id: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub timezone: String,
    pub all_day: bool,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    /// RRULE lines (already formatted), absent for one-off events.
    pub recurrence: Option<Vec<String>>,
    pub attendees: Vec<ProviderAttendee>,
    pub conference_data: Option<ConferenceData>,
    pub reminders: ProviderReminders,
    pub send_updates: Option<SendUpdates>,
    pub transparency: Option<Transparency>,
    pub visibility: Option<Visibility>,
    pub color_id: Option<String>,
    pub guests_can_invite_others: Option<bool>,
    pub guests_can_see_other_guests: Option<bool>,
    pub anyone_can_add_self: Option<bool>,
}

/// What the provider hands back after a write.
#[derive(Debug, Clone)]
pub struct ProviderEventHandle {
    pub provider_event_id: String,
    pub html_link: Option<String>,
    /// Conference id the provider resolved (deferred Meet creation).
    pub conference_id: Option<String>,
}

/// Trait for calendar-provider event writes (Google Calendar REST).
#[async_trait]
pub trait CalendarProvider: Send + Sync {
    async fn create_event(&self, write: &ProviderEventWrite) -> Result<ProviderEventHandle>;

    async fn patch_event(
        &self,
        provider_event_id: &str,
        write: &ProviderEventWrite,
    ) -> Result<ProviderEventHandle>;

    async fn delete_event(
        &self,
        calendar_id: &str,
        provider_event_id: &str,
        send_updates: Option<SendUpdates>,
    ) -> Result<()>;
}

/// A meeting created at the conference provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoomMeeting {
    pub id: i64,
    pub join_url: String,
    pub start_url: String,
    pub status: String,
}

/// Request for creating or rescheduling a Zoom meeting.
#[derive(Debug, Clone)]
pub struct ZoomMeetingRequest {
    pub user_id: String,
    pub start_date: DateTime<Utc>,
    pub timezone: String,
    pub agenda: String,
    pub duration_minutes: u32,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub invitees: Vec<String>,
    pub private_meeting: bool,
}

/// Trait for the Zoom meeting API.
#[async_trait]
pub trait ZoomClient: Send + Sync {
    async fn create_meeting(&self, request: &ZoomMeetingRequest) -> Result<ZoomMeeting>;

    async fn update_meeting(&self, meeting_id: i64, request: &ZoomMeetingRequest) -> Result<()>;

    async fn delete_meeting(&self, meeting_id: i64) -> Result<()>;
}

/// Request to kick off final meeting-assist scheduling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartAssistRequest {
    pub user_id: String,
    pub window_start_date: DateTime<Utc>,
    pub window_end_date: DateTime<Utc>,
    pub timezone: String,
}

/// Trait for triggering the external scheduler once enough attendees have
/// responded.
#[async_trait]
pub trait AssistLauncher: Send + Sync {
    async fn start_meeting_assist(&self, request: &StartAssistRequest) -> Result<()>;
}
