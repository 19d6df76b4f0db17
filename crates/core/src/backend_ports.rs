//! Backend store port interfaces
//!
//! These traits define the boundary between the scheduling logic and the
//! backend persistence layer. The infra crate implements them against the
//! GraphQL backend; tests supply in-memory mocks.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use concord_domain::{
    Attendee, Calendar, CalendarIntegration, CategoryLink, Conference, Event, EventPatch,
    MeetingAssist, MeetingAssistAttendee, MeetingAssistEvent, PreferredTimeRange, Reminder,
    Result, UserPreferences,
};

/// Everything needed to create-or-merge an event record.
///
/// `patch` carries the caller-supplied fields; anything left `None` is not
/// touched on an existing record and takes its default on a fresh one.
#[derive(Debug, Clone)]
pub struct EventUpsert {
    /// Composite key `<providerEventId>#<calendarId>`.
    pub id: String,
    pub user_id: String,
    pub calendar_id: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub timezone: String,
    pub patch: EventPatch,
}

/// Trait for calendar record lookup and persistence
#[async_trait]
pub trait CalendarStore: Send + Sync {
    async fn get_calendar(&self, id: &str) -> Result<Option<Calendar>>;

    async fn get_global_primary_calendar(&self, user_id: &str) -> Result<Option<Calendar>>;

    async fn get_calendar_with_resource(
        &self,
        user_id: &str,
        resource: &str,
    ) -> Result<Option<Calendar>>;

    async fn get_any_calendar(&self, user_id: &str) -> Result<Option<Calendar>>;

    async fn list_calendars(&self, user_id: &str) -> Result<Vec<Calendar>>;

    async fn upsert_calendar(&self, calendar: Calendar) -> Result<Calendar>;
}

/// Trait for event record persistence
#[async_trait]
pub trait EventStore: Send + Sync {
    async fn get_event(&self, id: &str) -> Result<Option<Event>>;

    /// Create-or-merge; see [`EventUpsert`] for the partial-field semantics.
    /// Soft deletion is a merge too: a patch with `deleted: Some(true)`.
    async fn upsert_event(&self, upsert: EventUpsert) -> Result<Event>;

    /// Remove the record.
    async fn delete_event(&self, id: &str) -> Result<()>;

    /// Busy lookup: a user's events overlapping a window.
    async fn list_events_in_range(
        &self,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Event>>;
}

/// Trait for conference record persistence
#[async_trait]
pub trait ConferenceStore: Send + Sync {
    async fn get_conference(&self, id: &str) -> Result<Option<Conference>>;

    /// Keyed by conference id; a repeated `request_id` overwrites in place.
    async fn upsert_conference(&self, conference: Conference) -> Result<Conference>;

    async fn delete_conference(&self, id: &str) -> Result<()>;
}

/// Trait for attendee persistence
#[async_trait]
pub trait AttendeeStore: Send + Sync {
    async fn list_attendees_for_event(&self, event_id: &str) -> Result<Vec<Attendee>>;

    async fn upsert_attendee(&self, attendee: Attendee) -> Result<Attendee>;

    async fn delete_attendees_for_event(&self, event_id: &str) -> Result<()>;
}

/// Trait for reminder persistence
#[async_trait]
pub trait ReminderStore: Send + Sync {
    async fn list_reminders_for_event(&self, event_id: &str) -> Result<Vec<Reminder>>;

    async fn insert_reminder(&self, reminder: Reminder) -> Result<Reminder>;

    /// Update semantics are replace-all: callers delete then re-insert.
    async fn delete_reminders_for_event(&self, event_id: &str) -> Result<()>;
}

/// Trait for category-event associations
#[async_trait]
pub trait CategoryStore: Send + Sync {
    async fn connect_category(&self, link: CategoryLink) -> Result<CategoryLink>;

    async fn delete_links_for_event(&self, event_id: &str) -> Result<()>;
}

/// Trait for provider-integration lookups (Zoom, Google, ...)
#[async_trait]
pub trait IntegrationStore: Send + Sync {
    async fn get_integration(
        &self,
        user_id: &str,
        resource: &str,
    ) -> Result<Option<CalendarIntegration>>;
}

/// Trait for the user-preferences record backing slot generation
#[async_trait]
pub trait PreferencesStore: Send + Sync {
    async fn get_user_preferences(&self, user_id: &str) -> Result<Option<UserPreferences>>;
}

/// Trait for meeting-assist session persistence
#[async_trait]
pub trait AssistStore: Send + Sync {
    async fn get_meeting_assist(&self, meeting_id: &str) -> Result<Option<MeetingAssist>>;

    async fn delete_meeting_assist(&self, meeting_id: &str) -> Result<()>;

    async fn list_attendees(&self, meeting_id: &str) -> Result<Vec<MeetingAssistAttendee>>;

    /// Busy intervals captured for an external attendee inside a window.
    async fn list_events_for_attendee(
        &self,
        attendee_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<MeetingAssistEvent>>;

    async fn list_preferred_times(&self, meeting_id: &str) -> Result<Vec<PreferredTimeRange>>;

    /// Returns the number of rows written.
    async fn upsert_preferred_times(&self, ranges: Vec<PreferredTimeRange>) -> Result<usize>;

    async fn delete_preferred_times_by_ids(&self, ids: Vec<String>) -> Result<usize>;
}
