//! Mock store and provider implementations for testing
//!
//! In-memory mocks for the backend and provider ports, enabling
//! deterministic tests without network dependencies. Failure toggles let
//! tests exercise the partial-failure reporting paths.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use concord_core::backend_ports::{
    AssistStore, AttendeeStore, CalendarStore, CategoryStore, ConferenceStore, EventStore,
    EventUpsert, IntegrationStore, PreferencesStore, ReminderStore,
};
use concord_core::provider_ports::{
    AssistLauncher, CalendarProvider, ProviderEventHandle, ProviderEventWrite, StartAssistRequest,
    ZoomClient, ZoomMeeting, ZoomMeetingRequest,
};
use concord_domain::{
    Attendee, Calendar, CalendarIntegration, CategoryLink, ConcordError, Conference, Event,
    MeetingAssist, MeetingAssistAttendee, MeetingAssistEvent, PreferredTimeRange, Reminder,
    Result, UserPreferences,
};

pub fn ts(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
}

/// A calendar record with sensible test defaults.
pub fn calendar(id: &str, user_id: &str) -> Calendar {
    let now = ts(2024, 1, 1, 0, 0);
    Calendar {
        id: id.to_string(),
        user_id: user_id.to_string(),
        title: format!("Calendar {id}"),
        background_color: None,
        foreground_color: None,
        color_id: None,
        account: None,
        access_level: None,
        resource: Some(concord_domain::constants::GOOGLE_CALENDAR_RESOURCE.to_string()),
        modifiable: true,
        global_primary: false,
        deleted: false,
        created_date: now,
        updated_at: now,
    }
}

/// An event record with every optional field blank.
pub fn empty_event(
    id: &str,
    user_id: &str,
    calendar_id: &str,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    timezone: &str,
) -> Event {
    let now = ts(2024, 1, 1, 0, 0);
    Event {
        id: id.to_string(),
        user_id: user_id.to_string(),
        calendar_id: calendar_id.to_string(),
        start_date,
        end_date,
        timezone: timezone.to_string(),
        title: None,
        notes: None,
        location: None,
        all_day: false,
        recurrence: None,
        conference_id: None,
        transparency: None,
        visibility: None,
        status: None,
        html_link: None,
        color_id: None,
        max_attendees: None,
        use_default_alarms: false,
        deleted: false,
        priority: None,
        soft_deadline: None,
        hard_deadline: None,
        duration_minutes: None,
        positive_impact_score: None,
        negative_impact_score: None,
        preferred_day_of_week: None,
        preferred_time: None,
        preferred_start_time_range: None,
        preferred_end_time_range: None,
        time_blocking: None,
        is_meeting: None,
        is_external_meeting: None,
        is_break: None,
        is_follow_up: None,
        modifiable: None,
        anyone_can_add_self: None,
        guests_can_invite_others: None,
        guests_can_see_other_guests: None,
        copy_availability: None,
        copy_time_blocking: None,
        copy_time_preference: None,
        copy_reminders: None,
        copy_priority_level: None,
        copy_modifiable: None,
        copy_categories: None,
        copy_is_break: None,
        copy_is_meeting: None,
        copy_is_external_meeting: None,
        copy_duration: None,
        user_modified_availability: None,
        user_modified_time_blocking: None,
        user_modified_time_preference: None,
        user_modified_reminders: None,
        user_modified_priority_level: None,
        user_modified_categories: None,
        user_modified_modifiable: None,
        user_modified_is_break: None,
        user_modified_is_meeting: None,
        user_modified_is_external_meeting: None,
        user_modified_duration: None,
        task_id: None,
        follow_up_event_id: None,
        pre_event_id: None,
        post_event_id: None,
        meeting_id: None,
        created_date: now,
        updated_at: now,
    }
}

/// A meeting-assist session with sensible test defaults.
pub fn meeting_assist(id: &str, host_user_id: &str) -> MeetingAssist {
    let now = ts(2024, 1, 1, 0, 0);
    MeetingAssist {
        id: id.to_string(),
        user_id: host_user_id.to_string(),
        summary: Some("Planning".to_string()),
        notes: None,
        window_start_date: ts(2024, 4, 8, 9, 0),
        window_end_date: ts(2024, 4, 12, 17, 0),
        timezone: "UTC".to_string(),
        duration: 30,
        min_threshold_count: 2,
        attendee_responded_count: 0,
        attendee_count: 0,
        cancelled: false,
        expire_date: None,
        enable_attendee_preferences: true,
        guarantee_availability: true,
        attendee_can_modify: true,
        event_id: None,
        original_meeting_id: None,
        created_date: now,
        updated_at: now,
    }
}

/// A meeting-assist attendee with sensible test defaults.
pub fn assist_attendee(id: &str, meeting_id: &str, host_id: &str) -> MeetingAssistAttendee {
    let now = ts(2024, 1, 1, 0, 0);
    MeetingAssistAttendee {
        id: id.to_string(),
        meeting_id: meeting_id.to_string(),
        host_id: host_id.to_string(),
        user_id: None,
        name: None,
        emails: vec![format!("{id}@example.com")],
        timezone: "UTC".to_string(),
        external_attendee: false,
        created_date: now,
        updated_at: now,
    }
}

/// In-memory mock for `CalendarStore`.
#[derive(Default)]
pub struct MockCalendarStore {
    calendars: Mutex<Vec<Calendar>>,
}

impl MockCalendarStore {
    pub fn new(calendars: Vec<Calendar>) -> Self {
        Self { calendars: Mutex::new(calendars) }
    }

    pub fn with_calendar(self, calendar: Calendar) -> Self {
        self.calendars.lock().unwrap().push(calendar);
        self
    }
}

#[async_trait]
impl CalendarStore for MockCalendarStore {
    async fn get_calendar(&self, id: &str) -> Result<Option<Calendar>> {
        Ok(self.calendars.lock().unwrap().iter().find(|c| c.id == id).cloned())
    }

    async fn get_global_primary_calendar(&self, user_id: &str) -> Result<Option<Calendar>> {
        Ok(self
            .calendars
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.user_id == user_id && c.global_primary && !c.deleted)
            .cloned())
    }

    async fn get_calendar_with_resource(
        &self,
        user_id: &str,
        resource: &str,
    ) -> Result<Option<Calendar>> {
        Ok(self
            .calendars
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.user_id == user_id && c.resource.as_deref() == Some(resource) && !c.deleted)
            .cloned())
    }

    async fn get_any_calendar(&self, user_id: &str) -> Result<Option<Calendar>> {
        Ok(self
            .calendars
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.user_id == user_id && !c.deleted)
            .cloned())
    }

    async fn list_calendars(&self, user_id: &str) -> Result<Vec<Calendar>> {
        Ok(self
            .calendars
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn upsert_calendar(&self, calendar: Calendar) -> Result<Calendar> {
        let mut calendars = self.calendars.lock().unwrap();
        calendars.retain(|c| c.id != calendar.id);
        calendars.push(calendar.clone());
        Ok(calendar)
    }
}

/// In-memory mock for `EventStore` with upsert-merge semantics.
#[derive(Default)]
pub struct MockEventStore {
    events: Mutex<HashMap<String, Event>>,
}

impl MockEventStore {
    pub fn with_event(self, event: Event) -> Self {
        self.insert(event);
        self
    }

    pub fn insert(&self, event: Event) {
        self.events.lock().unwrap().insert(event.id.clone(), event);
    }

    pub fn snapshot(&self, id: &str) -> Option<Event> {
        self.events.lock().unwrap().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }
}

#[async_trait]
impl EventStore for MockEventStore {
    async fn get_event(&self, id: &str) -> Result<Option<Event>> {
        Ok(self.events.lock().unwrap().get(id).cloned())
    }

    async fn upsert_event(&self, upsert: EventUpsert) -> Result<Event> {
        let mut events = self.events.lock().unwrap();
        let mut record = events.remove(&upsert.id).unwrap_or_else(|| {
            empty_event(
                &upsert.id,
                &upsert.user_id,
                &upsert.calendar_id,
                upsert.start_date,
                upsert.end_date,
                &upsert.timezone,
            )
        });
        record.start_date = upsert.start_date;
        record.end_date = upsert.end_date;
        record.timezone = upsert.timezone.clone();
        upsert.patch.apply_to(&mut record);
        record.updated_at = Utc::now();
        events.insert(upsert.id.clone(), record.clone());
        Ok(record)
    }

    async fn delete_event(&self, id: &str) -> Result<()> {
        self.events.lock().unwrap().remove(id);
        Ok(())
    }

    async fn list_events_in_range(
        &self,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Event>> {
        Ok(self
            .events
            .lock()
            .unwrap()
            .values()
            .filter(|e| e.user_id == user_id && e.start_date < end && e.end_date > start)
            .cloned()
            .collect())
    }
}

/// In-memory mock for `ConferenceStore`.
#[derive(Default)]
pub struct MockConferenceStore {
    conferences: Mutex<HashMap<String, Conference>>,
}

impl MockConferenceStore {
    pub fn with_conference(self, conference: Conference) -> Self {
        self.conferences.lock().unwrap().insert(conference.id.clone(), conference);
        self
    }

    pub fn len(&self) -> usize {
        self.conferences.lock().unwrap().len()
    }

    pub fn snapshot(&self, id: &str) -> Option<Conference> {
        self.conferences.lock().unwrap().get(id).cloned()
    }
}

#[async_trait]
impl ConferenceStore for MockConferenceStore {
    async fn get_conference(&self, id: &str) -> Result<Option<Conference>> {
        Ok(self.conferences.lock().unwrap().get(id).cloned())
    }

    async fn upsert_conference(&self, conference: Conference) -> Result<Conference> {
        self.conferences
            .lock()
            .unwrap()
            .insert(conference.id.clone(), conference.clone());
        Ok(conference)
    }

    async fn delete_conference(&self, id: &str) -> Result<()> {
        self.conferences.lock().unwrap().remove(id);
        Ok(())
    }
}

/// In-memory mock for `AttendeeStore` with a failure toggle.
#[derive(Default)]
pub struct MockAttendeeStore {
    attendees: Mutex<Vec<Attendee>>,
    fail_upserts: AtomicBool,
}

impl MockAttendeeStore {
    pub fn fail_upserts(&self, fail: bool) {
        self.fail_upserts.store(fail, Ordering::SeqCst);
    }

    pub fn for_event(&self, event_id: &str) -> Vec<Attendee> {
        self.attendees
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.event_id == event_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl AttendeeStore for MockAttendeeStore {
    async fn list_attendees_for_event(&self, event_id: &str) -> Result<Vec<Attendee>> {
        Ok(self.for_event(event_id))
    }

    async fn upsert_attendee(&self, attendee: Attendee) -> Result<Attendee> {
        if self.fail_upserts.load(Ordering::SeqCst) {
            return Err(ConcordError::Backend("attendee upsert rejected".into()));
        }
        self.attendees.lock().unwrap().push(attendee.clone());
        Ok(attendee)
    }

    async fn delete_attendees_for_event(&self, event_id: &str) -> Result<()> {
        self.attendees.lock().unwrap().retain(|a| a.event_id != event_id);
        Ok(())
    }
}

/// In-memory mock for `ReminderStore`.
#[derive(Default)]
pub struct MockReminderStore {
    reminders: Mutex<Vec<Reminder>>,
}

impl MockReminderStore {
    pub fn for_event(&self, event_id: &str) -> Vec<Reminder> {
        self.reminders
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.event_id == event_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ReminderStore for MockReminderStore {
    async fn list_reminders_for_event(&self, event_id: &str) -> Result<Vec<Reminder>> {
        Ok(self.for_event(event_id))
    }

    async fn insert_reminder(&self, reminder: Reminder) -> Result<Reminder> {
        self.reminders.lock().unwrap().push(reminder.clone());
        Ok(reminder)
    }

    async fn delete_reminders_for_event(&self, event_id: &str) -> Result<()> {
        self.reminders.lock().unwrap().retain(|r| r.event_id != event_id);
        Ok(())
    }
}

/// In-memory mock for `CategoryStore`.
#[derive(Default)]
pub struct MockCategoryStore {
    links: Mutex<Vec<CategoryLink>>,
}

impl MockCategoryStore {
    pub fn for_event(&self, event_id: &str) -> Vec<CategoryLink> {
        self.links
            .lock()
            .unwrap()
            .iter()
            .filter(|l| l.event_id == event_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl CategoryStore for MockCategoryStore {
    async fn connect_category(&self, link: CategoryLink) -> Result<CategoryLink> {
        self.links.lock().unwrap().push(link.clone());
        Ok(link)
    }

    async fn delete_links_for_event(&self, event_id: &str) -> Result<()> {
        self.links.lock().unwrap().retain(|l| l.event_id != event_id);
        Ok(())
    }
}

/// In-memory mock for `IntegrationStore`.
#[derive(Default)]
pub struct MockIntegrationStore {
    integrations: Mutex<Vec<CalendarIntegration>>,
}

impl MockIntegrationStore {
    pub fn with_integration(self, integration: CalendarIntegration) -> Self {
        self.integrations.lock().unwrap().push(integration);
        self
    }
}

#[async_trait]
impl IntegrationStore for MockIntegrationStore {
    async fn get_integration(
        &self,
        user_id: &str,
        resource: &str,
    ) -> Result<Option<CalendarIntegration>> {
        Ok(self
            .integrations
            .lock()
            .unwrap()
            .iter()
            .find(|i| i.user_id == user_id && i.resource == resource)
            .cloned())
    }
}

/// In-memory mock for `PreferencesStore`.
#[derive(Default)]
pub struct MockPreferencesStore {
    preferences: Mutex<HashMap<String, UserPreferences>>,
}

impl MockPreferencesStore {
    pub fn with_preferences(self, prefs: UserPreferences) -> Self {
        self.preferences.lock().unwrap().insert(prefs.user_id.clone(), prefs);
        self
    }
}

#[async_trait]
impl PreferencesStore for MockPreferencesStore {
    async fn get_user_preferences(&self, user_id: &str) -> Result<Option<UserPreferences>> {
        Ok(self.preferences.lock().unwrap().get(user_id).cloned())
    }
}

/// In-memory mock for `AssistStore`.
#[derive(Default)]
pub struct MockAssistStore {
    meetings: Mutex<HashMap<String, MeetingAssist>>,
    attendees: Mutex<Vec<MeetingAssistAttendee>>,
    events: Mutex<Vec<MeetingAssistEvent>>,
    preferred: Mutex<Vec<PreferredTimeRange>>,
}

impl MockAssistStore {
    pub fn with_meeting(self, meeting: MeetingAssist) -> Self {
        self.meetings.lock().unwrap().insert(meeting.id.clone(), meeting);
        self
    }

    pub fn with_attendee(self, attendee: MeetingAssistAttendee) -> Self {
        self.attendees.lock().unwrap().push(attendee);
        self
    }

    pub fn with_event(self, event: MeetingAssistEvent) -> Self {
        self.events.lock().unwrap().push(event);
        self
    }

    pub fn with_preferred_time(self, preferred: PreferredTimeRange) -> Self {
        self.preferred.lock().unwrap().push(preferred);
        self
    }

    pub fn preferred_snapshot(&self) -> Vec<PreferredTimeRange> {
        self.preferred.lock().unwrap().clone()
    }

    pub fn has_meeting(&self, meeting_id: &str) -> bool {
        self.meetings.lock().unwrap().contains_key(meeting_id)
    }
}

#[async_trait]
impl AssistStore for MockAssistStore {
    async fn get_meeting_assist(&self, meeting_id: &str) -> Result<Option<MeetingAssist>> {
        Ok(self.meetings.lock().unwrap().get(meeting_id).cloned())
    }

    async fn delete_meeting_assist(&self, meeting_id: &str) -> Result<()> {
        self.meetings.lock().unwrap().remove(meeting_id);
        Ok(())
    }

    async fn list_attendees(&self, meeting_id: &str) -> Result<Vec<MeetingAssistAttendee>> {
        Ok(self
            .attendees
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.meeting_id == meeting_id)
            .cloned()
            .collect())
    }

    async fn list_events_for_attendee(
        &self,
        attendee_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<MeetingAssistEvent>> {
        Ok(self
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.attendee_id == attendee_id && e.start_date < end && e.end_date > start)
            .cloned()
            .collect())
    }

    async fn list_preferred_times(&self, meeting_id: &str) -> Result<Vec<PreferredTimeRange>> {
        Ok(self
            .preferred
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.meeting_id == meeting_id)
            .cloned()
            .collect())
    }

    async fn upsert_preferred_times(&self, ranges: Vec<PreferredTimeRange>) -> Result<usize> {
        let mut preferred = self.preferred.lock().unwrap();
        let count = ranges.len();
        for range in ranges {
            preferred.retain(|p| p.id != range.id);
            preferred.push(range);
        }
        Ok(count)
    }

    async fn delete_preferred_times_by_ids(&self, ids: Vec<String>) -> Result<usize> {
        let mut preferred = self.preferred.lock().unwrap();
        let before = preferred.len();
        preferred.retain(|p| !ids.contains(&p.id));
        Ok(before - preferred.len())
    }
}

/// Mock calendar provider recording every write.
#[derive(Default)]
pub struct MockCalendarProvider {
    counter: AtomicUsize,
    pub created: Mutex<Vec<ProviderEventWrite>>,
    pub patched: Mutex<Vec<(String, ProviderEventWrite)>>,
    pub deleted: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl CalendarProvider for MockCalendarProvider {
    async fn create_event(&self, write: &ProviderEventWrite) -> Result<ProviderEventHandle> {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        self.created.lock().unwrap().push(write.clone());
        Ok(ProviderEventHandle {
            provider_event_id: format!("prov-{n}"),
            html_link: Some(format!("https://calendar.example.com/event/prov-{n}")),
            conference_id: None,
        })
    }

    async fn patch_event(
        &self,
        provider_event_id: &str,
        write: &ProviderEventWrite,
    ) -> Result<ProviderEventHandle> {
        self.patched
            .lock()
            .unwrap()
            .push((provider_event_id.to_string(), write.clone()));
        Ok(ProviderEventHandle {
            provider_event_id: provider_event_id.to_string(),
            html_link: None,
            conference_id: None,
        })
    }

    async fn delete_event(
        &self,
        calendar_id: &str,
        provider_event_id: &str,
        _send_updates: Option<concord_domain::SendUpdates>,
    ) -> Result<()> {
        self.deleted
            .lock()
            .unwrap()
            .push((calendar_id.to_string(), provider_event_id.to_string()));
        Ok(())
    }
}

/// Mock Zoom client with deterministic meeting ids.
#[derive(Default)]
pub struct MockZoomClient {
    counter: AtomicUsize,
    pub created: Mutex<Vec<ZoomMeetingRequest>>,
    pub updated: Mutex<Vec<i64>>,
    pub deleted: Mutex<Vec<i64>>,
}

#[async_trait]
impl ZoomClient for MockZoomClient {
    async fn create_meeting(&self, request: &ZoomMeetingRequest) -> Result<ZoomMeeting> {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) as i64;
        self.created.lock().unwrap().push(request.clone());
        Ok(ZoomMeeting {
            id: 880_000 + n,
            join_url: format!("https://zoom.example.com/j/{}", 880_000 + n),
            start_url: format!("https://zoom.example.com/s/{}", 880_000 + n),
            status: "waiting".to_string(),
        })
    }

    async fn update_meeting(&self, meeting_id: i64, _request: &ZoomMeetingRequest) -> Result<()> {
        self.updated.lock().unwrap().push(meeting_id);
        Ok(())
    }

    async fn delete_meeting(&self, meeting_id: i64) -> Result<()> {
        self.deleted.lock().unwrap().push(meeting_id);
        Ok(())
    }
}

/// Mock launcher recording scheduling kickoffs.
#[derive(Default)]
pub struct MockAssistLauncher {
    pub started: Mutex<Vec<StartAssistRequest>>,
}

impl MockAssistLauncher {
    pub fn start_count(&self) -> usize {
        self.started.lock().unwrap().len()
    }
}

#[async_trait]
impl AssistLauncher for MockAssistLauncher {
    async fn start_meeting_assist(&self, request: &StartAssistRequest) -> Result<()> {
        self.started.lock().unwrap().push(request.clone());
        Ok(())
    }
}
