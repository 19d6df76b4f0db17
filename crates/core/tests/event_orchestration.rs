//! Integration tests for the event upsert orchestrator

mod support;

use std::sync::Arc;

use concord_core::backend_ports::ConferenceStore;
use concord_core::conference::ConferenceRequest;
use concord_core::{
    AttendeeDraft, BackendStores, CalendarResolver, ConferenceService, EventOrchestrator,
    EventWriteRequest, UpdateEventRequest,
};
use concord_domain::constants::{LOCAL_CALENDAR_RESOURCE, ZOOM_RESOURCE};
use concord_domain::{
    CalendarIntegration, ConcordError, ConferenceApp, EventPatch, Recurrence, RecurrenceDay,
    RecurrenceFrequency,
};
use support::stores::{
    calendar, empty_event, meeting_assist, ts, MockAssistStore, MockAttendeeStore,
    MockCalendarProvider, MockCalendarStore, MockCategoryStore, MockConferenceStore,
    MockEventStore, MockIntegrationStore, MockReminderStore, MockZoomClient,
};

struct Fixture {
    events: Arc<MockEventStore>,
    attendees: Arc<MockAttendeeStore>,
    reminders: Arc<MockReminderStore>,
    categories: Arc<MockCategoryStore>,
    conferences: Arc<MockConferenceStore>,
    assists: Arc<MockAssistStore>,
    provider: Arc<MockCalendarProvider>,
    zoom: Arc<MockZoomClient>,
    orchestrator: EventOrchestrator,
}

fn fixture(calendars: MockCalendarStore) -> Fixture {
    fixture_with(calendars, MockIntegrationStore::default(), MockAssistStore::default())
}

fn fixture_with(
    calendars: MockCalendarStore,
    integrations: MockIntegrationStore,
    assists: MockAssistStore,
) -> Fixture {
    let calendars = Arc::new(calendars);
    let events = Arc::new(MockEventStore::default());
    let attendees = Arc::new(MockAttendeeStore::default());
    let reminders = Arc::new(MockReminderStore::default());
    let categories = Arc::new(MockCategoryStore::default());
    let conferences = Arc::new(MockConferenceStore::default());
    let assists = Arc::new(assists);
    let provider = Arc::new(MockCalendarProvider::default());
    let zoom = Arc::new(MockZoomClient::default());

    let orchestrator = EventOrchestrator::new(
        CalendarResolver::new(calendars.clone()),
        ConferenceService::new(conferences.clone(), Arc::new(integrations), zoom.clone()),
        BackendStores {
            events: events.clone(),
            attendees: attendees.clone(),
            reminders: reminders.clone(),
            categories: categories.clone(),
            conferences: conferences.clone(),
            assists: assists.clone(),
        },
        provider.clone(),
        zoom.clone(),
    );

    Fixture {
        events,
        attendees,
        reminders,
        categories,
        conferences,
        assists,
        provider,
        zoom,
        orchestrator,
    }
}

fn base_request() -> EventWriteRequest {
    let mut request = EventWriteRequest::new(
        "u1",
        ts(2024, 6, 3, 14, 0),
        ts(2024, 6, 3, 15, 0),
        "America/New_York",
    );
    request.calendar_id = Some("cal-1".to_string());
    request.title = Some("Design review".to_string());
    request
}

#[tokio::test]
async fn create_writes_provider_event_and_backend_record() {
    let f = fixture(MockCalendarStore::new(vec![calendar("cal-1", "u1")]));

    let mut request = base_request();
    request.recurrence = Some(Recurrence {
        frequency: RecurrenceFrequency::Weekly,
        interval: 2,
        end_date: ts(2024, 7, 1, 14, 0),
        by_day: vec![RecurrenceDay::Mo, RecurrenceDay::We],
    });
    request.attendees = vec![AttendeeDraft::new("a@example.com"), AttendeeDraft::new("b@example.com")];
    request.reminders = vec![10, 30];
    request.category_ids = vec!["cat-1".to_string()];

    let outcome = f.orchestrator.create_event(request).await.unwrap();

    // Provider write carries the recurrence rule and attendees.
    let created = f.provider.created.lock().unwrap();
    assert_eq!(created.len(), 1);
    let rule = &created[0].recurrence.as_ref().expect("recurrence lines")[0];
    assert!(rule.starts_with("RRULE:FREQ=WEEKLY"));
    assert!(rule.contains("BYDAY=MO,WE"));
    assert_eq!(created[0].attendees.len(), 2);
    drop(created);

    // Backend record keyed by the composite id.
    assert_eq!(outcome.event.id, "prov-0#cal-1");
    assert!(f.events.snapshot("prov-0#cal-1").is_some());
    assert_eq!(outcome.event.title.as_deref(), Some("Design review"));

    // Side records fanned out.
    assert_eq!(outcome.report.attendees_upserted, 2);
    assert_eq!(outcome.report.reminders_written, 2);
    assert_eq!(outcome.report.categories_linked, 1);
    assert!(outcome.report.failures.is_empty());
    assert_eq!(f.attendees.for_event("prov-0#cal-1").len(), 2);
    assert_eq!(f.reminders.for_event("prov-0#cal-1").len(), 2);
    assert_eq!(f.categories.for_event("prov-0#cal-1").len(), 1);
}

#[tokio::test]
async fn create_without_any_calendar_is_a_typed_not_found() {
    let f = fixture(MockCalendarStore::default());

    let mut request = base_request();
    request.calendar_id = None;

    let err = f.orchestrator.create_event(request).await.unwrap_err();
    assert!(matches!(err, ConcordError::NotFound(_)));
    assert_eq!(f.events.len(), 0);
    assert!(f.provider.created.lock().unwrap().is_empty());
}

#[tokio::test]
async fn local_device_calendar_skips_the_provider() {
    let mut local = calendar("cal-local", "u1");
    local.resource = Some(LOCAL_CALENDAR_RESOURCE.to_string());
    let f = fixture(MockCalendarStore::new(vec![local]));

    let mut request = base_request();
    request.calendar_id = Some("cal-local".to_string());

    let outcome = f.orchestrator.create_event(request).await.unwrap();

    assert!(f.provider.created.lock().unwrap().is_empty());
    assert!(outcome.event.id.ends_with("#cal-local"));
    assert!(f.events.snapshot(&outcome.event.id).is_some());
}

#[tokio::test]
async fn google_calendar_with_attendees_provisions_the_conference() {
    let integrations =
        MockIntegrationStore::default().with_integration(CalendarIntegration {
            id: "int-1".to_string(),
            user_id: "u1".to_string(),
            name: "Zoom Meeting".to_string(),
            resource: ZOOM_RESOURCE.to_string(),
            enabled: true,
            token: None,
            contact_name: None,
            contact_email: None,
        });
    let f = fixture_with(
        MockCalendarStore::new(vec![calendar("cal-1", "u1")]),
        integrations,
        MockAssistStore::default(),
    );

    let mut request = base_request();
    request.attendees = vec![AttendeeDraft::new("a@example.com")];
    request.conference = Some(ConferenceRequest { zoom_meet: true, ..Default::default() });

    let outcome = f.orchestrator.create_event(request).await.unwrap();

    assert_eq!(f.zoom.created.lock().unwrap().len(), 1);
    let conference_id = outcome.event.conference_id.expect("conference id recorded");
    assert!(f.conferences.snapshot(&conference_id).is_some());

    // The provider write carried the conference payload.
    let created = f.provider.created.lock().unwrap();
    assert!(created[0].conference_data.is_some());
}

#[tokio::test]
async fn conference_request_without_attendees_is_skipped() {
    let f = fixture(MockCalendarStore::new(vec![calendar("cal-1", "u1")]));

    let mut request = base_request();
    request.conference = Some(ConferenceRequest { google_meet: true, ..Default::default() });

    let outcome = f.orchestrator.create_event(request).await.unwrap();

    assert!(outcome.conference.is_none());
    assert!(outcome.event.conference_id.is_none());
}

#[tokio::test]
async fn attendee_failures_are_reported_not_rolled_back() {
    let f = fixture(MockCalendarStore::new(vec![calendar("cal-1", "u1")]));
    f.attendees.fail_upserts(true);

    let mut request = base_request();
    request.attendees = vec![AttendeeDraft::new("a@example.com")];
    request.reminders = vec![15];

    let outcome = f.orchestrator.create_event(request).await.unwrap();

    assert_eq!(outcome.report.attendees_upserted, 0);
    assert_eq!(outcome.report.failures.len(), 1);
    assert_eq!(outcome.report.failures[0].step, "attendees");
    // Reminders still landed; nothing was rolled back.
    assert_eq!(outcome.report.reminders_written, 1);
    assert!(f.events.snapshot(&outcome.event.id).is_some());
}

#[tokio::test]
async fn repeating_an_identical_partial_update_is_idempotent() {
    let f = fixture(MockCalendarStore::new(vec![calendar("cal-1", "u1")]));

    let outcome = f.orchestrator.create_event(base_request()).await.unwrap();
    let event_id = outcome.event.id.clone();

    let mut update = UpdateEventRequest::new(event_id.clone());
    update.patch = EventPatch {
        title: Some("Renamed".to_string()),
        priority: Some(3),
        ..Default::default()
    };
    update.reminders = Some(vec![5]);

    let first = f.orchestrator.update_event(update.clone()).await.unwrap();
    let after_first = f.events.snapshot(&event_id).unwrap();

    let second = f.orchestrator.update_event(update).await.unwrap();
    let after_second = f.events.snapshot(&event_id).unwrap();

    assert_eq!(after_first.title, after_second.title);
    assert_eq!(after_first.priority, after_second.priority);
    assert_eq!(after_first.start_date, after_second.start_date);
    // Untouched fields survived both updates.
    assert_eq!(after_second.timezone, "America/New_York");
    // Reminders are replaced, not accumulated.
    assert_eq!(f.reminders.for_event(&event_id).len(), 1);
    assert!(first.report.failures.is_empty());
    assert!(second.report.failures.is_empty());
}

#[tokio::test]
async fn update_patches_the_provider_with_merged_fields() {
    let f = fixture(MockCalendarStore::new(vec![calendar("cal-1", "u1")]));

    let outcome = f.orchestrator.create_event(base_request()).await.unwrap();
    let event_id = outcome.event.id.clone();

    let mut update = UpdateEventRequest::new(event_id);
    update.patch = EventPatch {
        start_date: Some(ts(2024, 6, 4, 9, 0)),
        end_date: Some(ts(2024, 6, 4, 9, 30)),
        ..Default::default()
    };
    f.orchestrator.update_event(update).await.unwrap();

    let patched = f.provider.patched.lock().unwrap();
    assert_eq!(patched.len(), 1);
    assert_eq!(patched[0].0, "prov-0");
    assert_eq!(patched[0].1.start_date, ts(2024, 6, 4, 9, 0));
    // The untouched title is still carried on the provider payload.
    assert_eq!(patched[0].1.summary.as_deref(), Some("Design review"));
}

#[tokio::test]
async fn updating_a_missing_event_is_not_found() {
    let f = fixture(MockCalendarStore::new(vec![calendar("cal-1", "u1")]));

    let err = f
        .orchestrator
        .update_event(UpdateEventRequest::new("ghost#cal-1"))
        .await
        .unwrap_err();

    assert!(matches!(err, ConcordError::NotFound(_)));
}

#[tokio::test]
async fn delete_tears_down_side_records_then_provider_then_backend() {
    let assists = MockAssistStore::default().with_meeting(meeting_assist("meeting-1", "u1"));
    let f = fixture_with(
        MockCalendarStore::new(vec![calendar("cal-1", "u1")]),
        MockIntegrationStore::default(),
        assists,
    );

    // Seed an event carrying a Zoom conference and a meeting-assist link.
    let mut event = empty_event(
        "prov-9#cal-1",
        "u1",
        "cal-1",
        ts(2024, 6, 3, 14, 0),
        ts(2024, 6, 3, 15, 0),
        "UTC",
    );
    event.conference_id = Some("880123".to_string());
    event.meeting_id = Some("meeting-1".to_string());
    f.events.insert(event);

    let now = ts(2024, 1, 1, 0, 0);
    f.conferences
        .upsert_conference(concord_domain::Conference {
            id: "880123".to_string(),
            user_id: "u1".to_string(),
            calendar_id: "cal-1".to_string(),
            app: ConferenceApp::Zoom,
            request_id: "req-1".to_string(),
            name: "Zoom Meeting".to_string(),
            notes: None,
            entry_points: vec![],
            join_url: None,
            start_url: None,
            status: None,
            is_private: false,
            deleted: false,
            created_date: now,
            updated_at: now,
        })
        .await
        .unwrap();

    let report = f.orchestrator.delete_event("prov-9#cal-1").await.unwrap();

    assert!(report.failures.is_empty());
    assert_eq!(f.zoom.deleted.lock().unwrap().as_slice(), &[880_123]);
    assert!(f.conferences.snapshot("880123").is_none());
    assert!(!f.assists.has_meeting("meeting-1"));
    assert_eq!(
        f.provider.deleted.lock().unwrap().as_slice(),
        &[("cal-1".to_string(), "prov-9".to_string())]
    );
    assert!(f.events.snapshot("prov-9#cal-1").is_none());
}
