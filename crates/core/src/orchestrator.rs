//! Event upsert orchestration
//!
//! Composes calendar resolution, conference provisioning, the provider
//! write, and the backend record fan-out into the create / update / delete
//! entry points. Side-record writes (attendees, reminders, categories) are
//! dispatched independently and collected; a failure in one does not roll
//! back the others; the report carries what happened instead.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use concord_domain::constants::GOOGLE_CALENDAR_RESOURCE;
use concord_domain::{
    Attendee, Calendar, CategoryLink, ConcordError, ConferenceApp, Event, EventKey, EventPatch,
    Recurrence, Reminder, Result, SendUpdates, Transparency, Visibility,
};
use futures::future::join_all;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::backend_ports::{
    AssistStore, AttendeeStore, CategoryStore, ConferenceStore, EventStore, EventUpsert,
    ReminderStore,
};
use crate::conference::{ConferenceOutcome, ConferenceRequest, ConferenceService};
use crate::provider_ports::{
    CalendarProvider, ProviderAttendee, ProviderEventWrite, ProviderReminders, ZoomClient,
};
use crate::recurrence::recurrence_lines;
use crate::resolution::CalendarResolver;

/// An attendee as supplied by the caller.
#[derive(Debug, Clone)]
pub struct AttendeeDraft {
    pub email: String,
    pub name: Option<String>,
    pub contact_id: Option<String>,
    pub optional: bool,
}

impl AttendeeDraft {
    pub fn new(email: impl Into<String>) -> Self {
        Self { email: email.into(), name: None, contact_id: None, optional: false }
    }
}

/// Everything a caller can say about a new event, named and optional.
#[derive(Debug, Clone)]
pub struct EventWriteRequest {
    pub user_id: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub timezone: String,
    /// Explicit target; resolution falls back when absent.
    pub calendar_id: Option<String>,
    pub title: Option<String>,
    pub notes: Option<String>,
    pub location: Option<String>,
    pub all_day: bool,
    pub recurrence: Option<Recurrence>,
    pub attendees: Vec<AttendeeDraft>,
    pub conference: Option<ConferenceRequest>,
    /// Reminder overrides, minutes before start.
    pub reminders: Vec<i32>,
    pub use_default_alarms: bool,
    pub category_ids: Vec<String>,
    pub send_updates: Option<SendUpdates>,
    pub transparency: Option<Transparency>,
    pub visibility: Option<Visibility>,
    pub color_id: Option<String>,
    /// Planner pass-through fields merged into the stored record.
    pub extras: EventPatch,
}

impl EventWriteRequest {
    pub fn new(
        user_id: impl Into<String>,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
        timezone: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            start_date,
            end_date,
            timezone: timezone.into(),
            calendar_id: None,
            title: None,
            notes: None,
            location: None,
            all_day: false,
            recurrence: None,
            attendees: Vec::new(),
            conference: None,
            reminders: Vec::new(),
            use_default_alarms: false,
            category_ids: Vec::new(),
            send_updates: None,
            transparency: None,
            visibility: None,
            color_id: None,
            extras: EventPatch::default(),
        }
    }
}

/// A change to an existing event. Only `Some` pieces are touched, except
/// reminders and attendees, which are replaced wholesale when supplied.
#[derive(Debug, Clone)]
pub struct UpdateEventRequest {
    /// Composite key `<providerEventId>#<calendarId>`.
    pub event_id: String,
    pub patch: EventPatch,
    pub attendees: Option<Vec<AttendeeDraft>>,
    /// `Some` replaces all reminders (delete then insert).
    pub reminders: Option<Vec<i32>>,
    pub category_ids: Option<Vec<String>>,
    pub send_updates: Option<SendUpdates>,
}

impl UpdateEventRequest {
    pub fn new(event_id: impl Into<String>) -> Self {
        Self {
            event_id: event_id.into(),
            patch: EventPatch::default(),
            attendees: None,
            reminders: None,
            category_ids: None,
            send_updates: None,
        }
    }
}

/// One side-record write that did not land.
#[derive(Debug, Clone)]
pub struct StepFailure {
    pub step: &'static str,
    pub error: ConcordError,
}

/// What happened around the core event write.
#[derive(Debug, Clone, Default)]
pub struct UpsertReport {
    pub attendees_upserted: usize,
    pub reminders_written: usize,
    pub categories_linked: usize,
    pub failures: Vec<StepFailure>,
}

/// Result of a create or update.
#[derive(Debug, Clone)]
pub struct EventUpsertOutcome {
    pub event: Event,
    pub conference: Option<ConferenceOutcome>,
    pub report: UpsertReport,
}

/// Result of a deletion; core deletions failing abort, side-record cleanup
/// failures are collected here.
#[derive(Debug, Clone, Default)]
pub struct DeletionReport {
    pub failures: Vec<StepFailure>,
}

/// The backend stores the orchestrator fans out to.
#[derive(Clone)]
pub struct BackendStores {
    pub events: Arc<dyn EventStore>,
    pub attendees: Arc<dyn AttendeeStore>,
    pub reminders: Arc<dyn ReminderStore>,
    pub categories: Arc<dyn CategoryStore>,
    pub conferences: Arc<dyn ConferenceStore>,
    pub assists: Arc<dyn AssistStore>,
}

/// Orchestrates event create / update / delete across the backend and the
/// calendar provider.
pub struct EventOrchestrator {
    resolver: CalendarResolver,
    conference_service: ConferenceService,
    stores: BackendStores,
    provider: Arc<dyn CalendarProvider>,
    zoom: Arc<dyn ZoomClient>,
}

impl EventOrchestrator {
    pub fn new(
        resolver: CalendarResolver,
        conference_service: ConferenceService,
        stores: BackendStores,
        provider: Arc<dyn CalendarProvider>,
        zoom: Arc<dyn ZoomClient>,
    ) -> Self {
        Self { resolver, conference_service, stores, provider, zoom }
    }

    /// Create an event end to end.
    ///
    /// 1. Resolve the target calendar
    /// 2. Provision a conference when one is requested
    /// 3. Write the event at the provider
    /// 4. Upsert the backend record
    /// 5. Fan out attendees, reminders, and category links
    #[instrument(skip(self, request), fields(user_id = %request.user_id))]
    pub async fn create_event(&self, request: EventWriteRequest) -> Result<EventUpsertOutcome> {
        if request.start_date >= request.end_date {
            return Err(ConcordError::InvalidInput(
                "event must end after it starts".into(),
            ));
        }

        let calendar = self
            .resolver
            .resolve(
                &request.user_id,
                request.calendar_id.as_deref(),
                true,
                Some(GOOGLE_CALENDAR_RESOURCE),
            )
            .await?
            .ok_or_else(|| {
                ConcordError::NotFound(format!(
                    "no calendar resolved for user {}",
                    request.user_id
                ))
            })?;

        let conference = self.maybe_provision_conference(&calendar, &request).await?;

        let conference_data = conference.as_ref().and_then(ConferenceOutcome::data).cloned();

        let (provider_event_id, html_link, provider_conference_id) =
            if calendar.is_local_device() {
                // Device calendars have no remote side here; the backend
                // record is what the device mirrors from.
                (Uuid::new_v4().to_string(), None, None)
            } else {
                let write = build_provider_write(&calendar, &request, conference_data.clone());
                let handle = self.provider.create_event(&write).await?;
                (handle.provider_event_id, handle.html_link, handle.conference_id)
            };

        let composite_id = EventKey::new(provider_event_id, calendar.id.clone()).to_string();

        let mut patch = request.extras.clone();
        patch.title = request.title.clone().or(patch.title.take());
        patch.notes = request.notes.clone().or(patch.notes.take());
        patch.location = request.location.clone().or(patch.location.take());
        patch.all_day = Some(request.all_day);
        patch.recurrence = request.recurrence.clone().or(patch.recurrence.take());
        patch.transparency = request.transparency.or(patch.transparency.take());
        patch.visibility = request.visibility.or(patch.visibility.take());
        patch.color_id = request.color_id.clone().or(patch.color_id.take());
        patch.use_default_alarms = Some(request.use_default_alarms);
        patch.html_link = html_link.or(patch.html_link.take());
        patch.conference_id = conference
            .as_ref()
            .and_then(|c| c.conference_id().map(str::to_string))
            .or(provider_conference_id)
            .or(patch.conference_id.take());

        let event = self
            .stores
            .events
            .upsert_event(EventUpsert {
                id: composite_id,
                user_id: request.user_id.clone(),
                calendar_id: calendar.id.clone(),
                start_date: request.start_date,
                end_date: request.end_date,
                timezone: request.timezone.clone(),
                patch,
            })
            .await?;

        let report = self
            .fan_out_side_records(
                &event,
                &request.attendees,
                &request.reminders,
                request.use_default_alarms,
                &request.category_ids,
            )
            .await;

        info!(event_id = %event.id, "created event");
        Ok(EventUpsertOutcome { event, conference, report })
    }

    /// Update an existing event; the provider is PATCHed and reminders are
    /// replaced wholesale when supplied.
    #[instrument(skip(self, request), fields(event_id = %request.event_id))]
    pub async fn update_event(&self, request: UpdateEventRequest) -> Result<EventUpsertOutcome> {
        let key: EventKey = request.event_id.parse()?;

        let existing = self
            .stores
            .events
            .get_event(&request.event_id)
            .await?
            .ok_or_else(|| {
                ConcordError::NotFound(format!("event {} not found", request.event_id))
            })?;

        let calendar = self.stores_calendar(&key.calendar_id).await?;

        // Project the patch onto the stored record to know what the
        // provider payload should now say.
        let mut projected = existing.clone();
        request.patch.apply_to(&mut projected);

        if !calendar.as_ref().is_some_and(Calendar::is_local_device) {
            if let Some(calendar) = &calendar {
                let write = build_patch_write(calendar, &projected, &request);
                self.provider.patch_event(&key.provider_event_id, &write).await?;
            } else {
                warn!(calendar_id = %key.calendar_id, "calendar record missing; skipping provider patch");
            }
        }

        self.maybe_reschedule_conference(&existing, &projected).await?;

        let event = self
            .stores
            .events
            .upsert_event(EventUpsert {
                id: request.event_id.clone(),
                user_id: existing.user_id.clone(),
                calendar_id: key.calendar_id.clone(),
                start_date: projected.start_date,
                end_date: projected.end_date,
                timezone: projected.timezone.clone(),
                patch: request.patch.clone(),
            })
            .await?;

        let mut report = UpsertReport::default();

        if let Some(attendees) = &request.attendees {
            if let Err(e) = self.stores.attendees.delete_attendees_for_event(&event.id).await {
                report.failures.push(StepFailure { step: "attendees", error: e });
            } else {
                let partial = self.upsert_attendees(&event, attendees).await;
                report.attendees_upserted = partial.attendees_upserted;
                report.failures.extend(partial.failures);
            }
        }

        if let Some(reminders) = &request.reminders {
            // Replace-all: old reminders go away even when the new list is
            // empty.
            if let Err(e) = self.stores.reminders.delete_reminders_for_event(&event.id).await {
                report.failures.push(StepFailure { step: "reminders", error: e });
            } else {
                let partial = self
                    .insert_reminders(&event, reminders, event.use_default_alarms)
                    .await;
                report.reminders_written = partial.reminders_written;
                report.failures.extend(partial.failures);
            }
        }

        if let Some(category_ids) = &request.category_ids {
            if let Err(e) = self.stores.categories.delete_links_for_event(&event.id).await {
                report.failures.push(StepFailure { step: "categories", error: e });
            } else {
                let partial = self.link_categories(&event, category_ids).await;
                report.categories_linked = partial.categories_linked;
                report.failures.extend(partial.failures);
            }
        }

        info!(event_id = %event.id, "updated event");
        Ok(EventUpsertOutcome { event, conference: None, report })
    }

    /// Delete an event: side records first, then the provider event, then
    /// the backend record.
    #[instrument(skip(self), fields(event_id))]
    pub async fn delete_event(&self, event_id: &str) -> Result<DeletionReport> {
        let key: EventKey = event_id.parse()?;

        let event = self
            .stores
            .events
            .get_event(event_id)
            .await?
            .ok_or_else(|| ConcordError::NotFound(format!("event {event_id} not found")))?;

        let mut report = DeletionReport::default();

        if let Err(e) = self.stores.attendees.delete_attendees_for_event(event_id).await {
            report.failures.push(StepFailure { step: "attendees", error: e });
        }
        if let Err(e) = self.stores.reminders.delete_reminders_for_event(event_id).await {
            report.failures.push(StepFailure { step: "reminders", error: e });
        }
        if let Err(e) = self.stores.categories.delete_links_for_event(event_id).await {
            report.failures.push(StepFailure { step: "categories", error: e });
        }

        if let Some(conference_id) = &event.conference_id {
            if let Err(e) = self.tear_down_conference(conference_id).await {
                report.failures.push(StepFailure { step: "conference", error: e });
            }
        }

        if let Some(meeting_id) = &event.meeting_id {
            if let Err(e) = self.stores.assists.delete_meeting_assist(meeting_id).await {
                report.failures.push(StepFailure { step: "meeting-assist", error: e });
            }
        }

        let calendar = self.stores_calendar(&key.calendar_id).await?;
        if !calendar.as_ref().is_some_and(Calendar::is_local_device) {
            self.provider
                .delete_event(&key.calendar_id, &key.provider_event_id, None)
                .await?;
        }

        self.stores.events.delete_event(event_id).await?;

        info!(event_id, "deleted event");
        Ok(report)
    }

    async fn stores_calendar(&self, calendar_id: &str) -> Result<Option<Calendar>> {
        self.resolver.store().get_calendar(calendar_id).await
    }

    async fn maybe_provision_conference(
        &self,
        calendar: &Calendar,
        request: &EventWriteRequest,
    ) -> Result<Option<ConferenceOutcome>> {
        let Some(conference_request) = &request.conference else {
            return Ok(None);
        };

        // Conferences ride on provider-backed calendars with real invitees.
        if !calendar.is_google() || request.attendees.is_empty() {
            return Ok(None);
        }

        let mut conference_request = conference_request.clone();
        if conference_request.summary.is_none() {
            conference_request.summary = request.title.clone();
        }
        if conference_request.attendee_emails.is_empty() {
            conference_request.attendee_emails =
                request.attendees.iter().map(|a| a.email.clone()).collect();
        }

        let outcome = self
            .conference_service
            .provision(
                &request.user_id,
                &calendar.id,
                request.start_date,
                request.end_date,
                &request.timezone,
                &conference_request,
            )
            .await?;

        if let ConferenceOutcome::Unavailable { requested } = &outcome {
            warn!(?requested, "conference unavailable; event proceeds without a link");
        }

        Ok(Some(outcome))
    }

    async fn maybe_reschedule_conference(&self, existing: &Event, projected: &Event) -> Result<()> {
        let window_changed = existing.start_date != projected.start_date
            || existing.end_date != projected.end_date;
        let Some(conference_id) = &existing.conference_id else {
            return Ok(());
        };
        if !window_changed {
            return Ok(());
        }

        let Some(conference) = self.stores.conferences.get_conference(conference_id).await? else {
            warn!(%conference_id, "conference record missing; skipping reschedule");
            return Ok(());
        };

        if conference.app != ConferenceApp::Zoom {
            // Google Meet links follow the event; nothing to reschedule.
            return Ok(());
        }

        let Ok(meeting_id) = conference.id.parse::<i64>() else {
            warn!(conference_id = %conference.id, "Zoom conference id is not numeric; skipping reschedule");
            return Ok(());
        };

        let duration_minutes =
            (projected.end_date - projected.start_date).num_minutes().max(1) as u32;
        self.zoom
            .update_meeting(
                meeting_id,
                &crate::provider_ports::ZoomMeetingRequest {
                    user_id: existing.user_id.clone(),
                    start_date: projected.start_date,
                    timezone: projected.timezone.clone(),
                    agenda: projected
                        .title
                        .clone()
                        .unwrap_or_else(|| "Meeting".to_string()),
                    duration_minutes,
                    contact_name: None,
                    contact_email: None,
                    invitees: Vec::new(),
                    private_meeting: conference.is_private,
                },
            )
            .await
    }

    async fn tear_down_conference(&self, conference_id: &str) -> Result<()> {
        let Some(conference) = self.stores.conferences.get_conference(conference_id).await? else {
            return Ok(());
        };

        if conference.app == ConferenceApp::Zoom {
            match conference.id.parse::<i64>() {
                Ok(meeting_id) => self.zoom.delete_meeting(meeting_id).await?,
                Err(_) => {
                    warn!(conference_id = %conference.id, "Zoom conference id is not numeric; skipping remote delete");
                }
            }
        }

        self.stores.conferences.delete_conference(conference_id).await
    }

    async fn fan_out_side_records(
        &self,
        event: &Event,
        attendees: &[AttendeeDraft],
        reminders: &[i32],
        use_default_alarms: bool,
        category_ids: &[String],
    ) -> UpsertReport {
        let mut report = UpsertReport::default();

        let attendee_part = self.upsert_attendees(event, attendees).await;
        report.attendees_upserted = attendee_part.attendees_upserted;
        report.failures.extend(attendee_part.failures);

        let reminder_part = self.insert_reminders(event, reminders, use_default_alarms).await;
        report.reminders_written = reminder_part.reminders_written;
        report.failures.extend(reminder_part.failures);

        let category_part = self.link_categories(event, category_ids).await;
        report.categories_linked = category_part.categories_linked;
        report.failures.extend(category_part.failures);

        report
    }

    async fn upsert_attendees(&self, event: &Event, drafts: &[AttendeeDraft]) -> UpsertReport {
        let now = Utc::now();
        let writes = drafts.iter().map(|draft| {
            self.stores.attendees.upsert_attendee(Attendee {
                id: Uuid::new_v4().to_string(),
                user_id: event.user_id.clone(),
                event_id: event.id.clone(),
                name: draft.name.clone(),
                emails: vec![draft.email.clone()],
                contact_id: draft.contact_id.clone(),
                optional: draft.optional,
                response_status: None,
                created_date: now,
                updated_at: now,
            })
        });

        let mut report = UpsertReport::default();
        for result in join_all(writes).await {
            match result {
                Ok(_) => report.attendees_upserted += 1,
                Err(error) => report.failures.push(StepFailure { step: "attendees", error }),
            }
        }
        report
    }

    async fn insert_reminders(
        &self,
        event: &Event,
        minutes: &[i32],
        use_default_alarms: bool,
    ) -> UpsertReport {
        let now = Utc::now();

        let mut drafts: Vec<Reminder> = minutes
            .iter()
            .map(|m| Reminder {
                id: Uuid::new_v4().to_string(),
                user_id: event.user_id.clone(),
                event_id: event.id.clone(),
                minutes: Some(*m),
                use_default: false,
                created_date: now,
                updated_at: now,
            })
            .collect();

        if drafts.is_empty() && use_default_alarms {
            drafts.push(Reminder {
                id: Uuid::new_v4().to_string(),
                user_id: event.user_id.clone(),
                event_id: event.id.clone(),
                minutes: None,
                use_default: true,
                created_date: now,
                updated_at: now,
            });
        }

        let writes = drafts.into_iter().map(|r| self.stores.reminders.insert_reminder(r));

        let mut report = UpsertReport::default();
        for result in join_all(writes).await {
            match result {
                Ok(_) => report.reminders_written += 1,
                Err(error) => report.failures.push(StepFailure { step: "reminders", error }),
            }
        }
        report
    }

    async fn link_categories(&self, event: &Event, category_ids: &[String]) -> UpsertReport {
        let now = Utc::now();
        let writes = category_ids.iter().map(|category_id| {
            self.stores.categories.connect_category(CategoryLink {
                id: Uuid::new_v4().to_string(),
                user_id: event.user_id.clone(),
                category_id: category_id.clone(),
                event_id: event.id.clone(),
                created_date: now,
                updated_at: now,
            })
        });

        let mut report = UpsertReport::default();
        for result in join_all(writes).await {
            match result {
                Ok(_) => report.categories_linked += 1,
                Err(error) => report.failures.push(StepFailure { step: "categories", error }),
            }
        }
        report
    }
}

fn build_provider_write(
    calendar: &Calendar,
    request: &EventWriteRequest,
    conference_data: Option<concord_domain::ConferenceData>,
) -> ProviderEventWrite {
    ProviderEventWrite {
        calendar_id: calendar.id.clone(),
        start_date: request.start_date,
        end_date: request.end_date,
        timezone: request.timezone.clone(),
        all_day: request.all_day,
        summary: request.title.clone(),
        description: request.notes.clone(),
        location: request.location.clone(),
        recurrence: recurrence_lines(request.recurrence.as_ref()),
        attendees: request
            .attendees
            .iter()
            .map(|a| ProviderAttendee {
                email: a.email.clone(),
                display_name: a.name.clone(),
                optional: a.optional,
            })
            .collect(),
        conference_data,
        reminders: ProviderReminders {
            use_default: request.use_default_alarms,
            overrides: request.reminders.clone(),
        },
        send_updates: request.send_updates,
        transparency: request.transparency,
        visibility: request.visibility,
        color_id: request.color_id.clone(),
        guests_can_invite_others: None,
        guests_can_see_other_guests: None,
        anyone_can_add_self: None,
    }
}

fn build_patch_write(
    calendar: &Calendar,
    projected: &Event,
    request: &UpdateEventRequest,
) -> ProviderEventWrite {
    ProviderEventWrite {
        calendar_id: calendar.id.clone(),
        start_date: projected.start_date,
        end_date: projected.end_date,
        timezone: projected.timezone.clone(),
        all_day: projected.all_day,
        summary: projected.title.clone(),
        description: projected.notes.clone(),
        location: projected.location.clone(),
        recurrence: recurrence_lines(projected.recurrence.as_ref()),
        attendees: request
            .attendees
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|a| ProviderAttendee {
                email: a.email.clone(),
                display_name: a.name.clone(),
                optional: a.optional,
            })
            .collect(),
        conference_data: None,
        reminders: ProviderReminders {
            use_default: projected.use_default_alarms,
            overrides: request.reminders.clone().unwrap_or_default(),
        },
        send_updates: request.send_updates,
        transparency: projected.transparency,
        visibility: projected.visibility,
        color_id: projected.color_id.clone(),
        guests_can_invite_others: projected.guests_can_invite_others,
        guests_can_see_other_guests: projected.guests_can_see_other_guests,
        anyone_can_add_self: projected.anyone_can_add_self,
    }
}
