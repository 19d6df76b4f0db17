//! Reconciliation assembly and submission
//!
//! Pulls a meeting-assist session together for one attendee (busy
//! intervals from both attendee populations, host preferences, generated
//! slots, existing preferred times) and pushes a finished round back:
//! deletions, timezone-converted upserts, and the scheduling kickoff once
//! enough attendees have responded.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use concord_domain::{
    AvailableSlotsByDate, BusyInterval, ConcordError, MeetingAssist, MeetingAssistAttendee,
    PreferredTimeRange, Result, Transparency, UserPreferences,
};
use tracing::{info, instrument, warn};

use crate::assist::session::PreferenceSession;
use crate::assist::slots::{generate_available_slots_for_window, SlotWindow};
use crate::backend_ports::{AssistStore, EventStore, PreferencesStore};
use crate::provider_ports::{AssistLauncher, StartAssistRequest};
use crate::timezone::{convert_clock_time, parse_tz};

/// Everything the preference screen needs for one attendee.
#[derive(Debug)]
pub struct ReconciliationContext {
    pub meeting: MeetingAssist,
    pub attendees: Vec<MeetingAssistAttendee>,
    pub is_host: bool,
    pub host_preferences: UserPreferences,
    pub busy: Vec<BusyInterval>,
    pub slots_by_date: AvailableSlotsByDate,
    pub session: PreferenceSession,
}

/// What a submission did server-side.
#[derive(Debug, Clone, Default)]
pub struct SubmissionOutcome {
    pub deleted: usize,
    pub upserted: usize,
    /// True when the responded-attendee threshold was met and final
    /// scheduling was kicked off.
    pub scheduling_started: bool,
}

/// Assembles and submits meeting-assist preference rounds.
pub struct AssistService {
    assists: Arc<dyn AssistStore>,
    events: Arc<dyn EventStore>,
    preferences: Arc<dyn PreferencesStore>,
    launcher: Arc<dyn AssistLauncher>,
}

impl AssistService {
    pub fn new(
        assists: Arc<dyn AssistStore>,
        events: Arc<dyn EventStore>,
        preferences: Arc<dyn PreferencesStore>,
        launcher: Arc<dyn AssistLauncher>,
    ) -> Self {
        Self { assists, events, preferences, launcher }
    }

    /// Load the reconciliation context for one attendee's view.
    #[instrument(skip(self), fields(meeting_id, attendee_id))]
    pub async fn load_context(
        &self,
        meeting_id: &str,
        attendee_id: &str,
        viewer_timezone: &str,
        now: DateTime<Utc>,
    ) -> Result<ReconciliationContext> {
        let viewer_tz = parse_tz(viewer_timezone)?;

        let meeting = self
            .assists
            .get_meeting_assist(meeting_id)
            .await?
            .ok_or_else(|| ConcordError::NotFound(format!("meeting assist {meeting_id} not found")))?;
        let host_tz = parse_tz(&meeting.timezone)?;

        let attendees = self.assists.list_attendees(meeting_id).await?;
        let viewer = attendees
            .iter()
            .find(|a| a.id == attendee_id)
            .ok_or_else(|| {
                ConcordError::NotFound(format!(
                    "attendee {attendee_id} is not part of meeting {meeting_id}"
                ))
            })?;
        let is_host = viewer.user_id.as_deref() == Some(meeting.user_id.as_str());

        let busy = self.collect_busy(&meeting, &attendees).await?;

        let host_preferences = self
            .preferences
            .get_user_preferences(&meeting.user_id)
            .await?
            .unwrap_or_else(|| UserPreferences {
                user_id: meeting.user_id.clone(),
                ..Default::default()
            });

        let slots_by_date = generate_available_slots_for_window(&SlotWindow {
            window_start: meeting.window_start_date,
            window_end: meeting.window_end_date,
            slot_duration_minutes: meeting.duration,
            host_preferences: &host_preferences,
            host_tz,
            viewer_tz,
            busy: &busy,
        });

        // Persisted preferences are in the host zone; show them in the
        // viewer's.
        let reference_date = now.with_timezone(&viewer_tz).date_naive();
        let mut existing = Vec::new();
        for pt in self.assists.list_preferred_times(meeting_id).await? {
            existing.push(PreferredTimeRange {
                start_time: convert_clock_time(pt.start_time, &host_tz, &viewer_tz, reference_date)?,
                end_time: convert_clock_time(pt.end_time, &host_tz, &viewer_tz, reference_date)?,
                ..pt
            });
        }

        let session =
            PreferenceSession::new(meeting.clone(), attendee_id, is_host, viewer_tz, existing);

        Ok(ReconciliationContext {
            meeting,
            attendees,
            is_host,
            host_preferences,
            busy,
            slots_by_date,
            session,
        })
    }

    /// Busy intervals across both attendee populations: captured
    /// meeting-assist events for external attendees, primary-store events
    /// for internal ones. Transparent events do not block.
    async fn collect_busy(
        &self,
        meeting: &MeetingAssist,
        attendees: &[MeetingAssistAttendee],
    ) -> Result<Vec<BusyInterval>> {
        let mut busy = Vec::new();

        for attendee in attendees {
            if attendee.external_attendee {
                let events = self
                    .assists
                    .list_events_for_attendee(
                        &attendee.id,
                        meeting.window_start_date,
                        meeting.window_end_date,
                    )
                    .await?;
                busy.extend(
                    events
                        .into_iter()
                        .filter(|e| e.transparency != Some(Transparency::Transparent))
                        .map(|e| BusyInterval { start_date: e.start_date, end_date: e.end_date }),
                );
            } else if let Some(user_id) = &attendee.user_id {
                let events = self
                    .events
                    .list_events_in_range(
                        user_id,
                        meeting.window_start_date,
                        meeting.window_end_date,
                    )
                    .await?;
                busy.extend(
                    events
                        .into_iter()
                        .filter(|e| {
                            !e.deleted && e.transparency != Some(Transparency::Transparent)
                        })
                        .map(|e| BusyInterval { start_date: e.start_date, end_date: e.end_date }),
                );
            } else {
                warn!(attendee_id = %attendee.id, "attendee has neither events source; skipping");
            }
        }

        Ok(busy)
    }

    /// Submit a finished round: delete withdrawals, upsert additions, and
    /// kick off scheduling when the attendee threshold is met.
    #[instrument(skip(self, session), fields(meeting_id = %session.meeting().id))]
    pub async fn submit(
        &self,
        session: &PreferenceSession,
        now: DateTime<Utc>,
    ) -> Result<SubmissionOutcome> {
        let reference_date = now.with_timezone(session.viewer_tz()).date_naive();
        let payload = session.submission(now, reference_date)?;

        let mut outcome = SubmissionOutcome::default();

        if !payload.delete_ids.is_empty() {
            outcome.deleted = self
                .assists
                .delete_preferred_times_by_ids(payload.delete_ids.clone())
                .await?;
        }

        if !payload.upserts.is_empty() {
            outcome.upserted = self.assists.upsert_preferred_times(payload.upserts).await?;
        }

        let meeting = session.meeting();
        let attendee_total = self.assists.list_attendees(&meeting.id).await?.len() as u32;
        if meeting.min_threshold_count > 0 && attendee_total >= meeting.min_threshold_count {
            self.launcher
                .start_meeting_assist(&StartAssistRequest {
                    user_id: meeting.user_id.clone(),
                    window_start_date: meeting.window_start_date,
                    window_end_date: meeting.window_end_date,
                    timezone: meeting.timezone.clone(),
                })
                .await?;
            outcome.scheduling_started = true;
            info!(meeting_id = %meeting.id, attendee_total, "attendee threshold met; scheduling started");
        }

        Ok(outcome)
    }
}
