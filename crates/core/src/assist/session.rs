//! Preference session state
//!
//! Tracks one attendee's picks during a reconciliation round: slot-derived
//! preferences, fully custom ranges, and removals of previously persisted
//! ones. Every mutating entry point re-checks the meeting-state guards
//! first; a refused mutation changes nothing.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use concord_domain::{
    AvailableSlot, ClockTime, ConcordError, GuardReason, MeetingAssist, PreferredTimeRange,
    Result,
};
use tracing::debug;
use uuid::Uuid;

use crate::timezone::{convert_clock_time, iso_weekday, local_date_and_time};

/// What a slot toggle did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotToggle {
    /// A preference was added for this slot; carries the preference id.
    Selected(String),
    /// The preference tied to this slot was withdrawn.
    Unselected(String),
}

/// The server-side effects of a submission.
#[derive(Debug, Clone, Default)]
pub struct SubmissionPayload {
    /// Previously persisted preferences to delete.
    pub delete_ids: Vec<String>,
    /// New preferences, already converted to the host timezone.
    pub upserts: Vec<PreferredTimeRange>,
}

/// One attendee's in-flight preference edits.
#[derive(Debug)]
pub struct PreferenceSession {
    meeting: MeetingAssist,
    attendee_id: String,
    is_host: bool,
    viewer_tz: Tz,
    /// Already persisted, host-zone times converted for display upstream.
    old: Vec<PreferredTimeRange>,
    /// Added this round via slot picks, tagged with the slot id.
    added: Vec<(PreferredTimeRange, String)>,
    /// Added this round as custom ranges.
    custom: Vec<PreferredTimeRange>,
    /// Previously persisted preferences withdrawn this round.
    removed: Vec<PreferredTimeRange>,
}

impl PreferenceSession {
    pub fn new(
        meeting: MeetingAssist,
        attendee_id: impl Into<String>,
        is_host: bool,
        viewer_tz: Tz,
        existing: Vec<PreferredTimeRange>,
    ) -> Self {
        Self {
            meeting,
            attendee_id: attendee_id.into(),
            is_host,
            viewer_tz,
            old: existing,
            added: Vec::new(),
            custom: Vec::new(),
            removed: Vec::new(),
        }
    }

    pub fn meeting(&self) -> &MeetingAssist {
        &self.meeting
    }

    pub fn viewer_tz(&self) -> &Tz {
        &self.viewer_tz
    }

    /// The preference list as the attendee currently sees it.
    pub fn visible_preferences(&self) -> Vec<&PreferredTimeRange> {
        self.old
            .iter()
            .filter(|pt| !self.removed.iter().any(|r| r.id == pt.id))
            .chain(self.added.iter().map(|(pt, _)| pt))
            .chain(self.custom.iter())
            .collect()
    }

    /// Refuse mutations once the meeting can no longer be influenced.
    pub fn guard(&self, now: DateTime<Utc>) -> Result<()> {
        if self.meeting.cancelled {
            return Err(ConcordError::Guard(GuardReason::Cancelled));
        }
        if now > self.meeting.window_end_date {
            return Err(ConcordError::Guard(GuardReason::WindowClosed));
        }
        if self.meeting.expire_date.is_some_and(|expiry| now > expiry) {
            return Err(ConcordError::Guard(GuardReason::Expired));
        }
        if self.meeting.event_id.is_some() {
            return Err(ConcordError::Guard(GuardReason::AlreadyScheduled));
        }
        Ok(())
    }

    /// Select or unselect a generated slot.
    ///
    /// Selecting derives a preference from the slot's date and times;
    /// unselecting withdraws the preference previously derived from the
    /// same slot.
    pub fn toggle_slot(&mut self, slot: &AvailableSlot, now: DateTime<Utc>) -> Result<SlotToggle> {
        self.guard(now)?;

        if let Some(idx) = self.added.iter().position(|(_, slot_id)| *slot_id == slot.id) {
            let (preference, _) = self.added.remove(idx);
            debug!(slot_id = %slot.id, "unselected slot");
            return Ok(SlotToggle::Unselected(preference.id));
        }

        let (_, start_time) = local_date_and_time(slot.start_date, &self.viewer_tz);
        let (_, end_time) = local_date_and_time(slot.end_date, &self.viewer_tz);

        let preference = PreferredTimeRange {
            id: Uuid::new_v4().to_string(),
            meeting_id: self.meeting.id.clone(),
            attendee_id: self.attendee_id.clone(),
            host_id: self.meeting.user_id.clone(),
            day_of_week: Some(iso_weekday(slot.start_date, &self.viewer_tz)),
            start_time,
            end_time,
            created_date: now,
            updated_at: now,
        };
        let id = preference.id.clone();
        self.added.push((preference, slot.id.clone()));
        debug!(slot_id = %slot.id, "selected slot");
        Ok(SlotToggle::Selected(id))
    }

    /// Append a fully custom time range, outside the generated slots.
    ///
    /// Gated: only the host, or a meeting whose host guarantees
    /// availability, accepts custom ranges.
    pub fn add_custom_preference(
        &mut self,
        day_of_week: Option<u8>,
        start_time: ClockTime,
        end_time: ClockTime,
        now: DateTime<Utc>,
    ) -> Result<&PreferredTimeRange> {
        self.guard(now)?;

        if !self.meeting.guarantee_availability && !self.is_host {
            return Err(ConcordError::Auth(
                "custom time preferences are not enabled for this meeting".into(),
            ));
        }

        if start_time >= end_time {
            return Err(ConcordError::InvalidInput(
                "preferred range must end after it starts".into(),
            ));
        }

        let preference = PreferredTimeRange {
            id: Uuid::new_v4().to_string(),
            meeting_id: self.meeting.id.clone(),
            attendee_id: self.attendee_id.clone(),
            host_id: self.meeting.user_id.clone(),
            day_of_week,
            start_time,
            end_time,
            created_date: now,
            updated_at: now,
        };
        self.custom.push(preference);
        Ok(self.custom.last().expect("just pushed"))
    }

    /// Withdraw a preference by id, wherever it currently lives.
    pub fn remove_preference(&mut self, id: &str, now: DateTime<Utc>) -> Result<()> {
        self.guard(now)?;

        if let Some(idx) = self.added.iter().position(|(pt, _)| pt.id == id) {
            self.added.remove(idx);
            return Ok(());
        }
        if let Some(idx) = self.custom.iter().position(|pt| pt.id == id) {
            self.custom.remove(idx);
            return Ok(());
        }
        if let Some(existing) = self.old.iter().find(|pt| pt.id == id) {
            if !self.removed.iter().any(|r| r.id == id) {
                self.removed.push(existing.clone());
            }
            return Ok(());
        }

        Err(ConcordError::NotFound(format!("no preference with id {id}")))
    }

    /// Build the server-side effects of submitting this round.
    ///
    /// New preferences are converted from the viewer's zone into the host
    /// zone, projected onto `reference_date`.
    pub fn submission(
        &self,
        now: DateTime<Utc>,
        reference_date: NaiveDate,
    ) -> Result<SubmissionPayload> {
        self.guard(now)?;

        let host_tz = crate::timezone::parse_tz(&self.meeting.timezone)?;

        let mut upserts = Vec::new();
        for preference in self.added.iter().map(|(pt, _)| pt).chain(self.custom.iter()) {
            upserts.push(PreferredTimeRange {
                start_time: convert_clock_time(
                    preference.start_time,
                    &self.viewer_tz,
                    &host_tz,
                    reference_date,
                )?,
                end_time: convert_clock_time(
                    preference.end_time,
                    &self.viewer_tz,
                    &host_tz,
                    reference_date,
                )?,
                ..preference.clone()
            });
        }

        Ok(SubmissionPayload {
            delete_ids: self.removed.iter().map(|pt| pt.id.clone()).collect(),
            upserts,
        })
    }
}
