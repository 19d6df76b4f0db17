//! Event records and the field-level patch used for partial updates

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::EVENT_KEY_SEPARATOR;
use crate::errors::ConcordError;
use crate::types::time::{ClockTime, Recurrence};

/// Composite event key `<providerEventId>#<calendarId>`.
///
/// This is the canonical identifier of an event record; exactly one record
/// exists per key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventKey {
    pub provider_event_id: String,
    pub calendar_id: String,
}

impl EventKey {
    pub fn new(provider_event_id: impl Into<String>, calendar_id: impl Into<String>) -> Self {
        Self {
            provider_event_id: provider_event_id.into(),
            calendar_id: calendar_id.into(),
        }
    }
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            self.provider_event_id, EVENT_KEY_SEPARATOR, self.calendar_id
        )
    }
}

impl FromStr for EventKey {
    type Err = ConcordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (provider_event_id, calendar_id) = s
            .split_once(EVENT_KEY_SEPARATOR)
            .ok_or_else(|| ConcordError::InvalidInput(format!("not a composite event key: {s:?}")))?;
        if provider_event_id.is_empty() || calendar_id.is_empty() {
            return Err(ConcordError::InvalidInput(format!(
                "composite event key has an empty side: {s:?}"
            )));
        }
        Ok(Self::new(provider_event_id, calendar_id))
    }
}

/// Whether an event blocks its time slot for availability purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transparency {
    Opaque,
    Transparent,
}

/// Provider-side event visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Default,
    Public,
    Private,
}

/// Who receives provider notifications about a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SendUpdates {
    All,
    ExternalOnly,
    None,
}

/// Buffer minutes reserved around an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BufferTime {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before_event: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after_event: Option<i32>,
}

/// An event record as stored in the backend.
///
/// Beyond the calendar basics, an event carries the assistant planner's
/// scheduling-preference fields (priority, deadlines, impact scores, `copy*`
/// inheritance flags, `userModified*` markers). Those are pass-through data
/// for this engine: persisted and returned verbatim, never interpreted here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Composite key, `<providerEventId>#<calendarId>`.
    pub id: String,
    pub user_id: String,
    pub calendar_id: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub timezone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub all_day: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<Recurrence>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conference_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transparency: Option<Transparency>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_attendees: Option<i32>,
    #[serde(default)]
    pub use_default_alarms: bool,
    #[serde(default)]
    pub deleted: bool,

    // Planner pass-through fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soft_deadline: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hard_deadline: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub positive_impact_score: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative_impact_score: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_day_of_week: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_time: Option<ClockTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_start_time_range: Option<ClockTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_end_time_range: Option<ClockTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_blocking: Option<BufferTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_meeting: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_external_meeting: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_break: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_follow_up: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifiable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anyone_can_add_self: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guests_can_invite_others: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guests_can_see_other_guests: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copy_availability: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copy_time_blocking: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copy_time_preference: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copy_reminders: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copy_priority_level: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copy_modifiable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copy_categories: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copy_is_break: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copy_is_meeting: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copy_is_external_meeting: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copy_duration: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_modified_availability: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_modified_time_blocking: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_modified_time_preference: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_modified_reminders: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_modified_priority_level: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_modified_categories: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_modified_modifiable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_modified_is_break: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_modified_is_meeting: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_modified_is_external_meeting: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_modified_duration: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_up_event_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_event_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_event_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting_id: Option<String>,

    pub created_date: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    pub fn key(&self) -> Result<EventKey, ConcordError> {
        self.id.parse()
    }
}

/// Field-level patch for an event record.
///
/// `None` means "leave the stored value untouched"; the store only writes
/// columns that are `Some`. Applying the same patch twice yields the same
/// record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all_day: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<Recurrence>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conference_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transparency: Option<Transparency>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_attendees: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_default_alarms: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soft_deadline: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hard_deadline: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifiable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_meeting: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_break: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_blocking: Option<BufferTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting_id: Option<String>,
}

impl EventPatch {
    /// Apply onto an existing record, field by field.
    pub fn apply_to(&self, event: &mut Event) {
        macro_rules! merge {
            ($($field:ident),* $(,)?) => {
                $(if let Some(v) = &self.$field {
                    event.$field = Some(v.clone());
                })*
            };
        }

        if let Some(v) = self.start_date {
            event.start_date = v;
        }
        if let Some(v) = self.end_date {
            event.end_date = v;
        }
        if let Some(v) = &self.timezone {
            event.timezone = v.clone();
        }
        if let Some(v) = self.all_day {
            event.all_day = v;
        }
        if let Some(v) = self.use_default_alarms {
            event.use_default_alarms = v;
        }
        if let Some(v) = self.deleted {
            event.deleted = v;
        }
        merge!(
            title,
            notes,
            location,
            recurrence,
            conference_id,
            transparency,
            visibility,
            status,
            html_link,
            color_id,
            max_attendees,
            priority,
            soft_deadline,
            hard_deadline,
            duration_minutes,
            modifiable,
            is_meeting,
            is_break,
            time_blocking,
            meeting_id,
        );
    }
}

/// A reminder attached to an event, minutes before start.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub id: String,
    pub user_id: String,
    pub event_id: String,
    /// `None` means "use the calendar's default reminder".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minutes: Option<i32>,
    #[serde(default)]
    pub use_default: bool,
    pub created_date: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Association between a category and an event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryLink {
    pub id: String,
    pub user_id: String,
    pub category_id: String,
    pub event_id: String,
    pub created_date: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
