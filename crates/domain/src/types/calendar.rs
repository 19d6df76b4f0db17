//! Calendar and provider-integration records
//!
//! Calendars are resolved from the backend, never constructed
//! algorithmically; the `resource` discriminator decides whether event
//! writes also go to an external provider.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{GOOGLE_CALENDAR_RESOURCE, LOCAL_CALENDAR_RESOURCE};

/// Access role granted on a calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AccessRole {
    Owner,
    Writer,
    Reader,
    FreeBusyReader,
}

/// A calendar record as stored in the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Calendar {
    pub id: String,
    pub user_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreground_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_level: Option<AccessRole>,
    /// Provider discriminator, e.g. `google_calendar` or `local_calendar`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    #[serde(default)]
    pub modifiable: bool,
    /// Default target for new events when no calendar is picked explicitly.
    #[serde(default)]
    pub global_primary: bool,
    #[serde(default)]
    pub deleted: bool,
    pub created_date: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Calendar {
    pub fn is_google(&self) -> bool {
        self.resource.as_deref() == Some(GOOGLE_CALENDAR_RESOURCE)
    }

    pub fn is_local_device(&self) -> bool {
        self.resource.as_deref() == Some(LOCAL_CALENDAR_RESOURCE)
    }
}

/// A third-party integration row (Zoom, Google, ...) for a user.
///
/// `enabled` gates conference provisioning against that provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarIntegration {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub resource: String,
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
}
