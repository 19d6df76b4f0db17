//! Conference records and the provider payload shape

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which video-conference application backs a conference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConferenceApp {
    Zoom,
    GoogleMeet,
}

/// Conference payload type as carried to the calendar provider.
///
/// Zoom links ride along as an `addOn` entry point; a Google Meet is a
/// `hangoutsMeet` create-request resolved by the provider itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConferenceKind {
    AddOn,
    HangoutsMeet,
}

/// A joinable entry point on a conference.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryPoint {
    pub label: String,
    pub entry_point_type: String,
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// The conference payload embedded in a provider event write.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConferenceData {
    #[serde(rename = "type")]
    pub kind: ConferenceKind,
    pub name: String,
    pub conference_id: String,
    /// Idempotency token for the provider-side create.
    pub request_id: String,
    /// True when the provider is expected to mint the link itself
    /// (deferred Google Meet creation).
    pub create_request: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entry_points: Vec<EntryPoint>,
}

/// A conference record as stored in the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conference {
    pub id: String,
    pub user_id: String,
    pub calendar_id: String,
    pub app: ConferenceApp,
    /// Idempotency token: re-provisioning with the same id overwrites.
    pub request_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entry_points: Vec<EntryPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub deleted: bool,
    pub created_date: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
