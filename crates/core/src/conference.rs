//! Conference provisioning
//!
//! Creates the video-conference resource backing an event: a Zoom meeting
//! through the Zoom API, or a Google Meet placeholder the calendar provider
//! resolves when the event itself is written. Every provisioning is
//! persisted with an idempotency request id, so a retried call overwrites
//! rather than duplicates.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use concord_domain::constants::{GOOGLE_MEET_NAME, ZOOM_NAME, ZOOM_RESOURCE};
use concord_domain::{
    ConcordError, Conference, ConferenceApp, ConferenceData, ConferenceKind, EntryPoint, Result,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::backend_ports::{ConferenceStore, IntegrationStore};
use crate::provider_ports::{ZoomClient, ZoomMeetingRequest};

/// What a caller asks for when an event needs a meeting link.
///
/// Exactly one of `zoom_meet` / `google_meet` must be set; anything else is
/// an input error rather than a silent pick.
#[derive(Debug, Clone, Default)]
pub struct ConferenceRequest {
    pub zoom_meet: bool,
    pub google_meet: bool,
    /// Idempotency token; generated when absent.
    pub request_id: Option<String>,
    pub summary: Option<String>,
    pub notes: Option<String>,
    pub zoom_password: Option<String>,
    pub zoom_private_meeting: bool,
    pub attendee_emails: Vec<String>,
}

impl ConferenceRequest {
    fn app(&self) -> Result<ConferenceApp> {
        match (self.zoom_meet, self.google_meet) {
            (true, false) => Ok(ConferenceApp::Zoom),
            (false, true) => Ok(ConferenceApp::GoogleMeet),
            (true, true) => Err(ConcordError::InvalidInput(
                "cannot create both a Zoom meeting and a Google Meet".into(),
            )),
            (false, false) => Err(ConcordError::InvalidInput(
                "must request either a Zoom meeting or a Google Meet".into(),
            )),
        }
    }
}

/// Outcome of a provisioning attempt.
#[derive(Debug, Clone)]
pub enum ConferenceOutcome {
    /// A conference record exists; `data` is the payload for the provider
    /// event write.
    Created {
        conference: Conference,
        data: ConferenceData,
    },
    /// The requested provider has no enabled integration for this user; the
    /// event proceeds without a meeting link.
    Unavailable { requested: ConferenceApp },
}

impl ConferenceOutcome {
    pub fn conference_id(&self) -> Option<&str> {
        match self {
            Self::Created { conference, .. } => Some(conference.id.as_str()),
            Self::Unavailable { .. } => None,
        }
    }

    pub fn data(&self) -> Option<&ConferenceData> {
        match self {
            Self::Created { data, .. } => Some(data),
            Self::Unavailable { .. } => None,
        }
    }
}

/// Creates and persists conference resources.
pub struct ConferenceService {
    conferences: Arc<dyn ConferenceStore>,
    integrations: Arc<dyn IntegrationStore>,
    zoom: Arc<dyn ZoomClient>,
}

impl ConferenceService {
    pub fn new(
        conferences: Arc<dyn ConferenceStore>,
        integrations: Arc<dyn IntegrationStore>,
        zoom: Arc<dyn ZoomClient>,
    ) -> Self {
        Self { conferences, integrations, zoom }
    }

    /// Provision a conference for an event window.
    #[instrument(skip(self, request), fields(user_id, calendar_id))]
    pub async fn provision(
        &self,
        user_id: &str,
        calendar_id: &str,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
        timezone: &str,
        request: &ConferenceRequest,
    ) -> Result<ConferenceOutcome> {
        let app = request.app()?;

        if start_date >= end_date {
            return Err(ConcordError::InvalidInput(
                "conference window must end after it starts".into(),
            ));
        }

        let request_id = request
            .request_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        match app {
            ConferenceApp::Zoom => {
                self.provision_zoom(user_id, calendar_id, start_date, end_date, timezone, request, request_id)
                    .await
            }
            ConferenceApp::GoogleMeet => {
                self.provision_google_meet(user_id, calendar_id, request, request_id).await
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    async fn provision_zoom(
        &self,
        user_id: &str,
        calendar_id: &str,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
        timezone: &str,
        request: &ConferenceRequest,
        request_id: String,
    ) -> Result<ConferenceOutcome> {
        let integration = self.integrations.get_integration(user_id, ZOOM_RESOURCE).await?;

        let Some(integration) = integration.filter(|i| i.enabled) else {
            warn!(user_id, "no enabled Zoom integration; provisioning unavailable");
            return Ok(ConferenceOutcome::Unavailable { requested: ConferenceApp::Zoom });
        };

        let duration_minutes = (end_date - start_date).num_minutes().max(1) as u32;
        let agenda = request
            .summary
            .clone()
            .or_else(|| request.notes.clone())
            .unwrap_or_else(|| "Meeting".to_string());

        let meeting = self
            .zoom
            .create_meeting(&ZoomMeetingRequest {
                user_id: user_id.to_string(),
                start_date,
                timezone: timezone.to_string(),
                agenda,
                duration_minutes,
                contact_name: integration.contact_name.clone(),
                contact_email: integration.contact_email.clone(),
                invitees: request.attendee_emails.clone(),
                private_meeting: request.zoom_private_meeting,
            })
            .await?;

        let conference_id = meeting.id.to_string();
        let entry_points = vec![EntryPoint {
            label: ZOOM_NAME.to_string(),
            entry_point_type: "video".to_string(),
            uri: meeting.join_url.clone(),
            password: request.zoom_password.clone(),
        }];

        let data = ConferenceData {
            kind: ConferenceKind::AddOn,
            name: ZOOM_NAME.to_string(),
            conference_id: conference_id.clone(),
            request_id: request_id.clone(),
            create_request: false,
            entry_points: entry_points.clone(),
        };

        let now = Utc::now();
        let conference = self
            .conferences
            .upsert_conference(Conference {
                id: conference_id,
                user_id: user_id.to_string(),
                calendar_id: calendar_id.to_string(),
                app: ConferenceApp::Zoom,
                request_id,
                name: ZOOM_NAME.to_string(),
                notes: request.notes.clone(),
                entry_points,
                join_url: Some(meeting.join_url),
                start_url: Some(meeting.start_url),
                status: Some(meeting.status),
                is_private: request.zoom_private_meeting,
                deleted: false,
                created_date: now,
                updated_at: now,
            })
            .await?;

        info!(conference_id = %conference.id, "provisioned Zoom conference");
        Ok(ConferenceOutcome::Created { conference, data })
    }

    async fn provision_google_meet(
        &self,
        user_id: &str,
        calendar_id: &str,
        request: &ConferenceRequest,
        request_id: String,
    ) -> Result<ConferenceOutcome> {
        // No call is made here: the provider mints the Meet link when the
        // event carrying this create-request is written. The placeholder id
        // reuses the request id so a retried provisioning overwrites its
        // own record.
        let conference_id = request_id.clone();

        let data = ConferenceData {
            kind: ConferenceKind::HangoutsMeet,
            name: GOOGLE_MEET_NAME.to_string(),
            conference_id: conference_id.clone(),
            request_id: request_id.clone(),
            create_request: true,
            entry_points: Vec::new(),
        };

        let now = Utc::now();
        let conference = self
            .conferences
            .upsert_conference(Conference {
                id: conference_id,
                user_id: user_id.to_string(),
                calendar_id: calendar_id.to_string(),
                app: ConferenceApp::GoogleMeet,
                request_id,
                name: GOOGLE_MEET_NAME.to_string(),
                notes: request.notes.clone(),
                entry_points: Vec::new(),
                join_url: None,
                start_url: None,
                status: None,
                is_private: false,
                deleted: false,
                created_date: now,
                updated_at: now,
            })
            .await?;

        info!(conference_id = %conference.id, "provisioned deferred Google Meet conference");
        Ok(ConferenceOutcome::Created { conference, data })
    }
}
