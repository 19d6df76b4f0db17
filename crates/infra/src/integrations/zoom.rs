//! Zoom meeting API client
//!
//! Create / update / delete of scheduled meetings. Authentication is a
//! server-to-server OAuth bearer token supplied through configuration.

use async_trait::async_trait;
use concord_core::provider_ports::{ZoomClient, ZoomMeeting, ZoomMeetingRequest};
use concord_domain::{ConcordError, Result, ZoomConfig};
use reqwest::Method;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::http::HttpClient;

/// Zoom's scheduled-meeting type discriminator.
const SCHEDULED_MEETING: u8 = 2;

pub struct ZoomApiClient {
    http: HttpClient,
    api_base: String,
    access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ZoomMeetingResponse {
    id: i64,
    join_url: String,
    #[serde(default)]
    start_url: String,
    #[serde(default)]
    status: String,
}

impl ZoomApiClient {
    pub fn new(http: HttpClient, config: ZoomConfig) -> Self {
        Self { http, api_base: config.api_base, access_token: config.access_token }
    }

    fn token(&self) -> Result<&str> {
        self.access_token
            .as_deref()
            .ok_or_else(|| ConcordError::Auth("no Zoom access token configured".into()))
    }

    fn meeting_body(request: &ZoomMeetingRequest) -> serde_json::Value {
        json!({
            "topic": request.agenda,
            "agenda": request.agenda,
            "type": SCHEDULED_MEETING,
            "start_time": request.start_date.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            "timezone": request.timezone,
            "duration": request.duration_minutes,
            "settings": {
                "contact_name": request.contact_name,
                "contact_email": request.contact_email,
                "meeting_invitees": request
                    .invitees
                    .iter()
                    .map(|email| json!({ "email": email }))
                    .collect::<Vec<_>>(),
                "private_meeting": request.private_meeting,
            },
        })
    }
}

#[async_trait]
impl ZoomClient for ZoomApiClient {
    async fn create_meeting(&self, request: &ZoomMeetingRequest) -> Result<ZoomMeeting> {
        if request.agenda.is_empty() {
            return Err(ConcordError::InvalidInput("a Zoom meeting needs an agenda".into()));
        }
        if request.duration_minutes == 0 {
            return Err(ConcordError::InvalidInput(
                "a Zoom meeting needs a positive duration".into(),
            ));
        }

        let url = format!("{}/users/me/meetings", self.api_base);
        let builder = self
            .http
            .request(Method::POST, &url)
            .bearer_auth(self.token()?)
            .json(&Self::meeting_body(request));

        let response = self.http.send(builder).await?;
        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_else(|_| "unknown error".to_string());
            return Err(ConcordError::Network(format!(
                "Zoom meeting create failed ({status}): {text}"
            )));
        }

        let meeting: ZoomMeetingResponse = response.json().await.map_err(|e| {
            ConcordError::Internal(format!("failed to parse Zoom response: {e}"))
        })?;

        debug!(meeting_id = meeting.id, "created Zoom meeting");
        Ok(ZoomMeeting {
            id: meeting.id,
            join_url: meeting.join_url,
            start_url: meeting.start_url,
            status: meeting.status,
        })
    }

    async fn update_meeting(&self, meeting_id: i64, request: &ZoomMeetingRequest) -> Result<()> {
        let url = format!("{}/meetings/{meeting_id}", self.api_base);
        let builder = self
            .http
            .request(Method::PATCH, &url)
            .bearer_auth(self.token()?)
            .json(&Self::meeting_body(request));

        let response = self.http.send(builder).await?;
        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_else(|_| "unknown error".to_string());
            return Err(ConcordError::Network(format!(
                "Zoom meeting update failed ({status}): {text}"
            )));
        }
        Ok(())
    }

    async fn delete_meeting(&self, meeting_id: i64) -> Result<()> {
        let url = format!("{}/meetings/{meeting_id}", self.api_base);
        let builder = self.http.request(Method::DELETE, &url).bearer_auth(self.token()?);

        let response = self.http.send(builder).await?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            warn!(meeting_id, "Zoom meeting already gone");
            return Ok(());
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_else(|_| "unknown error".to_string());
            return Err(ConcordError::Network(format!(
                "Zoom meeting delete failed ({status}): {text}"
            )));
        }
        Ok(())
    }
}
