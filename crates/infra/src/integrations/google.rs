//! Google Calendar provider implementation
//!
//! Event writes against the Calendar REST API plus OAuth token refresh.
//! The payload here is the subset of the provider contract this engine
//! drives: window, recurrence lines, attendees, conference data, reminder
//! overrides.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use concord_core::provider_ports::{CalendarProvider, ProviderEventHandle, ProviderEventWrite};
use concord_domain::{ConcordError, ConferenceData, GoogleConfig, Result, SendUpdates};
use reqwest::Method;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use crate::http::HttpClient;

/// Margin subtracted from a token's lifetime before it counts as expired.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Access-token source: either a pre-issued token from configuration or a
/// refresh-token exchange against the OAuth endpoint, cached until expiry.
pub struct GoogleAuth {
    http: HttpClient,
    config: GoogleConfig,
    cached: Mutex<Option<CachedToken>>,
}

struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

#[derive(Debug, Deserialize)]
struct GoogleTokenRefreshResponse {
    access_token: String,
    expires_in: i64,
}

impl GoogleAuth {
    pub fn new(http: HttpClient, config: GoogleConfig) -> Self {
        Self { http, config, cached: Mutex::new(None) }
    }

    pub async fn access_token(&self) -> Result<String> {
        if let Some(cached) = self.cached.lock().expect("token cache poisoned").as_ref() {
            if cached.expires_at > Instant::now() {
                return Ok(cached.access_token.clone());
            }
        }

        if self.config.refresh_token.is_none() {
            return self
                .config
                .access_token
                .clone()
                .ok_or_else(|| {
                    ConcordError::Auth(
                        "no Google access token or refresh token configured".into(),
                    )
                });
        }

        let token = self.refresh().await?;
        Ok(token)
    }

    async fn refresh(&self) -> Result<String> {
        let client_id = self
            .config
            .client_id
            .as_deref()
            .ok_or_else(|| ConcordError::Auth("GOOGLE_CALENDAR_CLIENT_ID not set".into()))?;
        let client_secret = self
            .config
            .client_secret
            .as_deref()
            .ok_or_else(|| ConcordError::Auth("GOOGLE_CALENDAR_CLIENT_SECRET not set".into()))?;
        let refresh_token = self
            .config
            .refresh_token
            .as_deref()
            .ok_or_else(|| ConcordError::Auth("no Google refresh token configured".into()))?;

        let builder = self.http.request(Method::POST, &self.config.token_url).form(&[
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ]);

        let response = self.http.send(builder).await.map_err(|e| {
            ConcordError::Auth(format!("token refresh request failed: {e}"))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_else(|_| "unknown error".to_string());
            return Err(ConcordError::Auth(format!("token refresh failed ({status}): {text}")));
        }

        let refreshed: GoogleTokenRefreshResponse = response.json().await.map_err(|e| {
            ConcordError::Auth(format!("failed to parse token response: {e}"))
        })?;

        let lifetime = Duration::from_secs(refreshed.expires_in.max(0) as u64);
        let expires_at = Instant::now() + lifetime.saturating_sub(TOKEN_EXPIRY_MARGIN);
        *self.cached.lock().expect("token cache poisoned") = Some(CachedToken {
            access_token: refreshed.access_token.clone(),
            expires_at,
        });

        debug!("refreshed Google access token");
        Ok(refreshed.access_token)
    }
}

/// Google Calendar REST client.
pub struct GoogleCalendarClient {
    http: HttpClient,
    api_base: String,
    auth: GoogleAuth,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleEventResponse {
    id: String,
    html_link: Option<String>,
    conference_data: Option<GoogleConferenceData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleConferenceData {
    conference_id: Option<String>,
}

impl GoogleCalendarClient {
    pub fn new(http: HttpClient, config: GoogleConfig) -> Self {
        Self {
            api_base: config.api_base.clone(),
            auth: GoogleAuth::new(http.clone(), config),
            http,
        }
    }

    fn events_url(&self, calendar_id: &str) -> String {
        format!("{}/calendars/{}/events", self.api_base, calendar_id)
    }

    fn query_params(write: &ProviderEventWrite) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if write.conference_data.is_some() {
            params.push(("conferenceDataVersion", "1".to_string()));
        }
        if let Some(send_updates) = write.send_updates {
            params.push(("sendUpdates", send_updates_value(send_updates).to_string()));
        }
        params
    }

    async fn execute_write(
        &self,
        method: Method,
        url: String,
        params: Vec<(&'static str, String)>,
        body: Value,
    ) -> Result<ProviderEventHandle> {
        let token = self.auth.access_token().await?;
        let builder = self
            .http
            .request(method, &url)
            .bearer_auth(token)
            .query(&params)
            .json(&body);

        let response = self.http.send(builder).await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_else(|_| "unknown error".to_string());
            return Err(ConcordError::Network(format!(
                "Google Calendar API error ({status}): {text}"
            )));
        }

        let event: GoogleEventResponse = response.json().await.map_err(|e| {
            ConcordError::Internal(format!("failed to parse Google event response: {e}"))
        })?;

        Ok(ProviderEventHandle {
            provider_event_id: event.id,
            html_link: event.html_link,
            conference_id: event.conference_data.and_then(|c| c.conference_id),
        })
    }
}

#[async_trait]
impl CalendarProvider for GoogleCalendarClient {
    async fn create_event(&self, write: &ProviderEventWrite) -> Result<ProviderEventHandle> {
        let body = event_body(write);
        self.execute_write(
            Method::POST,
            self.events_url(&write.calendar_id),
            Self::query_params(write),
            body,
        )
        .await
    }

    async fn patch_event(
        &self,
        provider_event_id: &str,
        write: &ProviderEventWrite,
    ) -> Result<ProviderEventHandle> {
        let body = event_body(write);
        let url = format!("{}/{}", self.events_url(&write.calendar_id), provider_event_id);
        self.execute_write(Method::PATCH, url, Self::query_params(write), body).await
    }

    async fn delete_event(
        &self,
        calendar_id: &str,
        provider_event_id: &str,
        send_updates: Option<SendUpdates>,
    ) -> Result<()> {
        let token = self.auth.access_token().await?;
        let url = format!("{}/{}", self.events_url(calendar_id), provider_event_id);
        let mut builder = self.http.request(Method::DELETE, &url).bearer_auth(token);
        if let Some(send_updates) = send_updates {
            builder = builder.query(&[("sendUpdates", send_updates_value(send_updates))]);
        }

        let response = self.http.send(builder).await?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND || status == reqwest::StatusCode::GONE {
            // Already deleted at the provider; removing it again is a no-op.
            warn!(provider_event_id, %status, "provider event already gone");
            return Ok(());
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_else(|_| "unknown error".to_string());
            return Err(ConcordError::Network(format!(
                "Google Calendar delete failed ({status}): {text}"
            )));
        }
        Ok(())
    }
}

fn send_updates_value(send_updates: SendUpdates) -> &'static str {
    match send_updates {
        SendUpdates::All => "all",
        SendUpdates::ExternalOnly => "externalOnly",
        SendUpdates::None => "none",
    }
}

/// Build the Calendar API event resource from a provider write.
fn event_body(write: &ProviderEventWrite) -> Value {
    let mut body = Map::new();

    if let Some(summary) = &write.summary {
        body.insert("summary".into(), json!(summary));
    }
    if let Some(description) = &write.description {
        body.insert("description".into(), json!(description));
    }
    if let Some(location) = &write.location {
        body.insert("location".into(), json!(location));
    }

    let (start, end) = if write.all_day {
        (
            json!({ "date": write.start_date.date_naive() }),
            json!({ "date": write.end_date.date_naive() }),
        )
    } else {
        (
            json!({ "dateTime": write.start_date, "timeZone": write.timezone }),
            json!({ "dateTime": write.end_date, "timeZone": write.timezone }),
        )
    };
    body.insert("start".into(), start);
    body.insert("end".into(), end);

    if let Some(recurrence) = &write.recurrence {
        body.insert("recurrence".into(), json!(recurrence));
    }

    if !write.attendees.is_empty() {
        body.insert("attendees".into(), json!(write.attendees));
    }

    if let Some(conference) = &write.conference_data {
        body.insert("conferenceData".into(), conference_body(conference));
    }

    body.insert(
        "reminders".into(),
        json!({
            "useDefault": write.reminders.use_default,
            "overrides": write
                .reminders
                .overrides
                .iter()
                .map(|minutes| json!({ "method": "popup", "minutes": minutes }))
                .collect::<Vec<_>>(),
        }),
    );

    if let Some(transparency) = write.transparency {
        body.insert("transparency".into(), json!(transparency));
    }
    if let Some(visibility) = write.visibility {
        body.insert("visibility".into(), json!(visibility));
    }
    if let Some(color_id) = &write.color_id {
        body.insert("colorId".into(), json!(color_id));
    }
    if let Some(v) = write.guests_can_invite_others {
        body.insert("guestsCanInviteOthers".into(), json!(v));
    }
    if let Some(v) = write.guests_can_see_other_guests {
        body.insert("guestsCanSeeOtherGuests".into(), json!(v));
    }
    if let Some(v) = write.anyone_can_add_self {
        body.insert("anyoneCanAddSelf".into(), json!(v));
    }

    Value::Object(body)
}

/// A deferred conference becomes a createRequest the provider resolves;
/// an existing one (Zoom) is carried as entry points.
fn conference_body(conference: &ConferenceData) -> Value {
    if conference.create_request {
        json!({
            "createRequest": {
                "requestId": conference.request_id,
                "conferenceSolutionKey": { "type": "hangoutsMeet" },
            }
        })
    } else {
        json!({
            "conferenceId": conference.conference_id,
            "conferenceSolution": {
                "name": conference.name,
                "key": { "type": "addOn" },
            },
            "entryPoints": conference.entry_points,
        })
    }
}
