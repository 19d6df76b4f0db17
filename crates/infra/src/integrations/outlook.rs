//! Microsoft Graph mail pass-throughs
//!
//! Thin authenticated wrappers over the Graph messages endpoints; the
//! response shapes are Graph's, trimmed to the fields the assistant reads.

use concord_domain::{ConcordError, Result};
use reqwest::Method;
use serde::Deserialize;

use crate::http::HttpClient;

const GRAPH_API_BASE: &str = "https://graph.microsoft.com/v1.0";

pub struct OutlookMailClient {
    http: HttpClient,
    api_base: String,
}

/// A mail message summary from a search.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlookMessage {
    pub id: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub body_preview: Option<String>,
    #[serde(default)]
    pub received_date_time: Option<String>,
}

/// A mail message with its full body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlookMessageContent {
    pub id: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub body: Option<OutlookMessageBody>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlookMessageBody {
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MessagesEnvelope {
    #[serde(default)]
    value: Vec<OutlookMessage>,
}

impl OutlookMailClient {
    pub fn new(http: HttpClient) -> Self {
        Self { http, api_base: GRAPH_API_BASE.to_string() }
    }

    pub fn with_api_base(http: HttpClient, api_base: impl Into<String>) -> Self {
        Self { http, api_base: api_base.into() }
    }

    /// Search the signed-in user's mail.
    pub async fn search_user_outlook_emails(
        &self,
        access_token: &str,
        search: &str,
    ) -> Result<Vec<OutlookMessage>> {
        let url = format!("{}/me/messages", self.api_base);
        let builder = self
            .http
            .request(Method::GET, &url)
            .bearer_auth(access_token)
            .query(&[("$search", format!("\"{search}\"")), ("$top", "25".to_string())]);

        let response = self.http.send(builder).await?;
        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_else(|_| "unknown error".to_string());
            return Err(ConcordError::Network(format!(
                "Graph mail search failed ({status}): {text}"
            )));
        }

        let envelope: MessagesEnvelope = response.json().await.map_err(|e| {
            ConcordError::Internal(format!("failed to parse Graph search response: {e}"))
        })?;
        Ok(envelope.value)
    }

    /// Fetch one message's content by id.
    pub async fn get_user_outlook_email_content(
        &self,
        access_token: &str,
        message_id: &str,
    ) -> Result<OutlookMessageContent> {
        let url = format!("{}/me/messages/{message_id}", self.api_base);
        let builder = self
            .http
            .request(Method::GET, &url)
            .bearer_auth(access_token)
            .query(&[("$select", "id,subject,body")]);

        let response = self.http.send(builder).await?;
        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_else(|_| "unknown error".to_string());
            return Err(ConcordError::Network(format!(
                "Graph message fetch failed ({status}): {text}"
            )));
        }

        response.json().await.map_err(|e| {
            ConcordError::Internal(format!("failed to parse Graph message response: {e}"))
        })
    }
}
