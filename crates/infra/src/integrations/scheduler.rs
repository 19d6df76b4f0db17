//! Meeting-assist scheduling kickoff
//!
//! Once enough attendees have responded, final scheduling is an external
//! operation: one POST to the scheduler endpoint.

use async_trait::async_trait;
use concord_core::provider_ports::{AssistLauncher, StartAssistRequest};
use concord_domain::{ConcordError, Result, SchedulerConfig};
use reqwest::Method;
use tracing::info;

use crate::http::HttpClient;

pub struct HttpAssistLauncher {
    http: HttpClient,
    url: String,
}

impl HttpAssistLauncher {
    pub fn new(http: HttpClient, config: SchedulerConfig) -> Self {
        Self { http, url: config.url }
    }
}

#[async_trait]
impl AssistLauncher for HttpAssistLauncher {
    async fn start_meeting_assist(&self, request: &StartAssistRequest) -> Result<()> {
        if self.url.is_empty() {
            return Err(ConcordError::Config("no scheduler URL configured".into()));
        }

        let builder = self.http.request(Method::POST, &self.url).json(request);
        let response = self.http.send(builder).await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_else(|_| "unknown error".to_string());
            return Err(ConcordError::Network(format!(
                "scheduler kickoff failed ({status}): {text}"
            )));
        }

        info!(user_id = %request.user_id, "meeting-assist scheduling started");
        Ok(())
    }
}
