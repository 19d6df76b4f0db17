//! GraphQL transport
//!
//! Single-endpoint POST of `{operationName, query, variables}` with the
//! admin secret carried in a header. GraphQL-level errors are surfaced as
//! `ConcordError::Backend`.

use concord_domain::{BackendConfig, ConcordError, Result};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::http::HttpClient;

const ADMIN_SECRET_HEADER: &str = "X-Hasura-Admin-Secret";

/// Client for the GraphQL backend.
#[derive(Clone)]
pub struct GraphqlClient {
    http: HttpClient,
    url: String,
    admin_secret: String,
}

#[derive(Debug, Deserialize)]
struct GraphqlEnvelope<T> {
    data: Option<T>,
    errors: Option<Vec<GraphqlErrorEntry>>,
}

#[derive(Debug, Deserialize)]
struct GraphqlErrorEntry {
    message: String,
}

impl GraphqlClient {
    pub fn new(config: &BackendConfig, http: HttpClient) -> Self {
        Self {
            http,
            url: config.url.clone(),
            admin_secret: config.admin_secret.clone(),
        }
    }

    /// Execute one operation and deserialize its `data` payload.
    pub async fn execute<V, T>(
        &self,
        operation_name: &str,
        query: &str,
        variables: V,
    ) -> Result<T>
    where
        V: Serialize,
        T: DeserializeOwned,
    {
        let body = json!({
            "operationName": operation_name,
            "query": query,
            "variables": variables,
        });

        let builder = self
            .http
            .request(Method::POST, &self.url)
            .header(ADMIN_SECRET_HEADER, &self.admin_secret)
            .json(&body);

        let response = self.http.send(builder).await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_else(|_| "unknown error".to_string());
            return Err(ConcordError::Backend(format!(
                "backend returned {status} for {operation_name}: {text}"
            )));
        }

        let envelope: GraphqlEnvelope<T> = response.json().await.map_err(|e| {
            ConcordError::Backend(format!("failed to parse {operation_name} response: {e}"))
        })?;

        if let Some(errors) = envelope.errors.filter(|e| !e.is_empty()) {
            let joined =
                errors.iter().map(|e| e.message.as_str()).collect::<Vec<_>>().join("; ");
            return Err(ConcordError::Backend(format!("{operation_name} failed: {joined}")));
        }

        debug!(operation_name, "graphql operation succeeded");
        envelope.data.ok_or_else(|| {
            ConcordError::Backend(format!("{operation_name} returned no data"))
        })
    }
}
