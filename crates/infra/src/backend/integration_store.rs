//! Provider-integration store over the GraphQL backend

use std::sync::Arc;

use async_trait::async_trait;
use concord_core::backend_ports::IntegrationStore;
use concord_domain::{CalendarIntegration, Result};
use serde::Deserialize;
use serde_json::json;

use super::client::GraphqlClient;

const INTEGRATION_FIELDS: &str = "id userId name resource enabled token contactName contactEmail";

pub struct GraphIntegrationStore {
    client: Arc<GraphqlClient>,
}

impl GraphIntegrationStore {
    pub fn new(client: Arc<GraphqlClient>) -> Self {
        Self { client }
    }
}

#[derive(Deserialize)]
struct IntegrationList {
    #[serde(rename = "Calendar_Integration")]
    integrations: Vec<CalendarIntegration>,
}

#[async_trait]
impl IntegrationStore for GraphIntegrationStore {
    async fn get_integration(
        &self,
        user_id: &str,
        resource: &str,
    ) -> Result<Option<CalendarIntegration>> {
        let query = format!(
            "query GetCalendarIntegrationByResource($userId: uuid!, $resource: String!) {{\n\
               Calendar_Integration(where: {{userId: {{_eq: $userId}}, \
             resource: {{_eq: $resource}}}}, limit: 1) {{ {INTEGRATION_FIELDS} }}\n\
             }}"
        );
        let data: IntegrationList = self
            .client
            .execute(
                "GetCalendarIntegrationByResource",
                &query,
                json!({ "userId": user_id, "resource": resource }),
            )
            .await?;
        Ok(data.integrations.into_iter().next())
    }
}
