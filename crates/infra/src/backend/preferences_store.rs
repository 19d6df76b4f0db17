//! User-preferences store over the GraphQL backend

use std::sync::Arc;

use async_trait::async_trait;
use concord_core::backend_ports::PreferencesStore;
use concord_domain::{Result, UserPreferences};
use serde::Deserialize;
use serde_json::json;

use super::client::GraphqlClient;

const PREFERENCE_FIELDS: &str = "userId startTimes endTimes";

pub struct GraphPreferencesStore {
    client: Arc<GraphqlClient>,
}

impl GraphPreferencesStore {
    pub fn new(client: Arc<GraphqlClient>) -> Self {
        Self { client }
    }
}

#[derive(Deserialize)]
struct PreferenceList {
    #[serde(rename = "User_Preference")]
    preferences: Vec<UserPreferences>,
}

#[async_trait]
impl PreferencesStore for GraphPreferencesStore {
    async fn get_user_preferences(&self, user_id: &str) -> Result<Option<UserPreferences>> {
        let query = format!(
            "query GetUserPreferences($userId: uuid!) {{\n\
               User_Preference(where: {{userId: {{_eq: $userId}}}}, limit: 1) \
             {{ {PREFERENCE_FIELDS} }}\n\
             }}"
        );
        let data: PreferenceList = self
            .client
            .execute("GetUserPreferences", &query, json!({ "userId": user_id }))
            .await?;
        Ok(data.preferences.into_iter().next())
    }
}
