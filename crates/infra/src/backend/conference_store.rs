//! Conference store over the GraphQL backend

use std::sync::Arc;

use async_trait::async_trait;
use concord_core::backend_ports::ConferenceStore;
use concord_domain::{ConcordError, Conference, Result};
use serde::Deserialize;
use serde_json::json;

use super::client::GraphqlClient;

const CONFERENCE_FIELDS: &str = "id userId calendarId app requestId name notes entryPoints \
                                 joinUrl startUrl status isPrivate deleted createdDate updatedAt";

pub struct GraphConferenceStore {
    client: Arc<GraphqlClient>,
}

impl GraphConferenceStore {
    pub fn new(client: Arc<GraphqlClient>) -> Self {
        Self { client }
    }
}

#[derive(Deserialize)]
struct ConferenceByPk {
    #[serde(rename = "Conference_by_pk")]
    conference: Option<Conference>,
}

#[derive(Deserialize)]
struct InsertConference {
    #[serde(rename = "insert_Conference")]
    inserted: Returning,
}

#[derive(Deserialize)]
struct Returning {
    returning: Vec<Conference>,
}

#[derive(Deserialize)]
#[allow(dead_code)]
struct DeleteByPk {
    #[serde(rename = "delete_Conference_by_pk")]
    deleted: Option<IdOnly>,
}

#[derive(Deserialize)]
#[allow(dead_code)]
struct IdOnly {
    id: String,
}

#[async_trait]
impl ConferenceStore for GraphConferenceStore {
    async fn get_conference(&self, id: &str) -> Result<Option<Conference>> {
        let query = format!(
            "query GetConferenceById($id: String!) {{\n\
               Conference_by_pk(id: $id) {{ {CONFERENCE_FIELDS} }}\n\
             }}"
        );
        let data: ConferenceByPk =
            self.client.execute("GetConferenceById", &query, json!({ "id": id })).await?;
        Ok(data.conference)
    }

    async fn upsert_conference(&self, conference: Conference) -> Result<Conference> {
        let query = format!(
            "mutation UpsertConference($conferences: [Conference_insert_input!]!) {{\n\
               insert_Conference(objects: $conferences, on_conflict: {{\n\
                 constraint: Conference_pkey,\n\
                 update_columns: [app, requestId, name, notes, entryPoints, joinUrl, startUrl, \
             status, isPrivate, deleted, updatedAt]\n\
               }}) {{ returning {{ {CONFERENCE_FIELDS} }} }}\n\
             }}"
        );
        let data: InsertConference = self
            .client
            .execute("UpsertConference", &query, json!({ "conferences": [conference] }))
            .await?;
        data.inserted
            .returning
            .into_iter()
            .next()
            .ok_or_else(|| ConcordError::Backend("conference upsert returned no rows".into()))
    }

    async fn delete_conference(&self, id: &str) -> Result<()> {
        let query = "mutation DeleteConference($id: String!) {\n\
                       delete_Conference_by_pk(id: $id) { id }\n\
                     }";
        let _data: DeleteByPk =
            self.client.execute("DeleteConference", query, json!({ "id": id })).await?;
        Ok(())
    }
}
