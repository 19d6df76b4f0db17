//! Category-event association store over the GraphQL backend

use std::sync::Arc;

use async_trait::async_trait;
use concord_core::backend_ports::CategoryStore;
use concord_domain::{CategoryLink, ConcordError, Result};
use serde::Deserialize;
use serde_json::json;

use super::client::GraphqlClient;

const LINK_FIELDS: &str = "id userId categoryId eventId createdDate updatedAt";

pub struct GraphCategoryStore {
    client: Arc<GraphqlClient>,
}

impl GraphCategoryStore {
    pub fn new(client: Arc<GraphqlClient>) -> Self {
        Self { client }
    }
}

#[derive(Deserialize)]
struct InsertLink {
    #[serde(rename = "insert_Category_Event")]
    inserted: Returning,
}

#[derive(Deserialize)]
struct Returning {
    returning: Vec<CategoryLink>,
}

#[derive(Deserialize)]
#[allow(dead_code)]
struct DeleteLinks {
    #[serde(rename = "delete_Category_Event")]
    deleted: AffectedRows,
}

#[derive(Deserialize)]
#[allow(dead_code)]
struct AffectedRows {
    affected_rows: usize,
}

#[async_trait]
impl CategoryStore for GraphCategoryStore {
    async fn connect_category(&self, link: CategoryLink) -> Result<CategoryLink> {
        let query = format!(
            "mutation ConnectCategoryToEvent($links: [Category_Event_insert_input!]!) {{\n\
               insert_Category_Event(objects: $links, on_conflict: {{\n\
                 constraint: Category_Event_pkey,\n\
                 update_columns: [updatedAt]\n\
               }}) {{ returning {{ {LINK_FIELDS} }} }}\n\
             }}"
        );
        let data: InsertLink =
            self.client.execute("ConnectCategoryToEvent", &query, json!({ "links": [link] })).await?;
        data.inserted
            .returning
            .into_iter()
            .next()
            .ok_or_else(|| ConcordError::Backend("category link insert returned no rows".into()))
    }

    async fn delete_links_for_event(&self, event_id: &str) -> Result<()> {
        let query = "mutation DeleteCategoryLinksForEvent($eventId: String!) {\n\
                       delete_Category_Event(where: {eventId: {_eq: $eventId}}) { affected_rows }\n\
                     }";
        let _data: DeleteLinks = self
            .client
            .execute("DeleteCategoryLinksForEvent", query, json!({ "eventId": event_id }))
            .await?;
        Ok(())
    }
}
