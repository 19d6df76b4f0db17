//! Attendee store over the GraphQL backend

use std::sync::Arc;

use async_trait::async_trait;
use concord_core::backend_ports::AttendeeStore;
use concord_domain::{Attendee, ConcordError, Result};
use serde::Deserialize;
use serde_json::json;

use super::client::GraphqlClient;

const ATTENDEE_FIELDS: &str = "id userId eventId name emails contactId optional responseStatus \
                               createdDate updatedAt";

pub struct GraphAttendeeStore {
    client: Arc<GraphqlClient>,
}

impl GraphAttendeeStore {
    pub fn new(client: Arc<GraphqlClient>) -> Self {
        Self { client }
    }
}

#[derive(Deserialize)]
struct AttendeeList {
    #[serde(rename = "Attendee")]
    attendees: Vec<Attendee>,
}

#[derive(Deserialize)]
struct InsertAttendee {
    #[serde(rename = "insert_Attendee")]
    inserted: Returning,
}

#[derive(Deserialize)]
struct Returning {
    returning: Vec<Attendee>,
}

#[derive(Deserialize)]
#[allow(dead_code)]
struct DeleteAttendees {
    #[serde(rename = "delete_Attendee")]
    deleted: AffectedRows,
}

#[derive(Deserialize)]
#[allow(dead_code)]
struct AffectedRows {
    affected_rows: usize,
}

#[async_trait]
impl AttendeeStore for GraphAttendeeStore {
    async fn list_attendees_for_event(&self, event_id: &str) -> Result<Vec<Attendee>> {
        let query = format!(
            "query ListAttendeesByEventId($eventId: String!) {{\n\
               Attendee(where: {{eventId: {{_eq: $eventId}}}}) {{ {ATTENDEE_FIELDS} }}\n\
             }}"
        );
        let data: AttendeeList = self
            .client
            .execute("ListAttendeesByEventId", &query, json!({ "eventId": event_id }))
            .await?;
        Ok(data.attendees)
    }

    async fn upsert_attendee(&self, attendee: Attendee) -> Result<Attendee> {
        let query = format!(
            "mutation UpsertAttendee($attendees: [Attendee_insert_input!]!) {{\n\
               insert_Attendee(objects: $attendees, on_conflict: {{\n\
                 constraint: Attendee_pkey,\n\
                 update_columns: [name, emails, contactId, optional, responseStatus, updatedAt]\n\
               }}) {{ returning {{ {ATTENDEE_FIELDS} }} }}\n\
             }}"
        );
        let data: InsertAttendee = self
            .client
            .execute("UpsertAttendee", &query, json!({ "attendees": [attendee] }))
            .await?;
        data.inserted
            .returning
            .into_iter()
            .next()
            .ok_or_else(|| ConcordError::Backend("attendee upsert returned no rows".into()))
    }

    async fn delete_attendees_for_event(&self, event_id: &str) -> Result<()> {
        let query = "mutation DeleteAttendeesByEventId($eventId: String!) {\n\
                       delete_Attendee(where: {eventId: {_eq: $eventId}}) { affected_rows }\n\
                     }";
        let _data: DeleteAttendees = self
            .client
            .execute("DeleteAttendeesByEventId", query, json!({ "eventId": event_id }))
            .await?;
        Ok(())
    }
}
