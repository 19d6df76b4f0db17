//! Reminder store over the GraphQL backend

use std::sync::Arc;

use async_trait::async_trait;
use concord_core::backend_ports::ReminderStore;
use concord_domain::{ConcordError, Reminder, Result};
use serde::Deserialize;
use serde_json::json;

use super::client::GraphqlClient;

const REMINDER_FIELDS: &str = "id userId eventId minutes useDefault createdDate updatedAt";

pub struct GraphReminderStore {
    client: Arc<GraphqlClient>,
}

impl GraphReminderStore {
    pub fn new(client: Arc<GraphqlClient>) -> Self {
        Self { client }
    }
}

#[derive(Deserialize)]
struct ReminderList {
    #[serde(rename = "Reminder")]
    reminders: Vec<Reminder>,
}

#[derive(Deserialize)]
struct InsertReminder {
    #[serde(rename = "insert_Reminder")]
    inserted: Returning,
}

#[derive(Deserialize)]
struct Returning {
    returning: Vec<Reminder>,
}

#[derive(Deserialize)]
#[allow(dead_code)]
struct DeleteReminders {
    #[serde(rename = "delete_Reminder")]
    deleted: AffectedRows,
}

#[derive(Deserialize)]
#[allow(dead_code)]
struct AffectedRows {
    affected_rows: usize,
}

#[async_trait]
impl ReminderStore for GraphReminderStore {
    async fn list_reminders_for_event(&self, event_id: &str) -> Result<Vec<Reminder>> {
        let query = format!(
            "query ListRemindersForEvent($eventId: String!) {{\n\
               Reminder(where: {{eventId: {{_eq: $eventId}}}}) {{ {REMINDER_FIELDS} }}\n\
             }}"
        );
        let data: ReminderList = self
            .client
            .execute("ListRemindersForEvent", &query, json!({ "eventId": event_id }))
            .await?;
        Ok(data.reminders)
    }

    async fn insert_reminder(&self, reminder: Reminder) -> Result<Reminder> {
        let query = format!(
            "mutation InsertReminder($reminders: [Reminder_insert_input!]!) {{\n\
               insert_Reminder(objects: $reminders) {{ returning {{ {REMINDER_FIELDS} }} }}\n\
             }}"
        );
        let data: InsertReminder = self
            .client
            .execute("InsertReminder", &query, json!({ "reminders": [reminder] }))
            .await?;
        data.inserted
            .returning
            .into_iter()
            .next()
            .ok_or_else(|| ConcordError::Backend("reminder insert returned no rows".into()))
    }

    async fn delete_reminders_for_event(&self, event_id: &str) -> Result<()> {
        let query = "mutation DeleteRemindersForEvent($eventId: String!) {\n\
                       delete_Reminder(where: {eventId: {_eq: $eventId}}) { affected_rows }\n\
                     }";
        let _data: DeleteReminders = self
            .client
            .execute("DeleteRemindersForEvent", query, json!({ "eventId": event_id }))
            .await?;
        Ok(())
    }
}
