//! Event store over the GraphQL backend
//!
//! The upsert encodes the field-level merge: only the columns the caller
//! actually supplied land in `update_columns`, so an existing row keeps
//! everything else untouched.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use concord_core::backend_ports::{EventStore, EventUpsert};
use concord_domain::{ConcordError, Event, EventPatch, Result};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::client::GraphqlClient;

const EVENT_FIELDS: &str = "id userId calendarId startDate endDate timezone title notes location \
                            allDay recurrence conferenceId transparency visibility status \
                            htmlLink colorId maxAttendees useDefaultAlarms deleted priority \
                            softDeadline hardDeadline durationMinutes modifiable isMeeting \
                            isBreak timeBlocking meetingId createdDate updatedAt";

pub struct GraphEventStore {
    client: Arc<GraphqlClient>,
}

impl GraphEventStore {
    pub fn new(client: Arc<GraphqlClient>) -> Self {
        Self { client }
    }
}

#[derive(Deserialize)]
struct EventByPk {
    #[serde(rename = "Event_by_pk")]
    event: Option<Event>,
}

#[derive(Deserialize)]
struct EventList {
    #[serde(rename = "Event")]
    events: Vec<Event>,
}

#[derive(Deserialize)]
struct InsertEvent {
    #[serde(rename = "insert_Event")]
    inserted: Returning<Event>,
}

#[derive(Deserialize)]
struct Returning<T> {
    returning: Vec<T>,
}

#[derive(Deserialize)]
#[allow(dead_code)]
struct DeleteByPk {
    #[serde(rename = "delete_Event_by_pk")]
    deleted: Option<IdOnly>,
}

#[derive(Deserialize)]
#[allow(dead_code)]
struct IdOnly {
    id: String,
}

/// The columns this upsert is allowed to overwrite on conflict: the
/// required window fields plus whatever the patch actually carries.
fn update_columns(patch: &EventPatch) -> Vec<&'static str> {
    let mut columns = vec!["startDate", "endDate", "timezone", "updatedAt"];

    macro_rules! column_if_set {
        ($($field:ident => $column:literal),* $(,)?) => {
            $(if patch.$field.is_some() {
                columns.push($column);
            })*
        };
    }

    column_if_set!(
        title => "title",
        notes => "notes",
        location => "location",
        all_day => "allDay",
        recurrence => "recurrence",
        conference_id => "conferenceId",
        transparency => "transparency",
        visibility => "visibility",
        status => "status",
        html_link => "htmlLink",
        color_id => "colorId",
        max_attendees => "maxAttendees",
        use_default_alarms => "useDefaultAlarms",
        deleted => "deleted",
        priority => "priority",
        soft_deadline => "softDeadline",
        hard_deadline => "hardDeadline",
        duration_minutes => "durationMinutes",
        modifiable => "modifiable",
        is_meeting => "isMeeting",
        is_break => "isBreak",
        time_blocking => "timeBlocking",
        meeting_id => "meetingId",
    );

    columns
}

/// The insert object: required fields plus the patch's supplied fields.
fn insert_object(upsert: &EventUpsert, now: DateTime<Utc>) -> Result<Value> {
    let mut object = match serde_json::to_value(&upsert.patch)
        .map_err(|e| ConcordError::Internal(format!("event patch serialization failed: {e}")))?
    {
        Value::Object(map) => map,
        _ => Map::new(),
    };

    object.insert("id".into(), json!(upsert.id));
    object.insert("userId".into(), json!(upsert.user_id));
    object.insert("calendarId".into(), json!(upsert.calendar_id));
    object.insert("startDate".into(), json!(upsert.start_date));
    object.insert("endDate".into(), json!(upsert.end_date));
    object.insert("timezone".into(), json!(upsert.timezone));
    object.entry("deleted").or_insert(json!(false));
    object.insert("createdDate".into(), json!(now));
    object.insert("updatedAt".into(), json!(now));

    Ok(Value::Object(object))
}

#[async_trait]
impl EventStore for GraphEventStore {
    async fn get_event(&self, id: &str) -> Result<Option<Event>> {
        let query = format!(
            "query GetEventById($id: String!) {{\n\
               Event_by_pk(id: $id) {{ {EVENT_FIELDS} }}\n\
             }}"
        );
        let data: EventByPk =
            self.client.execute("GetEventById", &query, json!({ "id": id })).await?;
        Ok(data.event)
    }

    async fn upsert_event(&self, upsert: EventUpsert) -> Result<Event> {
        let columns = update_columns(&upsert.patch).join(", ");
        let query = format!(
            "mutation UpsertEvent($events: [Event_insert_input!]!) {{\n\
               insert_Event(objects: $events, on_conflict: {{\n\
                 constraint: Event_pkey,\n\
                 update_columns: [{columns}]\n\
               }}) {{ returning {{ {EVENT_FIELDS} }} }}\n\
             }}"
        );

        let object = insert_object(&upsert, Utc::now())?;
        let data: InsertEvent =
            self.client.execute("UpsertEvent", &query, json!({ "events": [object] })).await?;

        data.inserted
            .returning
            .into_iter()
            .next()
            .ok_or_else(|| ConcordError::Backend("event upsert returned no rows".into()))
    }

    async fn delete_event(&self, id: &str) -> Result<()> {
        let query = "mutation DeleteEvent($id: String!) {\n\
                       delete_Event_by_pk(id: $id) { id }\n\
                     }";
        let data: DeleteByPk =
            self.client.execute("DeleteEvent", query, json!({ "id": id })).await?;
        data.deleted
            .map(|_| ())
            .ok_or_else(|| ConcordError::NotFound(format!("event {id} not found")))
    }

    async fn list_events_in_range(
        &self,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Event>> {
        let query = format!(
            "query ListEventsInRange($userId: uuid!, $start: timestamptz!, $end: timestamptz!) {{\n\
               Event(where: {{userId: {{_eq: $userId}}, startDate: {{_lt: $end}}, \
             endDate: {{_gt: $start}}, deleted: {{_eq: false}}}}, order_by: {{startDate: asc}}) \
             {{ {EVENT_FIELDS} }}\n\
             }}"
        );
        let data: EventList = self
            .client
            .execute(
                "ListEventsInRange",
                &query,
                json!({ "userId": user_id, "start": start, "end": end }),
            )
            .await?;
        Ok(data.events)
    }
}
