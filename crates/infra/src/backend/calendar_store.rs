//! Calendar store over the GraphQL backend

use std::sync::Arc;

use async_trait::async_trait;
use concord_core::backend_ports::CalendarStore;
use concord_domain::{Calendar, Result};
use serde::Deserialize;
use serde_json::json;

use super::client::GraphqlClient;

const CALENDAR_FIELDS: &str = "id userId title backgroundColor foregroundColor colorId account \
                               accessLevel resource modifiable globalPrimary deleted createdDate \
                               updatedAt";

pub struct GraphCalendarStore {
    client: Arc<GraphqlClient>,
}

impl GraphCalendarStore {
    pub fn new(client: Arc<GraphqlClient>) -> Self {
        Self { client }
    }
}

#[derive(Deserialize)]
struct CalendarByPk {
    #[serde(rename = "Calendar_by_pk")]
    calendar: Option<Calendar>,
}

#[derive(Deserialize)]
struct CalendarList {
    #[serde(rename = "Calendar")]
    calendars: Vec<Calendar>,
}

#[derive(Deserialize)]
struct InsertCalendar {
    #[serde(rename = "insert_Calendar")]
    inserted: Returning<Calendar>,
}

#[derive(Deserialize)]
struct Returning<T> {
    returning: Vec<T>,
}

#[async_trait]
impl CalendarStore for GraphCalendarStore {
    async fn get_calendar(&self, id: &str) -> Result<Option<Calendar>> {
        let query = format!(
            "query GetCalendarById($id: String!) {{\n\
               Calendar_by_pk(id: $id) {{ {CALENDAR_FIELDS} }}\n\
             }}"
        );
        let data: CalendarByPk = self
            .client
            .execute("GetCalendarById", &query, json!({ "id": id }))
            .await?;
        Ok(data.calendar)
    }

    async fn get_global_primary_calendar(&self, user_id: &str) -> Result<Option<Calendar>> {
        let query = format!(
            "query GetGlobalPrimaryCalendar($userId: uuid!) {{\n\
               Calendar(where: {{userId: {{_eq: $userId}}, globalPrimary: {{_eq: true}}, \
             deleted: {{_eq: false}}}}, limit: 1) {{ {CALENDAR_FIELDS} }}\n\
             }}"
        );
        let data: CalendarList = self
            .client
            .execute("GetGlobalPrimaryCalendar", &query, json!({ "userId": user_id }))
            .await?;
        Ok(data.calendars.into_iter().next())
    }

    async fn get_calendar_with_resource(
        &self,
        user_id: &str,
        resource: &str,
    ) -> Result<Option<Calendar>> {
        let query = format!(
            "query GetCalendarWithResource($userId: uuid!, $resource: String!) {{\n\
               Calendar(where: {{userId: {{_eq: $userId}}, resource: {{_eq: $resource}}, \
             deleted: {{_eq: false}}}}, limit: 1) {{ {CALENDAR_FIELDS} }}\n\
             }}"
        );
        let data: CalendarList = self
            .client
            .execute(
                "GetCalendarWithResource",
                &query,
                json!({ "userId": user_id, "resource": resource }),
            )
            .await?;
        Ok(data.calendars.into_iter().next())
    }

    async fn get_any_calendar(&self, user_id: &str) -> Result<Option<Calendar>> {
        let query = format!(
            "query GetAnyCalendar($userId: uuid!) {{\n\
               Calendar(where: {{userId: {{_eq: $userId}}, deleted: {{_eq: false}}}}, limit: 1) \
             {{ {CALENDAR_FIELDS} }}\n\
             }}"
        );
        let data: CalendarList = self
            .client
            .execute("GetAnyCalendar", &query, json!({ "userId": user_id }))
            .await?;
        Ok(data.calendars.into_iter().next())
    }

    async fn list_calendars(&self, user_id: &str) -> Result<Vec<Calendar>> {
        let query = format!(
            "query ListCalendars($userId: uuid!) {{\n\
               Calendar(where: {{userId: {{_eq: $userId}}, deleted: {{_eq: false}}}}) \
             {{ {CALENDAR_FIELDS} }}\n\
             }}"
        );
        let data: CalendarList = self
            .client
            .execute("ListCalendars", &query, json!({ "userId": user_id }))
            .await?;
        Ok(data.calendars)
    }

    async fn upsert_calendar(&self, calendar: Calendar) -> Result<Calendar> {
        let query = format!(
            "mutation InsertCalendar($calendars: [Calendar_insert_input!]!) {{\n\
               insert_Calendar(objects: $calendars, on_conflict: {{\n\
                 constraint: Calendar_pkey,\n\
                 update_columns: [title, backgroundColor, foregroundColor, colorId, account, \
             accessLevel, resource, modifiable, globalPrimary, deleted, updatedAt]\n\
               }}) {{ returning {{ {CALENDAR_FIELDS} }} }}\n\
             }}"
        );
        let data: InsertCalendar = self
            .client
            .execute("InsertCalendar", &query, json!({ "calendars": [calendar] }))
            .await?;
        data.inserted
            .returning
            .into_iter()
            .next()
            .ok_or_else(|| concord_domain::ConcordError::Backend(
                "calendar upsert returned no rows".into(),
            ))
    }
}
