//! Meeting-assist store over the GraphQL backend

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use concord_core::backend_ports::AssistStore;
use concord_domain::{
    MeetingAssist, MeetingAssistAttendee, MeetingAssistEvent, PreferredTimeRange, Result,
};
use serde::Deserialize;
use serde_json::json;

use super::client::GraphqlClient;

const MEETING_FIELDS: &str = "id userId summary notes windowStartDate windowEndDate timezone \
                              duration minThresholdCount attendeeRespondedCount attendeeCount \
                              cancelled expireDate enableAttendeePreferences \
                              guaranteeAvailability attendeeCanModify eventId originalMeetingId \
                              createdDate updatedAt";

const ATTENDEE_FIELDS: &str = "id meetingId hostId userId name emails timezone externalAttendee \
                               createdDate updatedAt";

const ASSIST_EVENT_FIELDS: &str = "id attendeeId startDate endDate timezone summary transparency";

const PREFERRED_FIELDS: &str =
    "id meetingId attendeeId hostId dayOfWeek startTime endTime createdDate updatedAt";

pub struct GraphAssistStore {
    client: Arc<GraphqlClient>,
}

impl GraphAssistStore {
    pub fn new(client: Arc<GraphqlClient>) -> Self {
        Self { client }
    }
}

#[derive(Deserialize)]
struct MeetingByPk {
    #[serde(rename = "Meeting_Assist_by_pk")]
    meeting: Option<MeetingAssist>,
}

#[derive(Deserialize)]
#[allow(dead_code)]
struct DeleteMeeting {
    #[serde(rename = "delete_Meeting_Assist_by_pk")]
    deleted: Option<IdOnly>,
}

#[derive(Deserialize)]
#[allow(dead_code)]
struct IdOnly {
    id: String,
}

#[derive(Deserialize)]
struct AttendeeList {
    #[serde(rename = "Meeting_Assist_Attendee")]
    attendees: Vec<MeetingAssistAttendee>,
}

#[derive(Deserialize)]
struct AssistEventList {
    #[serde(rename = "Meeting_Assist_Event")]
    events: Vec<MeetingAssistEvent>,
}

#[derive(Deserialize)]
struct PreferredList {
    #[serde(rename = "Meeting_Assist_Preferred_Time_Range")]
    ranges: Vec<PreferredTimeRange>,
}

#[derive(Deserialize)]
struct UpsertPreferred {
    #[serde(rename = "insert_Meeting_Assist_Preferred_Time_Range")]
    inserted: AffectedRows,
}

#[derive(Deserialize)]
struct DeletePreferred {
    #[serde(rename = "delete_Meeting_Assist_Preferred_Time_Range")]
    deleted: AffectedRows,
}

#[derive(Deserialize)]
struct AffectedRows {
    affected_rows: usize,
}

#[async_trait]
impl AssistStore for GraphAssistStore {
    async fn get_meeting_assist(&self, meeting_id: &str) -> Result<Option<MeetingAssist>> {
        let query = format!(
            "query GetMeetingAssistById($id: uuid!) {{\n\
               Meeting_Assist_by_pk(id: $id) {{ {MEETING_FIELDS} }}\n\
             }}"
        );
        let data: MeetingByPk = self
            .client
            .execute("GetMeetingAssistById", &query, json!({ "id": meeting_id }))
            .await?;
        Ok(data.meeting)
    }

    async fn delete_meeting_assist(&self, meeting_id: &str) -> Result<()> {
        let query = "mutation DeleteMeetingAssistById($id: uuid!) {\n\
                       delete_Meeting_Assist_by_pk(id: $id) { id }\n\
                     }";
        let _data: DeleteMeeting = self
            .client
            .execute("DeleteMeetingAssistById", query, json!({ "id": meeting_id }))
            .await?;
        Ok(())
    }

    async fn list_attendees(&self, meeting_id: &str) -> Result<Vec<MeetingAssistAttendee>> {
        let query = format!(
            "query ListMeetingAssistAttendeesByMeetingId($meetingId: uuid!) {{\n\
               Meeting_Assist_Attendee(where: {{meetingId: {{_eq: $meetingId}}}}) \
             {{ {ATTENDEE_FIELDS} }}\n\
             }}"
        );
        let data: AttendeeList = self
            .client
            .execute(
                "ListMeetingAssistAttendeesByMeetingId",
                &query,
                json!({ "meetingId": meeting_id }),
            )
            .await?;
        Ok(data.attendees)
    }

    async fn list_events_for_attendee(
        &self,
        attendee_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<MeetingAssistEvent>> {
        let query = format!(
            "query ListMeetingAssistEventsForAttendee($attendeeId: uuid!, $start: timestamptz!, \
             $end: timestamptz!) {{\n\
               Meeting_Assist_Event(where: {{attendeeId: {{_eq: $attendeeId}}, \
             startDate: {{_lt: $end}}, endDate: {{_gt: $start}}}}) {{ {ASSIST_EVENT_FIELDS} }}\n\
             }}"
        );
        let data: AssistEventList = self
            .client
            .execute(
                "ListMeetingAssistEventsForAttendee",
                &query,
                json!({ "attendeeId": attendee_id, "start": start, "end": end }),
            )
            .await?;
        Ok(data.events)
    }

    async fn list_preferred_times(&self, meeting_id: &str) -> Result<Vec<PreferredTimeRange>> {
        let query = format!(
            "query ListMeetingAssistPreferredTimeRangesByMeetingId($meetingId: uuid!) {{\n\
               Meeting_Assist_Preferred_Time_Range(where: {{meetingId: {{_eq: $meetingId}}}}) \
             {{ {PREFERRED_FIELDS} }}\n\
             }}"
        );
        let data: PreferredList = self
            .client
            .execute(
                "ListMeetingAssistPreferredTimeRangesByMeetingId",
                &query,
                json!({ "meetingId": meeting_id }),
            )
            .await?;
        Ok(data.ranges)
    }

    async fn upsert_preferred_times(&self, ranges: Vec<PreferredTimeRange>) -> Result<usize> {
        let query =
            "mutation UpsertMeetingAssistPreferredTimes($ranges: [Meeting_Assist_Preferred_Time_Range_insert_input!]!) {\n\
               insert_Meeting_Assist_Preferred_Time_Range(objects: $ranges, on_conflict: {\n\
                 constraint: Meeting_Assist_Preferred_Time_Range_pkey,\n\
                 update_columns: [dayOfWeek, startTime, endTime, updatedAt]\n\
               }) { affected_rows }\n\
             }";
        let data: UpsertPreferred = self
            .client
            .execute("UpsertMeetingAssistPreferredTimes", query, json!({ "ranges": ranges }))
            .await?;
        Ok(data.inserted.affected_rows)
    }

    async fn delete_preferred_times_by_ids(&self, ids: Vec<String>) -> Result<usize> {
        let query = "mutation DeleteMeetingAssistPreferredTimesByIds($ids: [uuid!]!) {\n\
                       delete_Meeting_Assist_Preferred_Time_Range(where: {id: {_in: $ids}}) \
                     { affected_rows }\n\
                     }";
        let data: DeletePreferred = self
            .client
            .execute("DeleteMeetingAssistPreferredTimesByIds", query, json!({ "ids": ids }))
            .await?;
        Ok(data.deleted.affected_rows)
    }
}
