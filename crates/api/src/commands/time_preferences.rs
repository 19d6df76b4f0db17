//! Time-preference commands
//!
//! The operations behind the meeting-assist preference screen. Formerly a
//! single RPC endpoint multiplexed on a method string; here each method is
//! its own typed function.

use std::time::Instant;

use chrono::Utc;
use concord_core::assist::{ReconciliationContext, SubmissionOutcome};
use concord_core::backend_ports::AssistStore;
use concord_core::provider_ports::{AssistLauncher, StartAssistRequest};
use concord_domain::{
    AvailableSlotsByDate, ConcordError, MeetingAssist, MeetingAssistAttendee,
    PreferredTimeRange, Result,
};

use super::events::log_command;
use crate::AppContext;

/// Fetch one meeting-assist session.
pub async fn get_meeting_assist(ctx: &AppContext, meeting_id: &str) -> Result<MeetingAssist> {
    let start = Instant::now();
    let result = ctx.assists.get_meeting_assist(meeting_id).await.and_then(|found| {
        found.ok_or_else(|| {
            ConcordError::NotFound(format!("meeting assist {meeting_id} not found"))
        })
    });
    log_command("time_preferences::get_meeting_assist", start, result.is_ok());
    result
}

/// List the attendees of a meeting-assist session.
pub async fn list_meeting_assist_attendees(
    ctx: &AppContext,
    meeting_id: &str,
) -> Result<Vec<MeetingAssistAttendee>> {
    let start = Instant::now();
    let result = ctx.assists.list_attendees(meeting_id).await;
    log_command("time_preferences::list_meeting_assist_attendees", start, result.is_ok());
    result
}

/// Load the full reconciliation context for one attendee's view: busy
/// intervals, generated slots, and the editable preference session.
pub async fn load_time_preferences(
    ctx: &AppContext,
    meeting_id: &str,
    attendee_id: &str,
    viewer_timezone: &str,
) -> Result<ReconciliationContext> {
    let start = Instant::now();
    let result = ctx
        .assist()
        .load_context(meeting_id, attendee_id, viewer_timezone, Utc::now())
        .await;
    log_command("time_preferences::load_time_preferences", start, result.is_ok());
    result
}

/// Generate the candidate slots for a meeting window as one attendee sees
/// them.
pub async fn generate_available_slots_for_time_window(
    ctx: &AppContext,
    meeting_id: &str,
    attendee_id: &str,
    viewer_timezone: &str,
) -> Result<AvailableSlotsByDate> {
    let start = Instant::now();
    let result = ctx
        .assist()
        .load_context(meeting_id, attendee_id, viewer_timezone, Utc::now())
        .await
        .map(|context| context.slots_by_date);
    log_command(
        "time_preferences::generate_available_slots_for_time_window",
        start,
        result.is_ok(),
    );
    result
}

/// Submit a finished preference round: deletions, timezone-converted
/// upserts, and the scheduling kickoff once enough attendees responded.
pub async fn submit_time_preferences(
    ctx: &AppContext,
    context: &ReconciliationContext,
) -> Result<SubmissionOutcome> {
    let start = Instant::now();
    let result = ctx.assist().submit(&context.session, Utc::now()).await;
    log_command("time_preferences::submit_time_preferences", start, result.is_ok());
    result
}

/// Upsert preferred time ranges directly (already in the host timezone).
pub async fn upsert_meeting_assist_preferred_times(
    ctx: &AppContext,
    ranges: Vec<PreferredTimeRange>,
) -> Result<usize> {
    let start = Instant::now();
    let result = ctx.assists.upsert_preferred_times(ranges).await;
    log_command(
        "time_preferences::upsert_meeting_assist_preferred_times",
        start,
        result.is_ok(),
    );
    result
}

/// Delete preferred time ranges by id.
pub async fn delete_meeting_assist_preferred_times(
    ctx: &AppContext,
    ids: Vec<String>,
) -> Result<usize> {
    let start = Instant::now();
    let result = ctx.assists.delete_preferred_times_by_ids(ids).await;
    log_command(
        "time_preferences::delete_meeting_assist_preferred_times",
        start,
        result.is_ok(),
    );
    result
}

/// Kick off final scheduling for a meeting-assist session.
pub async fn start_meeting_assist(ctx: &AppContext, meeting_id: &str) -> Result<()> {
    let start = Instant::now();
    let result = start_meeting_assist_inner(ctx, meeting_id).await;
    log_command("time_preferences::start_meeting_assist", start, result.is_ok());
    result
}

async fn start_meeting_assist_inner(ctx: &AppContext, meeting_id: &str) -> Result<()> {
    let meeting = get_meeting_assist(ctx, meeting_id).await?;
    ctx.launcher()
        .start_meeting_assist(&StartAssistRequest {
            user_id: meeting.user_id,
            window_start_date: meeting.window_start_date,
            window_end_date: meeting.window_end_date,
            timezone: meeting.timezone,
        })
        .await
}
