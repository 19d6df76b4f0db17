//! Event commands

use std::time::Instant;

use concord_core::backend_ports::{AttendeeStore, EventStore, ReminderStore};
use concord_core::{DeletionReport, EventUpsertOutcome, EventWriteRequest, UpdateEventRequest};
use concord_domain::{Attendee, ConcordError, Event, Reminder, Result};
use tracing::info;

use crate::AppContext;

/// An event record together with its side records, for the edit screen.
#[derive(Debug, Clone)]
pub struct EventDetails {
    pub event: Event,
    pub attendees: Vec<Attendee>,
    pub reminders: Vec<Reminder>,
}

/// Create an event end to end: calendar resolution, optional conference,
/// provider write, backend record, side-record fan-out.
pub async fn create_event(
    ctx: &AppContext,
    request: EventWriteRequest,
) -> Result<EventUpsertOutcome> {
    let command_name = "events::create_event";
    let start = Instant::now();

    let result = ctx.orchestrator().create_event(request).await;

    log_command(command_name, start, result.is_ok());
    result
}

/// Update an existing event; untouched fields keep their stored values,
/// reminders are replaced wholesale when supplied.
pub async fn update_event(
    ctx: &AppContext,
    request: UpdateEventRequest,
) -> Result<EventUpsertOutcome> {
    let command_name = "events::update_event";
    let start = Instant::now();

    let result = ctx.orchestrator().update_event(request).await;

    log_command(command_name, start, result.is_ok());
    result
}

/// Load an event with its attendees and reminders.
pub async fn get_event_details(ctx: &AppContext, event_id: &str) -> Result<EventDetails> {
    let command_name = "events::get_event_details";
    let start = Instant::now();

    let result = get_event_details_inner(ctx, event_id).await;

    log_command(command_name, start, result.is_ok());
    result
}

async fn get_event_details_inner(ctx: &AppContext, event_id: &str) -> Result<EventDetails> {
    let event = ctx
        .events
        .get_event(event_id)
        .await?
        .ok_or_else(|| ConcordError::NotFound(format!("event {event_id} not found")))?;
    let attendees = ctx.attendees.list_attendees_for_event(event_id).await?;
    let reminders = ctx.reminders.list_reminders_for_event(event_id).await?;
    Ok(EventDetails { event, attendees, reminders })
}

/// Delete an event and everything hanging off it.
pub async fn delete_event(ctx: &AppContext, event_id: &str) -> Result<DeletionReport> {
    let command_name = "events::delete_event";
    let start = Instant::now();

    let result = ctx.orchestrator().delete_event(event_id).await;

    log_command(command_name, start, result.is_ok());
    result
}

pub(crate) fn log_command(command_name: &str, start: Instant, success: bool) {
    let elapsed_ms = start.elapsed().as_millis() as u64;
    info!(command = command_name, elapsed_ms, success, "command executed");
}
