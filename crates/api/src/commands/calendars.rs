//! Calendar commands

use std::time::Instant;

use chrono::Utc;
use concord_core::backend_ports::CalendarStore;
use concord_domain::{Calendar, ConcordError, Result};

use super::events::log_command;
use crate::AppContext;

/// List a user's calendars.
pub async fn list_user_calendars(ctx: &AppContext, user_id: &str) -> Result<Vec<Calendar>> {
    let start = Instant::now();
    let result = ctx.calendars.list_calendars(user_id).await;
    log_command("calendars::list_user_calendars", start, result.is_ok());
    result
}

/// Flag one calendar as the default target for new events.
///
/// Any previously flagged calendar is unflagged first so at most one
/// global primary exists per user.
pub async fn set_global_primary_calendar(
    ctx: &AppContext,
    user_id: &str,
    calendar_id: &str,
) -> Result<Calendar> {
    let start = Instant::now();
    let result = set_global_primary_inner(ctx, user_id, calendar_id).await;
    log_command("calendars::set_global_primary_calendar", start, result.is_ok());
    result
}

async fn set_global_primary_inner(
    ctx: &AppContext,
    user_id: &str,
    calendar_id: &str,
) -> Result<Calendar> {
    let target = ctx
        .calendars
        .get_calendar(calendar_id)
        .await?
        .filter(|c| c.user_id == user_id)
        .ok_or_else(|| {
            ConcordError::NotFound(format!("calendar {calendar_id} not found for user {user_id}"))
        })?;

    for mut calendar in ctx.calendars.list_calendars(user_id).await? {
        if calendar.global_primary && calendar.id != calendar_id {
            calendar.global_primary = false;
            calendar.updated_at = Utc::now();
            ctx.calendars.upsert_calendar(calendar).await?;
        }
    }

    let mut target = target;
    target.global_primary = true;
    target.updated_at = Utc::now();
    ctx.calendars.upsert_calendar(target).await
}
