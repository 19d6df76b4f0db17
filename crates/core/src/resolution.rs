//! Calendar resolution
//!
//! Picks the concrete calendar an operation targets. Priority order,
//! short-circuiting on the first hit:
//!
//! 1. explicit id lookup,
//! 2. the global-primary calendar,
//! 3. a resource-filtered lookup (e.g. "the Google calendar"),
//! 4. any calendar the user has.

use std::sync::Arc;

use concord_domain::{Calendar, Result};
use tracing::{debug, warn};

use crate::backend_ports::CalendarStore;

/// Resolves a user + optional explicit calendar id to a calendar record.
pub struct CalendarResolver {
    store: Arc<dyn CalendarStore>,
}

impl CalendarResolver {
    pub fn new(store: Arc<dyn CalendarStore>) -> Self {
        Self { store }
    }

    /// The underlying store, for direct id lookups.
    pub fn store(&self) -> &Arc<dyn CalendarStore> {
        &self.store
    }

    /// Resolve a calendar, or `Ok(None)` when no tier matches.
    ///
    /// Callers that cannot proceed without a calendar turn the `None` into a
    /// `NotFound` error; the resolver itself only reports.
    pub async fn resolve(
        &self,
        user_id: &str,
        explicit_id: Option<&str>,
        want_global_primary: bool,
        resource_filter: Option<&str>,
    ) -> Result<Option<Calendar>> {
        if let Some(id) = explicit_id {
            if let Some(calendar) = self.store.get_calendar(id).await? {
                debug!(calendar_id = %calendar.id, "resolved calendar by explicit id");
                return Ok(Some(calendar));
            }
            debug!(id, "explicit calendar id did not resolve; falling through");
        }

        if want_global_primary {
            if let Some(calendar) = self.store.get_global_primary_calendar(user_id).await? {
                debug!(calendar_id = %calendar.id, "resolved global-primary calendar");
                return Ok(Some(calendar));
            }
        }

        if let Some(resource) = resource_filter {
            if let Some(calendar) =
                self.store.get_calendar_with_resource(user_id, resource).await?
            {
                debug!(calendar_id = %calendar.id, resource, "resolved calendar by resource");
                return Ok(Some(calendar));
            }
        }

        if let Some(calendar) = self.store.get_any_calendar(user_id).await? {
            debug!(calendar_id = %calendar.id, "resolved arbitrary calendar");
            return Ok(Some(calendar));
        }

        warn!(user_id, "no calendar resolved for user");
        Ok(None)
    }
}
