//! Meeting-assist preference reconciliation
//!
//! Collects attendee busy intervals across timezones, generates candidate
//! slots from the host's working hours, and tracks each attendee's
//! preferred-time picks until submission.

pub mod service;
pub mod session;
pub mod slots;

pub use service::{AssistService, ReconciliationContext, SubmissionOutcome};
pub use session::{PreferenceSession, SlotToggle, SubmissionPayload};
pub use slots::{generate_available_slots_for_date, generate_available_slots_for_window, SlotWindow};
