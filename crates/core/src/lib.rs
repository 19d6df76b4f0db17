//! # Concord Core
//!
//! Scheduling logic and port interfaces.
//!
//! The pure pieces live here: recurrence-rule construction, wall-clock
//! timezone normalization, available-slot generation, and the meeting-assist
//! preference session. The orchestration services (calendar resolution,
//! conference provisioning, event upsert) also live here, talking to the
//! backend and the calendar/conference providers exclusively through the
//! port traits in [`backend_ports`] and [`provider_ports`]; infra supplies
//! the implementations.

pub mod assist;
pub mod backend_ports;
pub mod conference;
pub mod orchestrator;
pub mod provider_ports;
pub mod recurrence;
pub mod resolution;
pub mod timezone;

pub use conference::{ConferenceOutcome, ConferenceRequest, ConferenceService};
pub use orchestrator::{
    AttendeeDraft, BackendStores, DeletionReport, EventOrchestrator, EventUpsertOutcome,
    EventWriteRequest, StepFailure, UpdateEventRequest, UpsertReport,
};
pub use resolution::CalendarResolver;
