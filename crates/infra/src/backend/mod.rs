//! GraphQL backend client and per-entity stores
//!
//! The backend is one GraphQL endpoint; every store here is a typed façade
//! over it implementing a port trait from `concord-core`. One Rust method
//! per operation; no stringly-typed dispatch.

pub mod assist_store;
pub mod attendee_store;
pub mod calendar_store;
pub mod category_store;
pub mod client;
pub mod conference_store;
pub mod event_store;
pub mod integration_store;
pub mod preferences_store;
pub mod reminder_store;

pub use assist_store::GraphAssistStore;
pub use attendee_store::GraphAttendeeStore;
pub use calendar_store::GraphCalendarStore;
pub use category_store::GraphCategoryStore;
pub use client::GraphqlClient;
pub use conference_store::GraphConferenceStore;
pub use event_store::GraphEventStore;
pub use integration_store::GraphIntegrationStore;
pub use preferences_store::GraphPreferencesStore;
pub use reminder_store::GraphReminderStore;
