//! # Concord API
//!
//! The command layer: an [`AppContext`] wiring the infra adapters into the
//! core services, and one typed async function per operation. A UI (web or
//! mobile) attaches at these functions; nothing below this crate knows it
//! exists.

pub mod commands;
pub mod context;

pub use context::{init_telemetry, AppContext, Ports};
