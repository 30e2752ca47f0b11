//! Core infrastructure for the cascade executor.
//!
//! This crate provides the pieces shared by every part of a cascade
//! invocation:
//! - The four-tier identity and its canonical order
//! - Human-readable duration parsing (`"5s"`, `"30s"`, `"5m"`, `"24h"`, ...)
//! - An event system for observability, used the same way across the
//!   executor crate

pub mod duration;
pub mod events;
pub mod tier;

pub use duration::{parse_duration, DurationParseError, DurationSpec};
pub use events::{EventListener, EventListeners, FnListener, ResilienceEvent};
pub use tier::Tier;
