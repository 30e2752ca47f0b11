//! A multi-tier cascade executor.
//!
//! A single invocation escalates through up to four tiers (code,
//! generative, agentic, human), each with its own timeout and retry
//! budget, until one of them produces a result. Tiers can also be raced in
//! parallel instead of walked in sequence.
//!
//! Construct a [`CascadeDefinition`] once with [`CascadeDefinition::builder`],
//! then call [`CascadeDefinition::execute`] as many times as needed; a
//! definition is immutable and safe to share across concurrent invocations.

mod abort;
mod context;
mod definition;
mod dispatch;
mod error;
mod events;
mod executor;
mod handler;
mod history;
mod metrics;
mod registry;
mod result;
mod retry;
mod skip;
mod timeout;

pub use abort::AbortSignal;
pub use context::TierContext;
pub use definition::{CascadeDefinition, CascadeDefinitionBuilder};
pub use error::CascadeError;
pub use events::CascadeEvent;
pub use executor::ExecuteOptions;
pub use handler::{FnTierHandler, HandlerError, TierHandler};
pub use history::{AttemptStatus, TierAttempt};
pub use metrics::CascadeMetrics;
pub use result::CascadeResult;
pub use skip::SkipCondition;

pub use cascade_core::Tier;
