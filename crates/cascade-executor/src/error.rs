//! The cascade error taxonomy.
//!
//! Generalizes the single-type-parameter resilience error pattern to carry
//! both a handler output type `O` (for history-bearing variants) and a
//! handler error type `E`.

use std::fmt;

use cascade_core::Tier;

use crate::history::TierAttempt;

#[derive(Debug, Clone)]
pub enum CascadeError<O, E> {
    /// The last eligible tier exhausted its retries and its final attempt
    /// timed out using that tier's *default* timeout (no override configured).
    TierTimeout { tier: Tier, timeout_ms: u64 },

    /// Every eligible tier was attempted and none completed.
    CascadeExhausted {
        cascade_id: String,
        total_duration_ms: u64,
        history: Vec<TierAttempt<O, E>>,
    },

    /// A skip condition fired on the last eligible tier, leaving nothing
    /// left to try.
    AllTiersSkipped { tier: Tier, reason: String },

    /// The caller's abort signal fired mid-cascade.
    Aborted { history: Vec<TierAttempt<O, E>> },

    /// `execute_tier` was asked to run a tier with no registered handler.
    TierNotDefined { tier: Tier },

    /// `execute_tier` was called without the context it requires.
    TierContextRequired,

    /// The cascade definition itself is malformed (e.g. an unparsable
    /// duration string).
    InvalidDefinition(String),

    /// A single tier driven directly through `execute_tier` raised an
    /// application error. Unlike `CascadeExhausted`, this carries no
    /// history: no retries or escalation happened to build one.
    HandlerFailed(E),
}

impl<O, E: fmt::Display> fmt::Display for CascadeError<O, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CascadeError::TierTimeout { tier, timeout_ms } => {
                write!(f, "tier {tier} timed out after {timeout_ms}ms")
            }
            CascadeError::CascadeExhausted {
                cascade_id,
                total_duration_ms,
                history,
            } => write!(
                f,
                "cascade {cascade_id} exhausted all eligible tiers after {total_duration_ms}ms ({} attempts)",
                history.len()
            ),
            CascadeError::AllTiersSkipped { tier, reason } => {
                write!(f, "all tiers skipped, last was {tier}: {reason}")
            }
            CascadeError::Aborted { history } => {
                write!(f, "cascade aborted after {} attempts", history.len())
            }
            CascadeError::TierNotDefined { tier } => write!(f, "tier {tier} has no registered handler"),
            CascadeError::TierContextRequired => write!(f, "executing a single tier requires an explicit context"),
            CascadeError::InvalidDefinition(reason) => write!(f, "invalid cascade definition: {reason}"),
            CascadeError::HandlerFailed(err) => write!(f, "tier handler failed: {err}"),
        }
    }
}

impl<O: fmt::Debug, E: fmt::Debug + fmt::Display> std::error::Error for CascadeError<O, E> {}

impl<O, E> From<cascade_core::DurationParseError> for CascadeError<O, E> {
    fn from(err: cascade_core::DurationParseError) -> Self {
        CascadeError::InvalidDefinition(err.to_string())
    }
}
