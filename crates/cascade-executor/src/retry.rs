//! Per-tier retry loop.
//!
//! Repeats attempts at a single tier up to its configured retry budget.
//! `previous_tier`/`previous_error`/`previous_result` are *not* updated
//! across these internal retries; they describe the last failure at a
//! *prior* tier, and only the dispatcher rewrites them once a tier
//! terminally fails and escalation moves to the next one.

use std::sync::Arc;
use std::time::Instant;

use cascade_core::Tier;

use crate::abort::AbortSignal;
use crate::context::Prev;
use crate::definition::CascadeDefinition;
use crate::events::CascadeEvent;
use crate::handler::TierHandler;
use crate::history::{AttemptStatus, TierAttempt};
use crate::timeout::{run_attempt, HarnessOutcome};

pub(crate) enum TierTerminal<O, E> {
    Completed(O),
    Exhausted {
        last_error: Option<E>,
        last_was_timeout: bool,
        last_partial: Option<O>,
    },
    Aborted,
}

#[allow(clippy::too_many_arguments)]
pub(crate) async fn run_tier<I, O, E>(
    def: &CascadeDefinition<I, O, E>,
    tier: Tier,
    handler: &Arc<dyn TierHandler<I, O, E>>,
    input: &I,
    cascade_attempt: usize,
    deadline: Option<Instant>,
    prev: &Prev<O, E>,
    history: &mut Vec<TierAttempt<O, E>>,
    abort: &AbortSignal,
) -> TierTerminal<O, E>
where
    I: Clone + Send + 'static,
    O: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    let max_attempts = def.retries_for(tier) + 1;
    let configured_timeout_ms = def.effective_timeout_ms(tier);

    let mut last_error: Option<E> = None;
    let mut last_was_timeout = false;
    let mut last_partial: Option<O> = None;

    for attempt in 1..=max_attempts {
        if abort.is_aborted() {
            return TierTerminal::Aborted;
        }

        let timeout_ms = match deadline {
            Some(d) => configured_timeout_ms.min(d.saturating_duration_since(Instant::now()).as_millis() as u64),
            None => configured_timeout_ms,
        };

        let ctx = prev.context(tier, attempt, cascade_attempt, timeout_ms);

        #[cfg(feature = "tracing")]
        tracing::debug!(cascade = %def.name(), %tier, attempt, "starting tier attempt");

        def.events.emit(&CascadeEvent::TierStarted {
            cascade: def.name().to_string(),
            timestamp: Instant::now(),
            tier,
            attempt,
        });

        let (outcome, duration_ms, timestamp_ms) = run_attempt(handler, input.clone(), ctx, timeout_ms, abort).await;

        #[cfg(feature = "metrics")]
        {
            crate::metrics::record_tier_attempt(def.name(), tier, attempt);
            crate::metrics::record_tier_duration(def.name(), tier, duration_ms);
        }

        match outcome {
            HarnessOutcome::Completed(output) => {
                history.push(TierAttempt {
                    tier,
                    attempt,
                    timestamp_ms,
                    duration_ms,
                    status: AttemptStatus::Completed,
                    result: Some(output.clone()),
                    error: None,
                });
                #[cfg(feature = "tracing")]
                tracing::debug!(cascade = %def.name(), %tier, attempt, duration_ms, "tier attempt completed");
                def.events.emit(&CascadeEvent::TierCompleted {
                    cascade: def.name().to_string(),
                    timestamp: Instant::now(),
                    tier,
                    attempt,
                    duration_ms,
                });
                return TierTerminal::Completed(output);
            }
            HarnessOutcome::Failed(herr) => {
                history.push(TierAttempt {
                    tier,
                    attempt,
                    timestamp_ms,
                    duration_ms,
                    status: AttemptStatus::Failed,
                    result: None,
                    error: Some(herr.error.clone()),
                });
                #[cfg(feature = "tracing")]
                tracing::debug!(cascade = %def.name(), %tier, attempt, duration_ms, "tier attempt failed");
                def.events.emit(&CascadeEvent::TierFailed {
                    cascade: def.name().to_string(),
                    timestamp: Instant::now(),
                    tier,
                    attempt,
                    duration_ms,
                });
                last_error = Some(herr.error);
                last_was_timeout = false;
                last_partial = if def.enable_fallback { herr.partial_result } else { None };
            }
            HarnessOutcome::TimedOut { timeout_ms } => {
                history.push(TierAttempt {
                    tier,
                    attempt,
                    timestamp_ms,
                    duration_ms,
                    status: AttemptStatus::Timeout,
                    result: None,
                    error: None,
                });
                #[cfg(feature = "tracing")]
                tracing::warn!(cascade = %def.name(), %tier, attempt, timeout_ms, "tier attempt timed out");
                def.events.emit(&CascadeEvent::TierTimedOut {
                    cascade: def.name().to_string(),
                    timestamp: Instant::now(),
                    tier,
                    attempt,
                    timeout_ms,
                });
                last_error = None;
                last_was_timeout = true;
                last_partial = None;
            }
            HarnessOutcome::Aborted => return TierTerminal::Aborted,
        }
    }

    TierTerminal::Exhausted {
        last_error,
        last_was_timeout,
        last_partial,
    }
}
