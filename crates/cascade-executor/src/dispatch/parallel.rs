//! Parallel dispatch: fire every eligible tier at once, take whichever
//! completes first, and silently abandon the rest.
//!
//! Escalation count and retry count are always zero in this mode: there
//! is no sequential hand-off to count, and no per-tier retry loop runs.

use std::sync::Arc;
use std::time::Instant;

use crate::abort::AbortSignal;
use crate::context::TierContext;
use crate::definition::CascadeDefinition;
use crate::error::CascadeError;
use crate::events::CascadeEvent;
use crate::history::{AttemptStatus, TierAttempt};
use crate::metrics::CascadeMetrics;
use crate::registry::TierRegistry;
use crate::result::CascadeResult;
use crate::timeout::{run_attempt, HarnessOutcome};

pub(crate) async fn run<I, O, E>(
    def: &CascadeDefinition<I, O, E>,
    input: I,
    cascade_attempt: usize,
    abort: AbortSignal,
    deadline: Option<Instant>,
) -> Result<CascadeResult<O, E>, CascadeError<O, E>>
where
    I: Clone + Send + 'static,
    O: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    let wall_start = Instant::now();
    let eligible = TierRegistry::parallel_candidates(def);
    let skipped_tiers: Vec<_> = cascade_core::Tier::ORDER.into_iter().filter(|tier| !eligible.contains(tier)).collect();

    if eligible.is_empty() {
        return Err(CascadeError::CascadeExhausted {
            cascade_id: def.id.clone(),
            total_duration_ms: 0,
            history: Vec::new(),
        });
    }

    let (tx, mut rx) = tokio::sync::mpsc::channel::<TierAttempt<O, E>>(eligible.len());

    for tier in eligible {
        let handler = Arc::clone(def.handler(tier).expect("filtered to handled tiers"));
        let input = input.clone();
        let abort = abort.clone();
        let tx = tx.clone();

        let timeout_ms = match deadline {
            Some(d) => def.effective_timeout_ms(tier).min(d.saturating_duration_since(Instant::now()).as_millis() as u64),
            None => def.effective_timeout_ms(tier),
        };

        let ctx = TierContext {
            tier,
            attempt: 1,
            cascade_attempt,
            time_remaining_ms: timeout_ms,
            previous_tier: None,
            previous_error: None,
            previous_result: None,
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(cascade = %def.name(), %tier, "starting tier attempt");

        def.events.emit(&CascadeEvent::TierStarted {
            cascade: def.name().to_string(),
            timestamp: Instant::now(),
            tier,
            attempt: 1,
        });

        #[cfg(feature = "metrics")]
        let cascade_name = def.name().to_string();

        tokio::spawn(async move {
            let (outcome, duration_ms, timestamp_ms) = run_attempt(&handler, input, ctx, timeout_ms, &abort).await;

            #[cfg(feature = "metrics")]
            {
                crate::metrics::record_tier_attempt(&cascade_name, tier, 1);
                crate::metrics::record_tier_duration(&cascade_name, tier, duration_ms);
            }

            let record = match outcome {
                HarnessOutcome::Completed(ref output) => TierAttempt {
                    tier,
                    attempt: 1,
                    timestamp_ms,
                    duration_ms,
                    status: AttemptStatus::Completed,
                    result: Some(output.clone()),
                    error: None,
                },
                HarnessOutcome::Failed(ref herr) => TierAttempt {
                    tier,
                    attempt: 1,
                    timestamp_ms,
                    duration_ms,
                    status: AttemptStatus::Failed,
                    result: None,
                    error: Some(herr.error.clone()),
                },
                HarnessOutcome::TimedOut { .. } => TierAttempt {
                    tier,
                    attempt: 1,
                    timestamp_ms,
                    duration_ms,
                    status: AttemptStatus::Timeout,
                    result: None,
                    error: None,
                },
                // The cascade-wide abort fired while this tier was racing.
                // Nothing to report; the receiving loop observes the same
                // signal directly.
                HarnessOutcome::Aborted => return,
            };

            let _ = tx.send(record).await;
        });
    }
    drop(tx);

    let mut history = Vec::new();

    loop {
        tokio::select! {
            biased;
            _ = abort.aborted() => {
                #[cfg(feature = "tracing")]
                tracing::warn!(cascade = %def.name(), "cascade aborted");
                def.events.emit(&CascadeEvent::CascadeAborted {
                    cascade: def.name().to_string(),
                    timestamp: Instant::now(),
                });
                #[cfg(feature = "metrics")]
                {
                    let total_duration_ms = wall_start.elapsed().as_millis() as u64;
                    let metrics = CascadeMetrics::compute(&history, 0, total_duration_ms);
                    crate::metrics::record_cascade_outcome(def.name(), "aborted", &metrics);
                }
                return Err(CascadeError::Aborted { history });
            }
            received = rx.recv() => {
                match received {
                    Some(record) if record.status == AttemptStatus::Completed => {
                        let output = record.result.clone().expect("completed attempt carries output");
                        let tier = record.tier;
                        let duration_ms = record.duration_ms;
                        history.push(record);
                        #[cfg(feature = "tracing")]
                        tracing::info!(cascade = %def.name(), %tier, "cascade succeeded");
                        def.events.emit(&CascadeEvent::TierCompleted {
                            cascade: def.name().to_string(),
                            timestamp: Instant::now(),
                            tier,
                            attempt: 1,
                            duration_ms,
                        });
                        def.events.emit(&CascadeEvent::CascadeSucceeded {
                            cascade: def.name().to_string(),
                            timestamp: Instant::now(),
                            success_tier: tier,
                        });
                        let total_duration_ms = wall_start.elapsed().as_millis() as u64;
                        let metrics = CascadeMetrics::compute(&history, 0, total_duration_ms);
                        #[cfg(feature = "metrics")]
                        crate::metrics::record_cascade_outcome(def.name(), "success", &metrics);
                        return Ok(CascadeResult {
                            output,
                            success_tier: tier,
                            history,
                            skipped_tiers,
                            metrics,
                        });
                    }
                    Some(record) => {
                        history.push(record);
                    }
                    None => break,
                }
            }
        }
    }

    let total_duration_ms = wall_start.elapsed().as_millis() as u64;
    #[cfg(feature = "tracing")]
    tracing::warn!(cascade = %def.name(), total_duration_ms, "cascade exhausted: every racing tier failed or timed out");
    def.events.emit(&CascadeEvent::CascadeExhausted {
        cascade: def.name().to_string(),
        timestamp: Instant::now(),
        total_duration_ms,
    });
    #[cfg(feature = "metrics")]
    {
        let metrics = CascadeMetrics::compute(&history, 0, total_duration_ms);
        crate::metrics::record_cascade_outcome(def.name(), "exhausted", &metrics);
    }
    Err(CascadeError::CascadeExhausted {
        cascade_id: def.id.clone(),
        total_duration_ms,
        history,
    })
}
