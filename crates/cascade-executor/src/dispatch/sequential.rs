//! Sequential escalation: walk the tier order from `start_tier`, retrying
//! each one in place before moving to the next.

use std::time::Instant;

use crate::abort::AbortSignal;
use crate::context::Prev;
use crate::definition::CascadeDefinition;
use crate::error::CascadeError;
use crate::events::CascadeEvent;
use crate::metrics::CascadeMetrics;
use crate::registry::TierRegistry;
use crate::result::CascadeResult;
use crate::retry::{run_tier, TierTerminal};
use crate::skip::{evaluate_skip, SkipOutcome};

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
    let mut history = Vec::new();
    let mut skipped = Vec::new();
    let mut escalations = 0usize;
    let mut prev = Prev::<O, E>::default();

    let order = TierRegistry::order(def);

    for (idx, tier) in order.iter().copied().enumerate() {
        let is_last = idx == order.len() - 1;

        if abort.is_aborted() {
            return Err(CascadeError::Aborted { history });
        }

        let handler = match def.handler(tier) {
            Some(h) => h,
            None => {
                skipped.push(tier);
                continue;
            }
        };

        if def.skip_tiers.contains(&tier) {
            skipped.push(tier);
            def.events.emit(&CascadeEvent::TierSkipped {
                cascade: def.name().to_string(),
                timestamp: Instant::now(),
                tier,
                reason: "unconditionally skipped".to_string(),
            });
            continue;
        }

        let skip_ctx = prev.context(tier, 1, cascade_attempt, def.effective_timeout_ms(tier));
        match evaluate_skip(def, tier, &input, &skip_ctx).await {
            SkipOutcome::Skip(reason) => {
                skipped.push(tier);
                def.events.emit(&CascadeEvent::TierSkipped {
                    cascade: def.name().to_string(),
                    timestamp: Instant::now(),
                    tier,
                    reason: reason.clone(),
                });
                if is_last {
                    return Err(CascadeError::AllTiersSkipped { tier, reason });
                }
                continue;
            }
            SkipOutcome::Proceed => {}
        }

        let terminal = run_tier(def, tier, handler, &input, cascade_attempt, deadline, &prev, &mut history, &abort).await;

        match terminal {
            TierTerminal::Completed(output) => {
                let total_duration_ms = wall_start.elapsed().as_millis() as u64;
                let metrics = CascadeMetrics::compute(&history, escalations, total_duration_ms);
                #[cfg(feature = "tracing")]
                tracing::info!(cascade = %def.name(), %tier, total_duration_ms, "cascade succeeded");
                def.events.emit(&CascadeEvent::CascadeSucceeded {
                    cascade: def.name().to_string(),
                    timestamp: Instant::now(),
                    success_tier: tier,
                });
                #[cfg(feature = "metrics")]
                crate::metrics::record_cascade_outcome(def.name(), "success", &metrics);
                return Ok(CascadeResult {
                    output,
                    success_tier: tier,
                    history,
                    skipped_tiers: skipped,
                    metrics,
                });
            }
            TierTerminal::Aborted => {
                #[cfg(feature = "tracing")]
                tracing::warn!(cascade = %def.name(), %tier, "cascade aborted");
                def.events.emit(&CascadeEvent::CascadeAborted {
                    cascade: def.name().to_string(),
                    timestamp: Instant::now(),
                });
                #[cfg(feature = "metrics")]
                {
                    let total_duration_ms = wall_start.elapsed().as_millis() as u64;
                    let metrics = CascadeMetrics::compute(&history, escalations, total_duration_ms);
                    crate::metrics::record_cascade_outcome(def.name(), "aborted", &metrics);
                }
                return Err(CascadeError::Aborted { history });
            }
            TierTerminal::Exhausted {
                last_error,
                last_was_timeout,
                last_partial,
            } => {
                escalations += 1;

                if is_last {
                    let total_duration_ms = wall_start.elapsed().as_millis() as u64;
                    if last_was_timeout && !def.has_custom_timeout(tier) {
                        #[cfg(feature = "tracing")]
                        tracing::warn!(cascade = %def.name(), %tier, timeout_ms = def.effective_timeout_ms(tier), "tier timed out on last eligible tier");
                        return Err(CascadeError::TierTimeout {
                            tier,
                            timeout_ms: def.effective_timeout_ms(tier),
                        });
                    }
                    #[cfg(feature = "tracing")]
                    tracing::warn!(cascade = %def.name(), %tier, total_duration_ms, "cascade exhausted all eligible tiers");
                    def.events.emit(&CascadeEvent::CascadeExhausted {
                        cascade: def.name().to_string(),
                        timestamp: Instant::now(),
                        total_duration_ms,
                    });
                    #[cfg(feature = "metrics")]
                    {
                        let metrics = CascadeMetrics::compute(&history, escalations, total_duration_ms);
                        crate::metrics::record_cascade_outcome(def.name(), "exhausted", &metrics);
                    }
                    return Err(CascadeError::CascadeExhausted {
                        cascade_id: def.id.clone(),
                        total_duration_ms,
                        history,
                    });
                }

                let next_tier = order.get(idx + 1).copied();
                #[cfg(feature = "tracing")]
                tracing::info!(cascade = %def.name(), from_tier = %tier, to_tier = ?next_tier, "escalating to next tier");
                #[cfg(feature = "metrics")]
                crate::metrics::record_escalation(def.name());
                def.events.emit(&CascadeEvent::Escalated {
                    cascade: def.name().to_string(),
                    timestamp: Instant::now(),
                    from_tier: tier,
                    to_tier: next_tier,
                });

                prev.tier = Some(tier);
                prev.error = last_error;
                prev.result = last_partial;
            }
        }
    }

    let total_duration_ms = wall_start.elapsed().as_millis() as u64;
    #[cfg(feature = "tracing")]
    tracing::warn!(cascade = %def.name(), total_duration_ms, "cascade exhausted: no eligible tier remained");
    #[cfg(feature = "metrics")]
    {
        let metrics = CascadeMetrics::compute(&history, escalations, total_duration_ms);
        crate::metrics::record_cascade_outcome(def.name(), "exhausted", &metrics);
    }
    Err(CascadeError::CascadeExhausted {
        cascade_id: def.id.clone(),
        total_duration_ms,
        history,
    })
}
