//! Per-invocation metrics, derived from the attempt history rather than
//! threaded through as separate mutable state.

use std::collections::HashMap;

use cascade_core::Tier;

use crate::history::TierAttempt;

#[derive(Debug, Clone, Default)]
pub struct CascadeMetrics {
    pub total_duration_ms: u64,
    pub tier_durations: HashMap<Tier, u64>,
    pub escalations: usize,
    pub total_retries: usize,
}

impl CascadeMetrics {
    pub(crate) fn compute<O, E>(history: &[TierAttempt<O, E>], escalations: usize, total_duration_ms: u64) -> Self {
        let mut tier_durations: HashMap<Tier, u64> = HashMap::new();
        let mut attempt_counts: HashMap<Tier, usize> = HashMap::new();

        for attempt in history {
            *tier_durations.entry(attempt.tier).or_insert(0) += attempt.duration_ms;
            *attempt_counts.entry(attempt.tier).or_insert(0) += 1;
        }

        let total_retries = attempt_counts.values().map(|count| count.saturating_sub(1)).sum();

        Self {
            total_duration_ms,
            tier_durations,
            escalations,
            total_retries,
        }
    }
}

/// Registers metric descriptions once, at [`CascadeDefinition`] construction,
/// following `Retry::new`'s pattern.
///
/// [`CascadeDefinition`]: crate::definition::CascadeDefinition
#[cfg(feature = "metrics")]
pub(crate) fn describe_metrics() {
    metrics::describe_counter!("cascade_invocations_total", "Total cascade invocations by outcome");
    metrics::describe_histogram!("cascade_duration_ms", "Total duration in milliseconds of a cascade invocation");
    metrics::describe_counter!("cascade_attempts_total", "Total tier attempts across all cascades");
    metrics::describe_counter!("cascade_escalations_total", "Total escalations from one tier to the next");
    metrics::describe_counter!("cascade_retries_total", "Total retry attempts within a tier");
    metrics::describe_histogram!("cascade_tier_duration_ms", "Duration in milliseconds of a single tier attempt");
}

#[cfg(feature = "metrics")]
pub(crate) fn record_cascade_outcome(name: &str, outcome: &'static str, metrics: &CascadeMetrics) {
    let name_label = name.to_string();
    metrics::counter!("cascade_invocations_total", "cascade" => name_label.clone(), "outcome" => outcome).increment(1);
    metrics::histogram!("cascade_duration_ms", "cascade" => name_label).record(metrics.total_duration_ms as f64);
}

/// Recorded at every terminal tier attempt (completed, failed, or timed out).
#[cfg(feature = "metrics")]
pub(crate) fn record_tier_attempt(cascade: &str, tier: Tier, attempt: usize) {
    metrics::counter!("cascade_attempts_total", "cascade" => cascade.to_string(), "tier" => tier.as_str()).increment(1);
    if attempt > 1 {
        metrics::counter!("cascade_retries_total", "cascade" => cascade.to_string(), "tier" => tier.as_str()).increment(1);
    }
}

#[cfg(feature = "metrics")]
pub(crate) fn record_tier_duration(cascade: &str, tier: Tier, duration_ms: u64) {
    metrics::histogram!("cascade_tier_duration_ms", "cascade" => cascade.to_string(), "tier" => tier.as_str()).record(duration_ms as f64);
}

#[cfg(feature = "metrics")]
pub(crate) fn record_escalation(cascade: &str) {
    metrics::counter!("cascade_escalations_total", "cascade" => cascade.to_string()).increment(1);
}
