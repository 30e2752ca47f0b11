//! Per-attempt context handed to a tier handler.

use cascade_core::Tier;

/// Everything a handler needs to know about where it sits in the cascade.
///
/// `previous_tier`, `previous_error`, and `previous_result` describe the
/// most recent *prior tier's* terminal failure; they do not change across
/// retries within the same tier.
#[derive(Debug, Clone)]
pub struct TierContext<O, E> {
    pub tier: Tier,
    pub attempt: usize,
    pub cascade_attempt: usize,
    pub time_remaining_ms: u64,
    pub previous_tier: Option<Tier>,
    pub previous_error: Option<E>,
    pub previous_result: Option<O>,
}

/// Tracks the most recent prior tier's terminal failure as the dispatcher
/// escalates, so the next tier's [`TierContext`] can carry it forward.
#[derive(Debug, Clone)]
pub(crate) struct Prev<O, E> {
    pub tier: Option<Tier>,
    pub error: Option<E>,
    pub result: Option<O>,
}

impl<O, E> Default for Prev<O, E> {
    fn default() -> Self {
        Self {
            tier: None,
            error: None,
            result: None,
        }
    }
}

impl<O: Clone, E: Clone> Prev<O, E> {
    pub(crate) fn context(&self, tier: Tier, attempt: usize, cascade_attempt: usize, time_remaining_ms: u64) -> TierContext<O, E> {
        TierContext {
            tier,
            attempt,
            cascade_attempt,
            time_remaining_ms,
            previous_tier: self.tier,
            previous_error: self.error.clone(),
            previous_result: self.result.clone(),
        }
    }
}
