//! The record of a single tier attempt, and the statuses it can end in.

use cascade_core::Tier;

/// Terminal status of one recorded attempt.
///
/// `Skipped` exists for completeness with the conceptual attempt model, but
/// a skipped tier is never appended to a cascade's history, it only shows
/// up in `skipped_tiers`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptStatus {
    Completed,
    Failed,
    Timeout,
    Skipped,
}

/// One attempt at one tier: what happened, when, and how long it took.
#[derive(Debug, Clone)]
pub struct TierAttempt<O, E> {
    pub tier: Tier,
    pub attempt: usize,
    pub timestamp_ms: u64,
    pub duration_ms: u64,
    pub status: AttemptStatus,
    pub result: Option<O>,
    pub error: Option<E>,
}
