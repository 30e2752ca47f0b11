//! The successful outcome of a cascade invocation.

use cascade_core::Tier;

use crate::history::TierAttempt;
use crate::metrics::CascadeMetrics;

#[derive(Debug, Clone)]
pub struct CascadeResult<O, E> {
    pub output: O,
    pub success_tier: Tier,
    pub history: Vec<TierAttempt<O, E>>,
    pub skipped_tiers: Vec<Tier>,
    pub metrics: CascadeMetrics,
}
