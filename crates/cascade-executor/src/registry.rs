//! Tier lookup: is a handler present, and the canonical attempt order.

use cascade_core::Tier;

use crate::definition::CascadeDefinition;
use crate::handler::TierHandler;
use std::sync::Arc;

pub(crate) struct TierRegistry;

impl TierRegistry {
    /// The ordered subsequence of tiers a cascade will walk, starting at
    /// its configured `start_tier`.
    pub(crate) fn order<I, O, E>(def: &CascadeDefinition<I, O, E>) -> Vec<Tier> {
        def.start_tier.from_here().collect()
    }

    /// Every tier with a registered handler that is not in `skip_tiers`,
    /// in canonical order. Used by the parallel dispatcher, which ignores
    /// `start_tier` and races every eligible tier at once.
    pub(crate) fn parallel_candidates<I, O, E>(def: &CascadeDefinition<I, O, E>) -> Vec<Tier> {
        Tier::ORDER
            .into_iter()
            .filter(|tier| def.handler(*tier).is_some() && !def.skip_tiers.contains(tier))
            .collect()
    }

    pub(crate) fn handler<'a, I, O, E>(def: &'a CascadeDefinition<I, O, E>, tier: Tier) -> Option<&'a Arc<dyn TierHandler<I, O, E>>> {
        def.handler(tier)
    }
}
