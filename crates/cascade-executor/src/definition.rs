//! A cascade definition: the handlers, escalation order, timeouts, retry
//! budgets, and skip rules for one kind of invocation.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::Arc;

use cascade_core::{DurationSpec, EventListener, EventListeners, Tier};

use crate::error::CascadeError;
use crate::events::CascadeEvent;
use crate::handler::{FnTierHandler, HandlerError, TierHandler};
use crate::skip::SkipCondition;

pub struct CascadeDefinition<I, O, E> {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) handlers: HashMap<Tier, Arc<dyn TierHandler<I, O, E>>>,
    pub(crate) start_tier: Tier,
    pub(crate) skip_tiers: HashSet<Tier>,
    pub(crate) tier_timeouts_ms: HashMap<Tier, u64>,
    pub(crate) total_timeout_ms: Option<u64>,
    pub(crate) tier_retries: HashMap<Tier, usize>,
    pub(crate) enable_fallback: bool,
    pub(crate) enable_parallel: bool,
    pub(crate) skip_conditions: Vec<SkipCondition<I, O, E>>,
    pub(crate) events: EventListeners<CascadeEvent>,
}

impl<I, O, E> CascadeDefinition<I, O, E>
where
    I: Send + 'static,
    O: Send + 'static,
    E: Send + 'static,
{
    pub fn builder(id: impl Into<String>) -> CascadeDefinitionBuilder<I, O, E> {
        CascadeDefinitionBuilder::new(id)
    }
}

impl<I, O, E> CascadeDefinition<I, O, E> {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn handler(&self, tier: Tier) -> Option<&Arc<dyn TierHandler<I, O, E>>> {
        self.handlers.get(&tier)
    }

    pub(crate) fn effective_timeout_ms(&self, tier: Tier) -> u64 {
        self.tier_timeouts_ms.get(&tier).copied().unwrap_or_else(|| tier.default_timeout_ms())
    }

    pub(crate) fn has_custom_timeout(&self, tier: Tier) -> bool {
        self.tier_timeouts_ms.contains_key(&tier)
    }

    pub(crate) fn retries_for(&self, tier: Tier) -> usize {
        self.tier_retries.get(&tier).copied().unwrap_or(0)
    }
}

pub struct CascadeDefinitionBuilder<I, O, E> {
    id: String,
    name: Option<String>,
    handlers: HashMap<Tier, Arc<dyn TierHandler<I, O, E>>>,
    start_tier: Tier,
    skip_tiers: HashSet<Tier>,
    tier_timeouts: HashMap<Tier, DurationSpec>,
    total_timeout: Option<DurationSpec>,
    tier_retries: HashMap<Tier, usize>,
    enable_fallback: bool,
    enable_parallel: bool,
    skip_conditions: Vec<SkipCondition<I, O, E>>,
    events: EventListeners<CascadeEvent>,
}

impl<I, O, E> CascadeDefinitionBuilder<I, O, E>
where
    I: Send + 'static,
    O: Send + 'static,
    E: Send + 'static,
{
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            handlers: HashMap::new(),
            start_tier: Tier::Code,
            skip_tiers: HashSet::new(),
            tier_timeouts: HashMap::new(),
            total_timeout: None,
            tier_retries: HashMap::new(),
            enable_fallback: false,
            enable_parallel: false,
            skip_conditions: Vec::new(),
            events: EventListeners::new(),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn handler<H>(mut self, tier: Tier, handler: H) -> Self
    where
        H: TierHandler<I, O, E> + 'static,
    {
        self.handlers.insert(tier, Arc::new(handler));
        self
    }

    pub fn handler_fn<F, Fut>(mut self, tier: Tier, f: F) -> Self
    where
        F: Fn(I, crate::context::TierContext<O, E>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<O, HandlerError<O, E>>> + Send + 'static,
    {
        self.handlers.insert(tier, Arc::new(FnTierHandler::new(f)));
        self
    }

    pub fn start_tier(mut self, tier: Tier) -> Self {
        self.start_tier = tier;
        self
    }

    pub fn skip_tier(mut self, tier: Tier) -> Self {
        self.skip_tiers.insert(tier);
        self
    }

    pub fn skip_tiers(mut self, tiers: impl IntoIterator<Item = Tier>) -> Self {
        self.skip_tiers.extend(tiers);
        self
    }

    pub fn tier_timeout(mut self, tier: Tier, timeout: impl Into<DurationSpec>) -> Self {
        self.tier_timeouts.insert(tier, timeout.into());
        self
    }

    pub fn total_timeout(mut self, timeout: impl Into<DurationSpec>) -> Self {
        self.total_timeout = Some(timeout.into());
        self
    }

    pub fn tier_retries(mut self, tier: Tier, retries: usize) -> Self {
        self.tier_retries.insert(tier, retries);
        self
    }

    pub fn enable_fallback(mut self, enabled: bool) -> Self {
        self.enable_fallback = enabled;
        self
    }

    pub fn enable_parallel(mut self, enabled: bool) -> Self {
        self.enable_parallel = enabled;
        self
    }

    pub fn skip_condition(mut self, condition: SkipCondition<I, O, E>) -> Self {
        self.skip_conditions.push(condition);
        self
    }

    pub fn on_event<L>(mut self, listener: L) -> Self
    where
        L: EventListener<CascadeEvent> + 'static,
    {
        self.events.add(listener);
        self
    }

    pub fn build(self) -> Result<CascadeDefinition<I, O, E>, CascadeError<O, E>> {
        let mut tier_timeouts_ms = HashMap::with_capacity(self.tier_timeouts.len());
        for (tier, spec) in self.tier_timeouts {
            tier_timeouts_ms.insert(tier, spec.resolve_ms()?);
        }

        let total_timeout_ms = match self.total_timeout {
            Some(spec) => Some(spec.resolve_ms()?),
            None => None,
        };

        #[cfg(feature = "metrics")]
        crate::metrics::describe_metrics();

        Ok(CascadeDefinition {
            id: self.id.clone(),
            name: self.name.unwrap_or(self.id),
            handlers: self.handlers,
            start_tier: self.start_tier,
            skip_tiers: self.skip_tiers,
            tier_timeouts_ms,
            total_timeout_ms,
            tier_retries: self.tier_retries,
            enable_fallback: self.enable_fallback,
            enable_parallel: self.enable_parallel,
            skip_conditions: self.skip_conditions,
            events: self.events,
        })
    }
}
