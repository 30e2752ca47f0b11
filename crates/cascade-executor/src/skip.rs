//! Input-dependent skip conditions.
//!
//! Predicates may be synchronous or asynchronous; the evaluator awaits both
//! uniformly by boxing every predicate as a future.

use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;

use cascade_core::Tier;

use crate::context::TierContext;
use crate::definition::CascadeDefinition;

type SkipPredicate<I, O, E> = Arc<dyn Fn(I, TierContext<O, E>) -> BoxFuture<'static, bool> + Send + Sync>;

/// A caller-supplied condition under which a tier is skipped for a
/// particular input, with a human-readable reason recorded alongside the
/// skip.
pub struct SkipCondition<I, O, E> {
    pub(crate) tier: Tier,
    pub(crate) reason: String,
    pub(crate) predicate: SkipPredicate<I, O, E>,
}

impl<I, O, E> SkipCondition<I, O, E>
where
    I: Send + 'static,
    O: Send + 'static,
    E: Send + 'static,
{
    /// An asynchronous skip predicate.
    pub fn new<F, Fut>(tier: Tier, reason: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(I, TierContext<O, E>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        Self {
            tier,
            reason: reason.into(),
            predicate: Arc::new(move |i, c| Box::pin(predicate(i, c))),
        }
    }

    /// A synchronous skip predicate, wrapped so the evaluator can await it
    /// like any other.
    pub fn sync<F>(tier: Tier, reason: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&I, &TierContext<O, E>) -> bool + Send + Sync + 'static,
    {
        Self::new(tier, reason, move |input: I, ctx: TierContext<O, E>| {
            let hit = predicate(&input, &ctx);
            async move { hit }
        })
    }
}

pub(crate) enum SkipOutcome {
    Proceed,
    Skip(String),
}

pub(crate) async fn evaluate_skip<I, O, E>(
    def: &CascadeDefinition<I, O, E>,
    tier: Tier,
    input: &I,
    ctx: &TierContext<O, E>,
) -> SkipOutcome
where
    I: Clone + Send + 'static,
    O: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    for cond in &def.skip_conditions {
        if cond.tier != tier {
            continue;
        }
        if (cond.predicate)(input.clone(), ctx.clone()).await {
            return SkipOutcome::Skip(cond.reason.clone());
        }
    }
    SkipOutcome::Proceed
}
