//! The entry points: run a whole cascade, or drive a single tier directly.

use std::time::Instant;

use cascade_core::Tier;

use crate::abort::AbortSignal;
use crate::context::TierContext;
use crate::definition::CascadeDefinition;
use crate::dispatch::{parallel, sequential};
use crate::error::CascadeError;
use crate::events::CascadeEvent;
use crate::result::CascadeResult;

/// Per-call overrides: a caller-supplied abort signal and an externally
/// tracked cascade-attempt counter (for callers retrying a whole cascade
/// invocation themselves and wanting that reflected in tier context).
#[derive(Clone, Default)]
pub struct ExecuteOptions {
    pub abort: Option<AbortSignal>,
    pub cascade_attempt: Option<usize>,
}

impl<I, O, E> CascadeDefinition<I, O, E>
where
    I: Clone + Send + 'static,
    O: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    /// Run the cascade end to end: escalate through tiers (or race them,
    /// if `enable_parallel` is set) until one completes or every eligible
    /// tier is exhausted.
    pub async fn execute(&self, input: I, opts: Option<ExecuteOptions>) -> Result<CascadeResult<O, E>, CascadeError<O, E>> {
        let opts = opts.unwrap_or_default();
        let abort = opts.abort.unwrap_or_default();
        let cascade_attempt = opts.cascade_attempt.unwrap_or(1);

        if abort.is_aborted() {
            return Err(CascadeError::Aborted { history: Vec::new() });
        }

        let deadline = self.total_timeout_ms.map(|ms| Instant::now() + std::time::Duration::from_millis(ms));

        #[cfg(feature = "tracing")]
        tracing::debug!(cascade = %self.name, parallel = self.enable_parallel, "starting cascade execution");

        if self.enable_parallel {
            parallel::run(self, input, cascade_attempt, abort, deadline).await
        } else {
            sequential::run(self, input, cascade_attempt, abort, deadline).await
        }
    }

    /// Run a single tier directly, bypassing retries, timeouts, and skip
    /// evaluation. The caller must supply a fully-formed [`TierContext`]
    /// themselves.
    pub async fn execute_tier(&self, tier: Tier, input: I, ctx: TierContext<O, E>) -> Result<O, CascadeError<O, E>> {
        let handler = self.handler(tier).ok_or(CascadeError::TierNotDefined { tier })?;

        self.events.emit(&CascadeEvent::TierStarted {
            cascade: self.name().to_string(),
            timestamp: Instant::now(),
            tier,
            attempt: ctx.attempt,
        });

        match handler.execute(input, ctx).await {
            Ok(output) => Ok(output),
            Err(herr) => Err(CascadeError::HandlerFailed(herr.error)),
        }
    }
}
