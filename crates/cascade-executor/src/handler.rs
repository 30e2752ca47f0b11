//! Tier handlers: the uniform "execute" callable every tier dispatches to.
//!
//! A handler can be a plain async closure wrapped in [`FnTierHandler`], or
//! any caller-defined type that implements [`TierHandler`] directly: a
//! configuration object carrying a prompt template, an agent ID, whatever
//! tier-specific metadata it needs. The cascade only ever calls `execute`
//! and ignores the rest.

use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;

use crate::context::TierContext;

/// An error raised by a handler's `execute` call.
///
/// `partial_result` carries a best-effort output alongside a failure, used
/// for fallback extraction when the cascade definition opts into it.
/// `is_timeout` lets a handler self-report as belonging to the timeout
/// category; it is then treated exactly like a harness-level timeout
/// rather than an ordinary application failure.
#[derive(Debug, Clone)]
pub struct HandlerError<O, E> {
    pub error: E,
    pub partial_result: Option<O>,
    pub is_timeout: bool,
}

impl<O, E> HandlerError<O, E> {
    pub fn new(error: E) -> Self {
        Self {
            error,
            partial_result: None,
            is_timeout: false,
        }
    }

    pub fn with_partial_result(mut self, partial: O) -> Self {
        self.partial_result = Some(partial);
        self
    }

    pub fn as_timeout(mut self) -> Self {
        self.is_timeout = true;
        self
    }
}

impl<O, E: std::fmt::Display> std::fmt::Display for HandlerError<O, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.error)
    }
}

/// A single execution strategy for one tier.
///
/// Implementations must be cheap to call repeatedly: a retried tier invokes
/// `execute` once per attempt, each time with a fresh [`TierContext`].
pub trait TierHandler<I, O, E>: Send + Sync {
    fn execute(&self, input: I, ctx: TierContext<O, E>) -> BoxFuture<'static, Result<O, HandlerError<O, E>>>;
}

/// Wraps a plain async closure as a [`TierHandler`].
pub struct FnTierHandler<F> {
    f: Arc<F>,
}

impl<F> FnTierHandler<F> {
    pub fn new(f: F) -> Self {
        Self { f: Arc::new(f) }
    }
}

impl<F, I, O, E, Fut> TierHandler<I, O, E> for FnTierHandler<F>
where
    F: Fn(I, TierContext<O, E>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<O, HandlerError<O, E>>> + Send + 'static,
    I: Send + 'static,
    O: Send + 'static,
    E: Send + 'static,
{
    fn execute(&self, input: I, ctx: TierContext<O, E>) -> BoxFuture<'static, Result<O, HandlerError<O, E>>> {
        let f = Arc::clone(&self.f);
        Box::pin(async move { f(input, ctx).await })
    }
}
