//! The per-attempt timeout harness.
//!
//! Races a spawned handler invocation against a timer and the cascade's
//! abort signal. Whichever resolves first wins; the other two are simply
//! stopped being observed. The handler runs as its own spawned task (as in
//! a parallel-race dispatch) so a late panic or a late completion after we
//! have moved on is contained in that task and never reaches the caller.

use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use crate::abort::AbortSignal;
use crate::context::TierContext;
use crate::handler::{HandlerError, TierHandler};

pub(crate) enum HarnessOutcome<O, E> {
    Completed(O),
    Failed(HandlerError<O, E>),
    TimedOut { timeout_ms: u64 },
    Aborted,
}

fn wall_clock_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

pub(crate) async fn run_attempt<I, O, E>(
    handler: &Arc<dyn TierHandler<I, O, E>>,
    input: I,
    ctx: TierContext<O, E>,
    timeout_ms: u64,
    abort: &AbortSignal,
) -> (HarnessOutcome<O, E>, u64, u64)
where
    I: Send + 'static,
    O: Send + 'static,
    E: Send + 'static,
{
    let start_wall = wall_clock_ms();
    let start = Instant::now();

    let handler = Arc::clone(handler);
    let join = tokio::spawn(async move { handler.execute(input, ctx).await });

    let timer = tokio::time::sleep(Duration::from_millis(timeout_ms));
    tokio::pin!(join, timer);

    let outcome = tokio::select! {
        biased;
        _ = abort.aborted() => HarnessOutcome::Aborted,
        joined = &mut join => match joined {
            Ok(Ok(output)) => HarnessOutcome::Completed(output),
            Ok(Err(herr)) if herr.is_timeout => HarnessOutcome::TimedOut { timeout_ms },
            Ok(Err(herr)) => HarnessOutcome::Failed(herr),
            // The handler task panicked. Treated as an ordinary harness
            // timeout rather than propagated: a panicking tier handler
            // should escalate, not crash the cascade.
            Err(_join_err) => HarnessOutcome::TimedOut { timeout_ms },
        },
        _ = &mut timer => HarnessOutcome::TimedOut { timeout_ms },
    };

    let duration_ms = start.elapsed().as_millis() as u64;
    (outcome, duration_ms, start_wall)
}
