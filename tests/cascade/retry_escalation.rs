use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use cascade_executor::{CascadeDefinition, CascadeError, HandlerError, Tier};

#[derive(Debug, Clone, PartialEq, Eq)]
struct TestError(String);

impl std::fmt::Display for TestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[tokio::test(start_paused = true)]
async fn custom_timeout_on_the_last_tier_surfaces_as_cascade_exhausted() {
    let def = CascadeDefinition::<u32, u32, TestError>::builder("only-code")
        .handler_fn(Tier::Code, |input, _ctx| async move {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(input)
        })
        .tier_timeout(Tier::Code, "2s")
        .build()
        .unwrap();

    // Code is the only eligible tier, and it carries a *custom* timeout
    // override, so exhausting it must surface as cascade-exhausted rather
    // than the more specific tier-timeout.
    let err = def.execute(1, None).await.unwrap_err();
    assert!(matches!(err, CascadeError::CascadeExhausted { .. }));
}

#[tokio::test(start_paused = true)]
async fn default_timeout_on_the_last_tier_surfaces_as_tier_timeout() {
    let def = CascadeDefinition::<u32, u32, TestError>::builder("default-timeout-last")
        .handler_fn(Tier::Code, |input, _ctx| async move {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(input)
        })
        .build()
        .unwrap();

    // No override: Code keeps its default 5000ms budget, so an exhausted
    // timeout on it (the only eligible tier here) surfaces as tier-timeout.
    let err = def.execute(1, None).await.unwrap_err();
    assert!(matches!(
        err,
        CascadeError::TierTimeout {
            tier: Tier::Code,
            timeout_ms: 5_000
        }
    ));
}

#[tokio::test]
async fn retries_then_escalates_after_exhausting_the_budget() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let attempts_clone = Arc::clone(&attempts);

    let def = CascadeDefinition::<u32, u32, TestError>::builder("retry-then-escalate")
        .handler_fn(Tier::Code, move |_input, _ctx| {
            let attempts = Arc::clone(&attempts_clone);
            async move {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err::<u32, _>(HandlerError::new(TestError("still failing".into())))
            }
        })
        .tier_retries(Tier::Code, 2)
        .handler_fn(Tier::Generative, |input, _ctx| async move { Ok(input * 10) })
        .build()
        .unwrap();

    let result = def.execute(4, None).await.unwrap();
    assert_eq!(result.output, 40);
    assert_eq!(attempts.load(Ordering::SeqCst), 3); // 1 initial + 2 retries
    assert_eq!(result.metrics.total_retries, 2);
    assert_eq!(result.metrics.escalations, 1);
}

#[tokio::test]
async fn skip_condition_on_code_lets_generative_run() {
    let def = CascadeDefinition::<u32, u32, TestError>::builder("skip-code-on-large-input")
        .handler_fn(Tier::Code, |input, _ctx| async move { Ok(input) })
        .skip_condition(cascade_executor::SkipCondition::sync(Tier::Code, "input too large for code tier", |input, _ctx| {
            *input > 100
        }))
        .handler_fn(Tier::Generative, |input, _ctx| async move { Ok(input / 2) })
        .build()
        .unwrap();

    let result = def.execute(200, None).await.unwrap();
    assert_eq!(result.success_tier, Tier::Generative);
    assert_eq!(result.skipped_tiers, vec![Tier::Code]);
}
