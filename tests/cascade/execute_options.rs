use cascade_executor::{AbortSignal, CascadeDefinition, CascadeError, ExecuteOptions, HandlerError, Tier, TierContext};

#[derive(Debug, Clone, PartialEq, Eq)]
struct TestError(String);

impl std::fmt::Display for TestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn direct_context(tier: Tier) -> TierContext<u32, TestError> {
    TierContext {
        tier,
        attempt: 1,
        cascade_attempt: 1,
        time_remaining_ms: 5_000,
        previous_tier: None,
        previous_error: None,
        previous_result: None,
    }
}

#[tokio::test]
async fn abort_before_first_tier_yields_aborted_with_empty_history() {
    let def = CascadeDefinition::<u32, u32, TestError>::builder("pre-aborted")
        .handler_fn(Tier::Code, |input, _ctx| async move { Ok(input) })
        .build()
        .unwrap();

    let abort = AbortSignal::new();
    abort.abort();

    let opts = ExecuteOptions {
        abort: Some(abort),
        cascade_attempt: None,
    };
    let err = def.execute(0, Some(opts)).await.unwrap_err();
    match err {
        CascadeError::Aborted { history } => assert!(history.is_empty()),
        other => panic!("expected Aborted, got {other:?}"),
    }
}

#[tokio::test]
async fn cascade_attempt_override_is_reflected_in_context() {
    let def = CascadeDefinition::<u32, u32, TestError>::builder("attempt-override")
        .handler_fn(Tier::Code, |_input, ctx| async move {
            assert_eq!(ctx.cascade_attempt, 3);
            Ok(1)
        })
        .build()
        .unwrap();

    let opts = ExecuteOptions {
        abort: None,
        cascade_attempt: Some(3),
    };
    def.execute(0, Some(opts)).await.unwrap();
}

#[tokio::test]
async fn total_timeout_smaller_than_tier_timeout_tightens_first_attempt_budget() {
    let def = CascadeDefinition::<u32, u32, TestError>::builder("tight-budget")
        .total_timeout("50ms")
        .handler_fn(Tier::Code, |_input, ctx| async move {
            assert!(ctx.time_remaining_ms <= 50, "expected a tightened budget, got {}", ctx.time_remaining_ms);
            Ok(1)
        })
        .build()
        .unwrap();

    let result = def.execute(0, None).await.unwrap();
    assert_eq!(result.output, 1);
}

#[tokio::test]
async fn execute_tier_runs_a_single_tier_directly() {
    let def = CascadeDefinition::<u32, u32, TestError>::builder("direct-tier")
        .handler_fn(Tier::Code, |input, _ctx| async move { Ok(input + 1) })
        .build()
        .unwrap();

    let output = def.execute_tier(Tier::Code, 9, direct_context(Tier::Code)).await.unwrap();
    assert_eq!(output, 10);
}

#[tokio::test]
async fn execute_tier_surfaces_handler_failure_without_building_history() {
    let def = CascadeDefinition::<u32, u32, TestError>::builder("direct-tier-fail")
        .handler_fn(Tier::Code, |_input, _ctx| async move {
            Err::<u32, _>(HandlerError::new(TestError("bad input".into())))
        })
        .build()
        .unwrap();

    let err = def.execute_tier(Tier::Code, 0, direct_context(Tier::Code)).await.unwrap_err();
    assert!(matches!(err, CascadeError::HandlerFailed(TestError(_))));
}

#[tokio::test]
async fn execute_tier_rejects_an_undefined_tier() {
    let def = CascadeDefinition::<u32, u32, TestError>::builder("direct-tier-missing")
        .handler_fn(Tier::Code, |input, _ctx| async move { Ok(input) })
        .build()
        .unwrap();

    let err = def.execute_tier(Tier::Human, 0, direct_context(Tier::Human)).await.unwrap_err();
    assert!(matches!(err, CascadeError::TierNotDefined { tier: Tier::Human }));
}
