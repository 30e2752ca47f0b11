use cascade_executor::{CascadeDefinition, HandlerError, Tier};

#[derive(Debug, Clone, PartialEq, Eq)]
struct TestError(String);

impl std::fmt::Display for TestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[tokio::test]
async fn partial_result_is_carried_forward_when_fallback_is_enabled() {
    let def = CascadeDefinition::<u32, u32, TestError>::builder("fallback-forwarding")
        .enable_fallback(true)
        .handler_fn(Tier::Code, |_input, _ctx| async move {
            Err::<u32, _>(HandlerError::new(TestError("partial compute only".into())).with_partial_result(17))
        })
        .handler_fn(Tier::Generative, |_input, ctx| async move {
            assert_eq!(ctx.previous_result, Some(17));
            Ok(ctx.previous_result.unwrap() + 1)
        })
        .build()
        .unwrap();

    let result = def.execute(0, None).await.unwrap();
    assert_eq!(result.output, 18);
}

#[tokio::test]
async fn partial_result_is_dropped_when_fallback_is_disabled() {
    let def = CascadeDefinition::<u32, u32, TestError>::builder("fallback-disabled")
        .enable_fallback(false)
        .handler_fn(Tier::Code, |_input, _ctx| async move {
            Err::<u32, _>(HandlerError::new(TestError("partial compute only".into())).with_partial_result(17))
        })
        .handler_fn(Tier::Generative, |_input, ctx| async move {
            assert_eq!(ctx.previous_result, None);
            Ok(99)
        })
        .build()
        .unwrap();

    let result = def.execute(0, None).await.unwrap();
    assert_eq!(result.output, 99);
}
