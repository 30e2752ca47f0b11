use proptest::prelude::*;

use cascade_executor::{CascadeDefinition, HandlerError, Tier};

#[derive(Debug, Clone, PartialEq, Eq)]
struct TestError(String);

impl std::fmt::Display for TestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn run<F, T>(f: F) -> T
where
    F: std::future::Future<Output = T>,
{
    tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(f)
}

proptest! {
    /// Invariant: a cascade where every tier up to and including `fail_until`
    /// fails, and the tier right after succeeds, always resolves at that
    /// tier with an escalation count equal to the number of failed tiers.
    #[test]
    fn escalation_count_matches_failed_tier_count(fail_count in 0usize..3) {
        run(async move {
            let tiers = Tier::ORDER;
            let mut builder = CascadeDefinition::<u32, u32, TestError>::builder("prop-escalation");

            for tier in tiers.iter().take(fail_count) {
                builder = builder.handler_fn(*tier, |_input, _ctx| async move {
                    Err::<u32, _>(HandlerError::new(TestError("fail".into())))
                });
            }
            let success_tier = tiers[fail_count];
            builder = builder.handler_fn(success_tier, |input, _ctx| async move { Ok(input) });

            let def = builder.build().unwrap();
            let result = def.execute(1, None).await.unwrap();

            prop_assert_eq!(result.success_tier, success_tier);
            prop_assert_eq!(result.metrics.escalations, fail_count);
            prop_assert_eq!(result.history.len(), fail_count + 1);
            Ok(())
        })
    }

    /// Invariant: the recorded history never contains more completed
    /// attempts than one, regardless of how many tiers were attempted.
    #[test]
    fn history_has_at_most_one_completed_attempt(fail_count in 0usize..3) {
        run(async move {
            let tiers = Tier::ORDER;
            let mut builder = CascadeDefinition::<u32, u32, TestError>::builder("prop-single-success");

            for tier in tiers.iter().take(fail_count) {
                builder = builder.handler_fn(*tier, |_input, _ctx| async move {
                    Err::<u32, _>(HandlerError::new(TestError("fail".into())))
                });
            }
            let success_tier = tiers[fail_count];
            builder = builder.handler_fn(success_tier, |input, _ctx| async move { Ok(input) });

            let def = builder.build().unwrap();
            let result = def.execute(1, None).await.unwrap();

            let completed = result
                .history
                .iter()
                .filter(|a| a.status == cascade_executor::AttemptStatus::Completed)
                .count();
            prop_assert_eq!(completed, 1);
            Ok(())
        })
    }
}
