//! Metrics regression tests: pin down the metric names and labels the
//! `metrics` feature promises, so a rename doesn't silently break a
//! consumer's dashboards.

use metrics_util::debugging::{DebugValue, DebuggingRecorder};
use serial_test::serial;
use std::sync::LazyLock;

use cascade_executor::{CascadeDefinition, HandlerError, Tier};

static RECORDER: LazyLock<DebuggingRecorder> = LazyLock::new(DebuggingRecorder::default);

fn init_recorder() {
    let _ = metrics::set_global_recorder(&*RECORDER);
}

fn snapshot() -> Vec<(
    metrics_util::CompositeKey,
    Option<metrics::Unit>,
    Option<metrics::SharedString>,
    DebugValue,
)> {
    RECORDER.snapshotter().snapshot().into_vec()
}

fn assert_counter_exists(name: &str) {
    let found = snapshot().iter().any(|(key, _, _, value)| key.key().name() == name && matches!(value, DebugValue::Counter(_)));
    assert!(found, "expected counter '{name}' not found in metrics");
}

fn assert_histogram_exists(name: &str) {
    let found = snapshot().iter().any(|(key, _, _, value)| key.key().name() == name && matches!(value, DebugValue::Histogram(_)));
    assert!(found, "expected histogram '{name}' not found in metrics");
}

fn assert_metric_has_label(name: &str, label_key: &str, label_value: &str) {
    let found = snapshot().iter().any(|(key, _, _, _)| {
        let key = key.key();
        key.name() == name && key.labels().any(|label| label.key() == label_key && label.value() == label_value)
    });
    assert!(found, "expected metric '{name}' with label {label_key}='{label_value}' not found");
}

#[derive(Debug, Clone)]
struct TestError(String);

impl std::fmt::Display for TestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[tokio::test]
#[serial]
async fn successful_cascade_records_invocation_and_attempt_metrics() {
    init_recorder();

    let def = CascadeDefinition::<u32, u32, TestError>::builder("metrics-success")
        .handler_fn(Tier::Code, |input, _ctx| async move { Ok(input) })
        .build()
        .unwrap();

    def.execute(7, None).await.unwrap();

    assert_counter_exists("cascade_invocations_total");
    assert_metric_has_label("cascade_invocations_total", "cascade", "metrics-success");
    assert_metric_has_label("cascade_invocations_total", "outcome", "success");
    assert_histogram_exists("cascade_duration_ms");

    assert_counter_exists("cascade_attempts_total");
    assert_metric_has_label("cascade_attempts_total", "cascade", "metrics-success");
    assert_metric_has_label("cascade_attempts_total", "tier", "code");
    assert_histogram_exists("cascade_tier_duration_ms");
}

#[tokio::test]
#[serial]
async fn retries_within_a_tier_increment_retries_total() {
    init_recorder();

    let def = CascadeDefinition::<u32, u32, TestError>::builder("metrics-retry")
        .handler_fn(Tier::Code, |_input, ctx| async move {
            if ctx.attempt < 2 {
                Err(HandlerError::new(TestError("not yet".into())))
            } else {
                Ok(1)
            }
        })
        .tier_retries(Tier::Code, 2)
        .build()
        .unwrap();

    def.execute(0, None).await.unwrap();

    assert_counter_exists("cascade_retries_total");
    assert_metric_has_label("cascade_retries_total", "cascade", "metrics-retry");
    assert_metric_has_label("cascade_retries_total", "tier", "code");
}

#[tokio::test]
#[serial]
async fn escalation_to_the_next_tier_increments_escalations_total() {
    init_recorder();

    let def = CascadeDefinition::<u32, u32, TestError>::builder("metrics-escalation")
        .handler_fn(Tier::Code, |_input, _ctx| async move { Err::<u32, _>(HandlerError::new(TestError("nope".into()))) })
        .handler_fn(Tier::Generative, |input, _ctx| async move { Ok(input) })
        .build()
        .unwrap();

    def.execute(3, None).await.unwrap();

    assert_counter_exists("cascade_escalations_total");
    assert_metric_has_label("cascade_escalations_total", "cascade", "metrics-escalation");
}

#[tokio::test]
#[serial]
async fn exhausted_cascade_is_labeled_accordingly() {
    init_recorder();

    let def = CascadeDefinition::<u32, u32, TestError>::builder("metrics-exhausted")
        .handler_fn(Tier::Code, |_input, _ctx| async move { Err::<u32, _>(HandlerError::new(TestError("always fails".into()))) })
        .build()
        .unwrap();

    let _ = def.execute(0, None).await.unwrap_err();

    assert_metric_has_label("cascade_invocations_total", "cascade", "metrics-exhausted");
    assert_metric_has_label("cascade_invocations_total", "outcome", "exhausted");
}
