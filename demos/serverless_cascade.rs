//! Demonstrates a cascade that escalates a support-ticket classification
//! task from a cheap rule-based tier up through a human fallback.

use cascade_executor::{CascadeDefinition, HandlerError, Tier};

#[derive(Debug, Clone)]
enum ClassifyError {
    LowConfidence,
    AgentUnavailable,
}

impl std::fmt::Display for ClassifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClassifyError::LowConfidence => write!(f, "classification confidence too low"),
            ClassifyError::AgentUnavailable => write!(f, "agentic tier unavailable"),
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let def = CascadeDefinition::<String, String, ClassifyError>::builder("ticket-classification")
        .name("ticket-classification")
        .tier_timeout(Tier::Code, "1s")
        .tier_timeout(Tier::Generative, "10s")
        .tier_retries(Tier::Generative, 1)
        .enable_fallback(true)
        .handler_fn(Tier::Code, |ticket: String, _ctx| async move {
            if ticket.to_lowercase().contains("refund") {
                Ok("billing".to_string())
            } else {
                Err(HandlerError::new(ClassifyError::LowConfidence))
            }
        })
        .handler_fn(Tier::Generative, |ticket: String, _ctx| async move {
            if ticket.len() > 10 {
                Ok("general-support".to_string())
            } else {
                Err(HandlerError::new(ClassifyError::LowConfidence).with_partial_result("uncategorized".to_string()))
            }
        })
        .handler_fn(Tier::Human, |_ticket: String, ctx| async move {
            Ok(ctx.previous_result.unwrap_or_else(|| "needs-triage".to_string()))
        })
        .on_event(cascade_core::FnListener::new(|event: &cascade_executor::CascadeEvent| {
            println!("{event:?}");
        }))
        .build()
        .expect("valid cascade definition");

    let result = def.execute("please refund my order".to_string(), None).await.unwrap();
    println!("classified as: {} (via {})", result.output, result.success_tier);

    let result = def.execute("hi".to_string(), None).await.unwrap();
    println!("classified as: {} (via {})", result.output, result.success_tier);
}
