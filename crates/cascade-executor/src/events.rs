//! Cascade-specific events, emitted through the shared listener registry.

use std::time::Instant;

use cascade_core::events::ResilienceEvent;
use cascade_core::Tier;

#[derive(Debug, Clone)]
pub enum CascadeEvent {
    TierStarted {
        cascade: String,
        timestamp: Instant,
        tier: Tier,
        attempt: usize,
    },
    TierCompleted {
        cascade: String,
        timestamp: Instant,
        tier: Tier,
        attempt: usize,
        duration_ms: u64,
    },
    TierFailed {
        cascade: String,
        timestamp: Instant,
        tier: Tier,
        attempt: usize,
        duration_ms: u64,
    },
    TierTimedOut {
        cascade: String,
        timestamp: Instant,
        tier: Tier,
        attempt: usize,
        timeout_ms: u64,
    },
    TierSkipped {
        cascade: String,
        timestamp: Instant,
        tier: Tier,
        reason: String,
    },
    Escalated {
        cascade: String,
        timestamp: Instant,
        from_tier: Tier,
        to_tier: Option<Tier>,
    },
    CascadeSucceeded {
        cascade: String,
        timestamp: Instant,
        success_tier: Tier,
    },
    CascadeExhausted {
        cascade: String,
        timestamp: Instant,
        total_duration_ms: u64,
    },
    CascadeAborted {
        cascade: String,
        timestamp: Instant,
    },
}

impl ResilienceEvent for CascadeEvent {
    fn event_type(&self) -> &'static str {
        match self {
            CascadeEvent::TierStarted { .. } => "TierStarted",
            CascadeEvent::TierCompleted { .. } => "TierCompleted",
            CascadeEvent::TierFailed { .. } => "TierFailed",
            CascadeEvent::TierTimedOut { .. } => "TierTimedOut",
            CascadeEvent::TierSkipped { .. } => "TierSkipped",
            CascadeEvent::Escalated { .. } => "Escalated",
            CascadeEvent::CascadeSucceeded { .. } => "CascadeSucceeded",
            CascadeEvent::CascadeExhausted { .. } => "CascadeExhausted",
            CascadeEvent::CascadeAborted { .. } => "CascadeAborted",
        }
    }

    fn timestamp(&self) -> Instant {
        match self {
            CascadeEvent::TierStarted { timestamp, .. }
            | CascadeEvent::TierCompleted { timestamp, .. }
            | CascadeEvent::TierFailed { timestamp, .. }
            | CascadeEvent::TierTimedOut { timestamp, .. }
            | CascadeEvent::TierSkipped { timestamp, .. }
            | CascadeEvent::Escalated { timestamp, .. }
            | CascadeEvent::CascadeSucceeded { timestamp, .. }
            | CascadeEvent::CascadeExhausted { timestamp, .. }
            | CascadeEvent::CascadeAborted { timestamp, .. } => *timestamp,
        }
    }

    fn pattern_name(&self) -> &str {
        match self {
            CascadeEvent::TierStarted { cascade, .. }
            | CascadeEvent::TierCompleted { cascade, .. }
            | CascadeEvent::TierFailed { cascade, .. }
            | CascadeEvent::TierTimedOut { cascade, .. }
            | CascadeEvent::TierSkipped { cascade, .. }
            | CascadeEvent::Escalated { cascade, .. }
            | CascadeEvent::CascadeSucceeded { cascade, .. }
            | CascadeEvent::CascadeExhausted { cascade, .. }
            | CascadeEvent::CascadeAborted { cascade, .. } => cascade,
        }
    }
}
