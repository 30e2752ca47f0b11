//! The four execution tiers and their canonical order.

use std::fmt;

/// One of the four execution strategies a cascade can escalate through.
///
/// The set is closed and the order is fixed: `Code -> Generative -> Agentic
/// -> Human`. Both are compile-time constants, never configured at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tier {
    Code,
    Generative,
    Agentic,
    Human,
}

impl Tier {
    /// Canonical tier order, bit-exact with the wire-level sequence
    /// `["code", "generative", "agentic", "human"]`.
    pub const ORDER: [Tier; 4] = [Tier::Code, Tier::Generative, Tier::Agentic, Tier::Human];

    /// Default timeout for this tier, in milliseconds.
    pub const fn default_timeout_ms(self) -> u64 {
        match self {
            Tier::Code => 5_000,
            Tier::Generative => 30_000,
            Tier::Agentic => 300_000,
            Tier::Human => 86_400_000,
        }
    }

    /// Wire-level tier name, as used in error messages and event labels.
    pub const fn as_str(self) -> &'static str {
        match self {
            Tier::Code => "code",
            Tier::Generative => "generative",
            Tier::Agentic => "agentic",
            Tier::Human => "human",
        }
    }

    /// This tier's position (0-based) in the canonical order.
    pub const fn position(self) -> usize {
        match self {
            Tier::Code => 0,
            Tier::Generative => 1,
            Tier::Agentic => 2,
            Tier::Human => 3,
        }
    }

    /// The ordered subsequence of `Tier::ORDER` starting at `self`, inclusive.
    pub fn from_here(self) -> impl Iterator<Item = Tier> {
        Tier::ORDER.into_iter().skip(self.position())
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
