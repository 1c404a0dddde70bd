use crate::models::{Availability, PageSnapshot};

/// How much weight a rule's verdict carries in the cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerdictStrength {
    /// May be replaced by a verdict from a later rule.
    Tentative,
    /// Ends the cascade; no later rule is consulted.
    Decisive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleVerdict {
    pub availability: Availability,
    pub strength: VerdictStrength,
}

impl RuleVerdict {
    pub fn tentative(availability: Availability) -> Self {
        Self {
            availability,
            strength: VerdictStrength::Tentative,
        }
    }

    pub fn decisive(availability: Availability) -> Self {
        Self {
            availability,
            strength: VerdictStrength::Decisive,
        }
    }

    pub fn is_decisive(&self) -> bool {
        self.strength == VerdictStrength::Decisive
    }
}

/// One stage of the availability classification cascade.
///
/// A rule returns `None` when it has nothing to say about the page, letting
/// the cascade move on with whatever verdict it already holds.
pub trait AvailabilityRule: Send + Sync {
    /// Plugin metadata
    fn name(&self) -> &str;

    fn evaluate(&self, page: &PageSnapshot) -> Option<RuleVerdict>;
}
