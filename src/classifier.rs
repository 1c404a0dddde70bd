use crate::models::{Availability, PageSnapshot};
use crate::plugins::rules::{ButtonRule, PageTextRule};
use crate::plugins::traits::{AvailabilityRule, RuleVerdict};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub availability: Availability,
    /// Name of the rule whose verdict stood, if any rule spoke.
    pub decided_by: Option<String>,
}

/// Runs an ordered cascade of [`AvailabilityRule`]s over a page.
///
/// Rules are consulted in order. A verdict replaces the one held so far only
/// while that one is tentative; the first decisive verdict ends the cascade.
/// A page no rule has an opinion on is `Unknown`.
pub struct AvailabilityClassifier {
    rules: Vec<Box<dyn AvailabilityRule>>,
}

impl Default for AvailabilityClassifier {
    fn default() -> Self {
        Self::with_default_rules()
    }
}

impl AvailabilityClassifier {
    pub fn new(rules: Vec<Box<dyn AvailabilityRule>>) -> Self {
        Self { rules }
    }

    /// Page text first, then button state.
    pub fn with_default_rules() -> Self {
        Self::new(vec![Box::new(PageTextRule::new()), Box::new(ButtonRule::new())])
    }

    pub fn classify(&self, page: &PageSnapshot) -> Classification {
        let mut standing: Option<(RuleVerdict, &str)> = None;

        for rule in &self.rules {
            if matches!(standing, Some((verdict, _)) if verdict.is_decisive()) {
                break;
            }

            if let Some(verdict) = rule.evaluate(page) {
                tracing::debug!(
                    "Rule {} returned {:?} ({:?})",
                    rule.name(),
                    verdict.availability,
                    verdict.strength
                );
                standing = Some((verdict, rule.name()));
            }
        }

        match standing {
            Some((verdict, rule)) => Classification {
                availability: verdict.availability,
                decided_by: Some(rule.to_string()),
            },
            None => Classification {
                availability: Availability::Unknown,
                decided_by: None,
            },
        }
    }
}
