use serde::{Deserialize, Serialize};

use crate::models::{Availability, CheckResult};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Transition {
    BecameAvailable,
    BecameUnavailable,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductChange {
    pub name: String,
    /// Availability in the previous batch; `None` when the product was not in it.
    pub previous: Option<Availability>,
    pub current: Availability,
    pub transition: Option<Transition>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChangeReport {
    pub changes: Vec<ProductChange>,
    pub any_available: bool,
    pub changes_detected: bool,
}

impl ChangeReport {
    /// Notify when something can be bought now, or when anything flipped.
    pub fn should_notify(&self) -> bool {
        self.any_available || self.changes_detected
    }

    pub fn transition_for(&self, name: &str) -> Option<Transition> {
        self.changes
            .iter()
            .find(|change| change.name == name)
            .and_then(|change| change.transition)
    }
}

/// Compare a batch against the previous one, matching products by name.
///
/// `previous` is `None` on the very first run; no product then has a
/// transition, but `any_available` still reflects the current results.
pub fn detect_changes(previous: Option<&[CheckResult]>, current: &[CheckResult]) -> ChangeReport {
    let changes: Vec<ProductChange> = current
        .iter()
        .map(|result| {
            let previous_availability = previous.and_then(|prev| {
                prev.iter()
                    .find(|p| p.name == result.name)
                    .map(|p| p.available)
            });
            ProductChange {
                name: result.name.clone(),
                previous: previous_availability,
                current: result.available,
                transition: previous_availability
                    .and_then(|before| transition(before, result.available)),
            }
        })
        .collect();

    let any_available = current.iter().any(|result| result.available.is_available());
    let changes_detected = changes.iter().any(|change| change.transition.is_some());

    ChangeReport {
        changes,
        any_available,
        changes_detected,
    }
}

/// Unknown counts as "not available" on the way up, but a drop to Unknown
/// (for instance a failed fetch) is not reported as going out of stock.
fn transition(before: Availability, after: Availability) -> Option<Transition> {
    match (before, after) {
        (Availability::Available, Availability::Available) => None,
        (_, Availability::Available) => Some(Transition::BecameAvailable),
        (Availability::Available, Availability::SoldOut) => Some(Transition::BecameUnavailable),
        _ => None,
    }
}
