use crate::models::{Availability, ButtonDescriptor, Cursor, PageSnapshot};
use crate::plugins::traits::{AvailabilityRule, RuleVerdict};

const SOLD_OUT_MARKER: &str = "sold out";
const PURCHASE_MARKERS: [&str; 2] = ["add to", "cart"];

/// Reads the state of the page's buttons, in document order.
///
/// The first button whose text mentions a sold-out or purchase marker decides
/// the verdict. A purchase button rendered with a `not-allowed` cursor counts
/// as sold out. Buttons without either marker are skipped, whatever their cursor.
#[derive(Debug, Default)]
pub struct ButtonRule;

impl ButtonRule {
    pub fn new() -> Self {
        Self
    }

    fn judge(button: &ButtonDescriptor) -> Option<Availability> {
        if button.text.contains(SOLD_OUT_MARKER) {
            return Some(Availability::SoldOut);
        }

        if PURCHASE_MARKERS.iter().any(|marker| button.text.contains(marker)) {
            return match button.cursor {
                Some(Cursor::NotAllowed) => Some(Availability::SoldOut),
                _ => Some(Availability::Available),
            };
        }

        None
    }
}

impl AvailabilityRule for ButtonRule {
    fn name(&self) -> &str {
        "button"
    }

    fn evaluate(&self, page: &PageSnapshot) -> Option<RuleVerdict> {
        page.buttons
            .iter()
            .find_map(Self::judge)
            .map(RuleVerdict::decisive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn page_with(buttons: Vec<ButtonDescriptor>) -> PageSnapshot {
        PageSnapshot::new("", buttons)
    }

    #[rstest]
    #[case("Sold out", None, Some(Availability::SoldOut))]
    #[case("Add to cart", None, Some(Availability::Available))]
    #[case("View cart", Some(Cursor::Pointer), Some(Availability::Available))]
    #[case("Add to cart", Some(Cursor::NotAllowed), Some(Availability::SoldOut))]
    #[case("Configure", Some(Cursor::NotAllowed), None)]
    #[case("Login", None, None)]
    fn test_single_button(
        #[case] text: &str,
        #[case] cursor: Option<Cursor>,
        #[case] expected: Option<Availability>,
    ) {
        let rule = ButtonRule::new();
        let verdict = rule.evaluate(&page_with(vec![ButtonDescriptor::new(text, cursor)]));
        assert_eq!(verdict.map(|v| v.availability), expected);
    }

    #[test]
    fn test_first_matching_button_wins() {
        let rule = ButtonRule::new();
        let page = page_with(vec![
            ButtonDescriptor::new("Login", None),
            ButtonDescriptor::new("Sold out", None),
            ButtonDescriptor::new("Add to cart", None),
        ]);
        let verdict = rule.evaluate(&page).unwrap();
        assert_eq!(verdict.availability, Availability::SoldOut);
        assert!(verdict.is_decisive());
    }

    #[test]
    fn test_no_buttons_means_no_verdict() {
        assert!(ButtonRule::new().evaluate(&PageSnapshot::default()).is_none());
    }
}
