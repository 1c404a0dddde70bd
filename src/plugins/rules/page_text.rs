use crate::models::{Availability, PageSnapshot};
use crate::plugins::traits::{AvailabilityRule, RuleVerdict};

/// Scans the full page text for sold-out and purchase phrases.
///
/// Sold-out phrases are checked first, so a page mentioning both resolves to
/// sold out. The verdict is tentative: button state can still overturn it.
pub struct PageTextRule {
    sold_out_phrases: Vec<String>,
    purchase_phrases: Vec<String>,
}

impl Default for PageTextRule {
    fn default() -> Self {
        Self::new()
    }
}

impl PageTextRule {
    pub fn new() -> Self {
        Self::with_phrases(
            &["sold out", "product is sold out"],
            &["add to shopping cart", "add to cart", "order now"],
        )
    }

    pub fn with_phrases(sold_out: &[&str], purchase: &[&str]) -> Self {
        Self {
            sold_out_phrases: sold_out.iter().map(|p| p.to_lowercase()).collect(),
            purchase_phrases: purchase.iter().map(|p| p.to_lowercase()).collect(),
        }
    }

    fn mentions_any(text: &str, phrases: &[String]) -> bool {
        phrases.iter().any(|phrase| text.contains(phrase.as_str()))
    }
}

impl AvailabilityRule for PageTextRule {
    fn name(&self) -> &str {
        "page_text"
    }

    fn evaluate(&self, page: &PageSnapshot) -> Option<RuleVerdict> {
        if Self::mentions_any(&page.text, &self.sold_out_phrases) {
            Some(RuleVerdict::tentative(Availability::SoldOut))
        } else if Self::mentions_any(&page.text, &self.purchase_phrases) {
            Some(RuleVerdict::tentative(Availability::Available))
        } else {
            None
        }
    }
}
