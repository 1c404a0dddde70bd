use serde::{Deserialize, Serialize};
use std::fmt;

pub mod check_result;
pub mod page;
pub mod product;

// Re-exports for convenience
pub use check_result::*;
pub use page::*;
pub use product::*;

/// Tri-state availability of a product.
///
/// Persisted as `true` / `false` / `null` so existing JSON logs stay readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<bool>", into = "Option<bool>")]
pub enum Availability {
    Available,
    SoldOut,
    #[default]
    Unknown,
}

impl Availability {
    pub fn is_available(self) -> bool {
        self == Availability::Available
    }

    /// Status glyph used in notifications and run summaries.
    pub fn glyph(self) -> &'static str {
        match self {
            Availability::Available => "✅",
            Availability::SoldOut => "❌",
            Availability::Unknown => "❓",
        }
    }
}

impl From<Option<bool>> for Availability {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(true) => Availability::Available,
            Some(false) => Availability::SoldOut,
            None => Availability::Unknown,
        }
    }
}

impl From<Availability> for Option<bool> {
    fn from(value: Availability) -> Self {
        match value {
            Availability::Available => Some(true),
            Availability::SoldOut => Some(false),
            Availability::Unknown => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckStatus {
    #[serde(rename = "AVAILABLE")]
    Available,
    #[serde(rename = "SOLD OUT")]
    SoldOut,
    #[serde(rename = "UNKNOWN")]
    Unknown,
    #[serde(rename = "ERROR")]
    Error,
}

impl CheckStatus {
    pub fn label(self) -> &'static str {
        match self {
            CheckStatus::Available => "AVAILABLE",
            CheckStatus::SoldOut => "SOLD OUT",
            CheckStatus::Unknown => "UNKNOWN",
            CheckStatus::Error => "ERROR",
        }
    }
}

impl From<Availability> for CheckStatus {
    fn from(value: Availability) -> Self {
        match value {
            Availability::Available => CheckStatus::Available,
            Availability::SoldOut => CheckStatus::SoldOut,
            Availability::Unknown => CheckStatus::Unknown,
        }
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
