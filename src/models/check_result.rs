use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Availability, CheckStatus, Product};

/// Outcome of checking one product in one cycle. Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckResult {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub available: Availability,
    pub status: CheckStatus,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CheckResult {
    pub fn classified(product: &Product, availability: Availability) -> Self {
        Self {
            name: product.name.clone(),
            url: product.url.clone(),
            available: availability,
            status: availability.into(),
            timestamp: Utc::now(),
            error: None,
        }
    }

    pub fn failed(product: &Product, error: impl Into<String>) -> Self {
        Self {
            name: product.name.clone(),
            url: product.url.clone(),
            available: Availability::Unknown,
            status: CheckStatus::Error,
            timestamp: Utc::now(),
            error: Some(error.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.status == CheckStatus::Error
    }
}

/// Results of one check cycle, in configured product order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckBatch {
    pub check_time: DateTime<Utc>,
    pub results: Vec<CheckResult>,
}

impl CheckBatch {
    pub fn new(results: Vec<CheckResult>) -> Self {
        Self {
            check_time: Utc::now(),
            results,
        }
    }

    pub fn has_errors(&self) -> bool {
        self.results.iter().any(CheckResult::is_error)
    }
}
