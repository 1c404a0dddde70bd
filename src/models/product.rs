use serde::{Deserialize, Serialize};
use validator::Validate;

/// A product page to watch. Configured at startup and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq, Eq)]
pub struct Product {
    #[validate(length(min = 1, message = "Product name must not be empty"))]
    pub name: String,
    #[validate(url(message = "Product url must be a valid URL"))]
    pub url: String,
}

impl Product {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}
