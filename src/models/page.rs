use serde::{Deserialize, Serialize};

/// CSS cursor reported for a rendered button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cursor {
    Pointer,
    Default,
    NotAllowed,
    Other(String),
}

impl Cursor {
    pub fn from_css(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "pointer" => Cursor::Pointer,
            "default" | "auto" => Cursor::Default,
            "not-allowed" => Cursor::NotAllowed,
            other => Cursor::Other(other.to_string()),
        }
    }
}

/// An interactive element discovered on the page, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonDescriptor {
    pub text: String,
    pub cursor: Option<Cursor>,
}

impl ButtonDescriptor {
    pub fn new(text: &str, cursor: Option<Cursor>) -> Self {
        Self {
            text: normalize(text),
            cursor,
        }
    }
}

/// Normalized view of a fetched page, the input of the classifier.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PageSnapshot {
    pub text: String,
    pub buttons: Vec<ButtonDescriptor>,
}

impl PageSnapshot {
    pub fn new(text: &str, buttons: Vec<ButtonDescriptor>) -> Self {
        Self {
            text: normalize(text),
            buttons,
        }
    }

    pub fn text_only(text: &str) -> Self {
        Self::new(text, Vec::new())
    }
}

/// Lower-cases and collapses whitespace so phrases split across text nodes still match.
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
