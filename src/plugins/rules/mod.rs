pub mod page_text;
pub mod button;

pub use page_text::PageTextRule;
pub use button::ButtonRule;
