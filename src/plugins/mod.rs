pub mod traits;
pub mod rules;
pub mod notifiers;

pub use traits::{AvailabilityRule, NotifierPlugin, UpdateSource};
