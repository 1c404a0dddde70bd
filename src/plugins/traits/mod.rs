pub mod rule;
pub mod notifier;
pub mod updates;

pub use rule::{AvailabilityRule, RuleVerdict, VerdictStrength};
pub use notifier::{NotifierPlugin, NotificationResult};
pub use updates::{UpdateSource, Update, IncomingMessage, Chat};
