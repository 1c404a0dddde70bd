use chrono::{DateTime, Utc};

use crate::change_detector::{ChangeReport, Transition};
use crate::models::CheckResult;

/// Render a batch as a Telegram HTML message. Pure presentation, no I/O.
pub fn format_report(results: &[CheckResult], report: &ChangeReport, now: DateTime<Utc>) -> String {
    let mut message = String::from("🔍 <b>Stock Availability Check</b>\n");
    message.push_str(&format!("📅 {}\n\n", now.format("%Y-%m-%d %H:%M:%S UTC")));

    for result in results {
        let annotation = match report.transition_for(&result.name) {
            Some(Transition::BecameAvailable) => " 🆕 <b>NOW AVAILABLE!</b>",
            Some(Transition::BecameUnavailable) => " ⚠️ Sold out again",
            None => "",
        };

        message.push_str(&format!(
            "{} <b>{}</b>: {}{}\n",
            result.available.glyph(),
            escape_html(&result.name),
            result.status,
            annotation
        ));

        if result.available.is_available() {
            message.push_str(&format!(
                "   🔗 <a href='{}'>Order now!</a>\n",
                escape_html(&result.url)
            ));
        }

        message.push('\n');
    }

    if report.any_available {
        message.push_str("🚀 <b>ACTION REQUIRED: products available!</b>");
    } else if report.changes_detected {
        message.push_str("ℹ️ Status change detected");
    }

    message
}

/// One line per product, used for the run summary in the logs.
pub fn summary_lines(results: &[CheckResult]) -> Vec<String> {
    results
        .iter()
        .map(|result| match &result.error {
            Some(error) => format!(
                "{} {}: {} ({})",
                result.available.glyph(),
                result.name,
                result.status,
                error
            ),
            None => format!("{} {}: {}", result.available.glyph(), result.name, result.status),
        })
        .collect()
}

/// Escape the characters Telegram's HTML parse mode treats as markup.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('\'', "&#39;")
        .replace('"', "&quot;")
}
