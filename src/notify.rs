use notify_rust::{Hint, Notification};

use crate::domain::summary::SummaryResult;

/// Desktop notification after a summary was delivered. Failures are only
/// logged; the summary itself already went out.
pub fn notify_delivered(result: &SummaryResult) {
    let channel = result.channel_sent.as_deref().unwrap_or("Slack");
    let count = result.email_count.unwrap_or(0);
    let preview: String = result
        .text()
        .lines()
        .find(|l| !l.trim().is_empty())
        .unwrap_or("")
        .chars()
        .take(120)
        .collect();

    let mut n = Notification::new();
    n.summary(&format!("Summary of {count} emails sent to {channel}"))
        .body(&preview)
        .hint(Hint::Category("im".to_string()));

    if let Err(e) = n.show() {
        log::warn!("notification error: {e}");
    }
}
