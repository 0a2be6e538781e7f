use serde::{Deserialize, Serialize};

/// Summary text longer than this starts collapsed in the preview.
pub const COLLAPSE_THRESHOLD: usize = 200;

/// What the UI shows after a summary was delivered. Every field is
/// optional because the agent may leave any of them out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryResult {
    pub summary: Option<String>,
    pub email_count: Option<usize>,
    pub channel_sent: Option<String>,
    /// RFC 3339 timestamp.
    pub timestamp: Option<String>,
}

impl SummaryResult {
    pub fn text(&self) -> &str {
        self.summary.as_deref().unwrap_or("")
    }

    pub fn is_long(&self) -> bool {
        self.text().chars().count() > COLLAPSE_THRESHOLD
    }
}
