use crate::domain::email::Email;

pub const SUMMARY_SEPARATOR: &str = "\n\n---\n\n";

pub fn fetch_emails(count: usize) -> String {
    format!(
        "Fetch my last {count} emails from Gmail. Return them in a structured format with sender name, sender email, subject, snippet, date, and email ID."
    )
}

pub fn fetch_channels() -> String {
    "Fetch all my Slack channels. Return them with channel name, ID, member count, and whether they are private.".to_string()
}

/// `channel` is the bare name (or id) without the leading `#`.
pub fn summarize<'a>(emails: impl IntoIterator<Item = &'a Email>, channel: &str) -> String {
    let blocks: Vec<String> = emails.into_iter().map(Email::instruction_block).collect();
    format!(
        "Generate a concise summary of these {} emails and send it to Slack channel #{}:\n\n{}",
        blocks.len(),
        channel,
        blocks.join(SUMMARY_SEPARATOR)
    )
}
