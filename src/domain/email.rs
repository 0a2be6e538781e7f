use serde::{Deserialize, Serialize};

use crate::mail::decoders::{decode_mime_words, normalize_snippet};

pub type EmailId = String;

/// Snippets longer than this are cut when an email is ingested.
pub const SNIPPET_MAX_CHARS: usize = 240;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Email {
    #[serde(deserialize_with = "super::string_or_number")]
    pub id: EmailId,
    #[serde(default)]
    pub sender_name: String,
    #[serde(default)]
    pub sender_email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub snippet: String,
    /// ISO-8601 date as reported by the agent.
    #[serde(default)]
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl Email {
    /// Decode encoded-word headers and flatten the snippet to one line.
    pub fn normalized(mut self) -> Self {
        self.subject = decode_mime_words(self.subject.as_bytes());
        self.sender_name = decode_mime_words(self.sender_name.as_bytes());
        self.snippet = normalize_snippet(&self.snippet, SNIPPET_MAX_CHARS);
        self
    }

    /// Plain-text block embedded in the summary instruction.
    pub fn instruction_block(&self) -> String {
        format!(
            "Subject: {}\nFrom: {} ({})\nSnippet: {}",
            self.subject, self.sender_name, self.sender_email, self.snippet
        )
    }
}
