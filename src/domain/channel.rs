use serde::{Deserialize, Serialize};

pub type ChannelId = String;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    #[serde(deserialize_with = "super::string_or_number")]
    pub id: ChannelId,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_private: Option<bool>,
}

impl Channel {
    pub fn is_private(&self) -> bool {
        self.is_private.unwrap_or(false)
    }
}

/// `#name` for a known channel, `#id` when the channel isn't loaded (or has no name).
pub fn channel_label(channel: Option<&Channel>, id: &str) -> String {
    match channel {
        Some(c) if !c.name.is_empty() => format!("#{}", c.name),
        _ => format!("#{id}"),
    }
}
