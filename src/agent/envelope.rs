use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::channel::Channel;
use crate::domain::email::Email;

/// Outer shape of every agent reply.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<AgentResponse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
}

impl AgentEnvelope {
    pub fn ok(result: Value) -> Self {
        Self {
            success: true,
            response: Some(AgentResponse {
                result: Some(result),
            }),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            response: None,
            error: Some(error.into()),
        }
    }

    /// Typed view of `response.result`; empty when absent.
    pub fn result(&self) -> AgentResult {
        self.response
            .as_ref()
            .and_then(|r| r.result.as_ref())
            .map(AgentResult::from_value)
            .unwrap_or_default()
    }

    /// Error text for a failed envelope, if the agent gave a non-empty one.
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref().filter(|e| !e.trim().is_empty())
    }
}

/// The fields an agent result may carry. The agent's JSON shape depends on
/// the instruction, so every field is optional and read on its own.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgentResult {
    /// `None` when `emails` is missing or not an array.
    pub emails: Option<Vec<Email>>,
    pub channels: Option<Vec<Channel>>,
    pub summary: Option<String>,
    pub email_count: Option<usize>,
    pub slack_channel_sent: Option<String>,
    pub timestamp: Option<String>,
}

impl AgentResult {
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(_) => Self {
                emails: read_array(value, "emails"),
                channels: read_array(value, "channels"),
                summary: read_string(value, "summary"),
                email_count: value
                    .get("emailCount")
                    .or_else(|| value.get("email_count"))
                    .and_then(Value::as_u64)
                    .map(|n| n as usize),
                slack_channel_sent: read_string(value, "slackChannelSent"),
                timestamp: read_string(value, "timestamp"),
            },
            // Some agents double-encode the result; plain prose is the summary.
            Value::String(s) => match serde_json::from_str::<Value>(s) {
                Ok(inner @ Value::Object(_)) => Self::from_value(&inner),
                _ => Self {
                    summary: Some(s.clone()),
                    ..Self::default()
                },
            },
            _ => Self::default(),
        }
    }
}

fn read_string(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Items that fail to deserialize are skipped rather than failing the list.
fn read_array<T: serde::de::DeserializeOwned>(value: &Value, key: &str) -> Option<Vec<T>> {
    let items = value.get(key)?.as_array()?;
    Some(
        items
            .iter()
            .filter_map(|item| match serde_json::from_value(item.clone()) {
                Ok(v) => Some(v),
                Err(e) => {
                    log::warn!("skipping malformed {key} entry: {e}");
                    None
                }
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_full_envelope() {
        let raw = r#"{
            "success": true,
            "response": {"result": {"summary": "ok", "emailCount": 3, "timestamp": "2026-01-01T00:00:00Z"}}
        }"#;
        let env: AgentEnvelope = serde_json::from_str(raw).unwrap();
        assert!(env.success);
        let r = env.result();
        assert_eq!(r.summary.as_deref(), Some("ok"));
        assert_eq!(r.email_count, Some(3));
        assert_eq!(r.timestamp.as_deref(), Some("2026-01-01T00:00:00Z"));
        assert_eq!(r.emails, None);
    }

    #[test]
    fn missing_response_is_empty_result() {
        let env: AgentEnvelope = serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert_eq!(env.result(), AgentResult::default());
    }

    #[test]
    fn emails_not_an_array_reads_as_none() {
        let r = AgentResult::from_value(&json!({"emails": "none today"}));
        assert_eq!(r.emails, None);
    }

    #[test]
    fn malformed_entries_are_skipped() {
        let r = AgentResult::from_value(&json!({
            "channels": [{"id": "C1", "name": "general"}, {"name": "no-id"}]
        }));
        let channels = r.channels.unwrap();
        assert_eq!(channels.len(), 1);
        assert_eq!(channels[0].id, "C1");
    }

    #[test]
    fn double_encoded_result() {
        let r = AgentResult::from_value(&json!("{\"summary\": \"inner\"}"));
        assert_eq!(r.summary.as_deref(), Some("inner"));

        let r = AgentResult::from_value(&json!("just prose"));
        assert_eq!(r.summary.as_deref(), Some("just prose"));
    }

    #[test]
    fn blank_error_is_ignored() {
        assert_eq!(AgentEnvelope::failed("  ").error_message(), None);
        assert_eq!(AgentEnvelope::failed("quota").error_message(), Some("quota"));
    }
}
