pub mod envelope;
pub mod http;
pub mod instructions;

use anyhow::Result;

pub use envelope::{AgentEnvelope, AgentResult};
pub use http::HttpAgentClient;

/// The one external boundary: a natural-language instruction in, a JSON
/// envelope out.
pub trait AgentClient: Send + Sync {
    fn invoke(&self, instruction: &str, agent_id: &str) -> Result<AgentEnvelope>;
}
