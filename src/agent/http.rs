use anyhow::{Result, anyhow};
use reqwest::blocking::Client;
use serde::Serialize;
use std::time::Duration;

use crate::agent::{AgentClient, AgentEnvelope};
use crate::config::Config;

#[derive(Debug, Serialize)]
struct AgentRequest<'a> {
    message: &'a str,
    agent_id: &'a str,
}

/// Agent reached over HTTP: `POST {endpoint}` with `{message, agent_id}`.
pub struct HttpAgentClient {
    endpoint: String,
    api_key: Option<String>,
    http: Client,
}

impl HttpAgentClient {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow!("failed to build HTTP client: {e}"))?;
        Ok(Self {
            endpoint: endpoint.into(),
            api_key,
            http,
        })
    }

    pub fn from_config(cfg: &Config, api_key: Option<String>) -> Result<Self> {
        Self::new(
            cfg.agent_endpoint.clone(),
            api_key,
            Duration::from_secs(cfg.request_timeout_secs),
        )
    }
}

impl AgentClient for HttpAgentClient {
    fn invoke(&self, instruction: &str, agent_id: &str) -> Result<AgentEnvelope> {
        log::debug!(
            "invoking agent {agent_id} at {} ({} bytes)",
            self.endpoint,
            instruction.len()
        );

        let mut req = self.http.post(&self.endpoint).json(&AgentRequest {
            message: instruction,
            agent_id,
        });
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        let resp = req.send()?;
        let status = resp.status();
        let body = resp.text()?;

        match serde_json::from_str::<AgentEnvelope>(&body) {
            Ok(envelope) => {
                if !status.is_success() {
                    log::warn!("agent returned {status} with an envelope");
                }
                Ok(envelope)
            }
            Err(_) if !status.is_success() => Err(anyhow!(
                "agent request failed: {}",
                status.canonical_reason().unwrap_or(status.as_str())
            )),
            Err(e) => Err(anyhow!("invalid agent response: {e}")),
        }
    }
}
