use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_AGENT_ID: &str = "698e14057d01c601c90dc833";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    pub agent_endpoint: String,
    #[serde(default = "default_agent_id")]
    pub agent_id: String,
    /// How many emails "fetch" asks the agent for.
    #[serde(default = "default_email_count")]
    pub email_count: usize,
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    pub default_channel: Option<String>,
    #[serde(default)]
    pub notify: bool,
}

fn default_agent_id() -> String {
    DEFAULT_AGENT_ID.to_string()
}

fn default_email_count() -> usize {
    10
}

fn default_timeout() -> u64 {
    120
}

impl Default for Config {
    fn default() -> Self {
        Self {
            agent_endpoint: "https://agent.example.com/v1/invoke".to_string(),
            agent_id: default_agent_id(),
            email_count: default_email_count(),
            request_timeout_secs: default_timeout(),
            default_channel: None,
            notify: false,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.agent_endpoint)
            .map_err(|e| anyhow!("Invalid agent_endpoint '{}': {e}", self.agent_endpoint))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(anyhow!(
                "agent_endpoint must be http(s): {}",
                self.agent_endpoint
            ));
        }
        if self.agent_id.trim().is_empty() {
            return Err(anyhow!("agent_id must not be empty"));
        }
        if self.email_count == 0 {
            return Err(anyhow!("email_count must be at least 1"));
        }
        Ok(())
    }
}

fn config_dir() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .ok_or_else(|| anyhow!("no config dir available"))?
        .join("rs_mail_digest"))
}

pub fn config_path() -> Result<PathBuf> {
    let mut p = config_dir()?;
    fs::create_dir_all(&p)?;
    p.push("config.toml");
    Ok(p)
}

pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

/// Read the config at `path`, writing a template there (and failing) on first run.
pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        // create a template config for users to edit
        let tom = toml::to_string_pretty(&Config::default())?;
        fs::write(path, tom)?;
        return Err(anyhow!(
            "Created template config at {} — edit it and run again",
            path.display()
        ));
    }
    let s = fs::read_to_string(path)?;
    let cfg: Config = toml::from_str(&s)?;
    cfg.validate()?;
    Ok(cfg)
}
