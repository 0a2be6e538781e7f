use anyhow::{Result, anyhow};
use keyring::{Entry, Error as KeyringError};

const SERVICE: &str = "rs_mail_digest";

pub const API_KEY_ENV: &str = "RS_MAIL_DIGEST_API_KEY";

/// Save the agent API key into the OS keyring, keyed by agent id
pub fn save_api_key(agent_id: &str, api_key: &str) -> Result<()> {
    let entry = Entry::new(SERVICE, agent_id);
    entry?
        .set_password(api_key)
        .map_err(|e| anyhow!(e.to_string()))?;
    Ok(())
}

/// Load the agent API key from the keyring
pub fn load_api_key(agent_id: &str) -> Result<Option<String>> {
    let entry = Entry::new(SERVICE, agent_id);
    match entry?.get_password() {
        Ok(v) => Ok(Some(v)),
        Err(KeyringError::NoEntry) => Ok(None),
        Err(e) => Err(anyhow!(e.to_string())),
    }
}

/// Keyring first, then the environment. A keyring that can't be reached
/// is not fatal; the agent may not need a key at all.
pub fn resolve_api_key(agent_id: &str) -> Option<String> {
    let from_keyring = match load_api_key(agent_id) {
        Ok(k) => k,
        Err(e) => {
            log::warn!("keyring unavailable: {e}");
            None
        }
    };
    from_keyring
        .or_else(|| std::env::var(API_KEY_ENV).ok())
        .filter(|k| !k.trim().is_empty())
}
