use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use rs_mail_digest::agent::{AgentClient, HttpAgentClient};
use rs_mail_digest::auth::key_store;
use rs_mail_digest::config::{Config, load_config};
use rs_mail_digest::render::plain::to_plain_text;
use rs_mail_digest::render::time::format_timestamp;
use rs_mail_digest::session::Session;
use rs_mail_digest::terminal::form::compose_request;
use rs_mail_digest::terminal::state::AppState;
use rs_mail_digest::terminal::{TuiOptions, run_tui};

#[derive(Parser)]
#[command(name = "rs_mail_digest")]
#[command(about = "Summarize recent email into a Slack channel via an AI agent", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the TUI dashboard
    Tui {
        /// Start with the built-in sample inbox and channels
        #[arg(long)]
        sample: bool,

        /// Open the compose form instead of the browser
        #[arg(long)]
        compose: bool,
    },

    /// Fetch the latest emails and send their summary to a channel
    Send {
        /// Channel name or id (defaults to default_channel from config)
        #[arg(long)]
        channel: Option<String>,

        /// How many emails to summarize (defaults to email_count from config)
        #[arg(long)]
        count: Option<usize>,

        /// Summarize the sample inbox instead of fetching
        #[arg(long)]
        sample: bool,
    },

    /// Render a markdown summary file (or stdin) as plain text
    Render { file: Option<PathBuf> },

    /// Store the agent API key in keyring
    SetApiKey {
        /// Agent id the key belongs to (defaults to agent_id from config)
        #[arg(long)]
        agent_id: Option<String>,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.cmd {
        Command::Render { file } => {
            let text = match file {
                Some(path) => std::fs::read_to_string(&path)
                    .map_err(|e| anyhow!("cannot read {}: {e}", path.display()))?,
                None => {
                    let mut s = String::new();
                    std::io::stdin().read_to_string(&mut s)?;
                    s
                }
            };
            println!("{}", to_plain_text(&text));
            Ok(())
        }

        Command::SetApiKey { agent_id } => {
            let agent_id = match agent_id {
                Some(id) => id,
                None => load_config()
                    .map_err(|e| anyhow!("Configuration error: {e}"))?
                    .agent_id,
            };
            eprintln!("Paste API key (end with Ctrl-D):");
            let mut key = String::new();
            std::io::stdin().read_to_string(&mut key)?;
            key_store::save_api_key(&agent_id, key.trim())?;
            println!("Saved API key for agent {}", agent_id);
            Ok(())
        }

        Command::Tui { sample, compose } => {
            let cfg = load_config().map_err(|e| anyhow!("Configuration error: {e}"))?;
            let client = agent_client(&cfg)?;

            let mut session = Session::new(cfg.agent_id.clone(), cfg.email_count);
            if sample {
                session.set_sample_mode(true);
            }
            let state = AppState::new(session, cfg.default_channel.as_deref());

            run_tui(
                state,
                client,
                TuiOptions {
                    compose,
                    notify: cfg.notify,
                },
            )
        }

        Command::Send {
            channel,
            count,
            sample,
        } => {
            let cfg = load_config().map_err(|e| anyhow!("Configuration error: {e}"))?;
            let channel = channel
                .or_else(|| cfg.default_channel.clone())
                .ok_or_else(|| anyhow!("no --channel given and default_channel not set in config"))?;
            let req = compose_request(&channel, count.unwrap_or(cfg.email_count))
                .map_err(|e| anyhow!(e))?;
            let client = agent_client(&cfg)?;

            let mut session = Session::new(cfg.agent_id.clone(), req.count);
            if sample {
                session.set_sample_mode(true);
            } else {
                eprintln!("Fetching the last {} emails...", req.count);
                session.fetch_emails(client.as_ref())?;
            }
            session.select_first_emails(req.count);
            session.use_channel(&req.channel);

            eprintln!(
                "Summarizing {} emails for #{}...",
                session.selection().len(),
                req.channel
            );
            let result = session.send_summary(client.as_ref())?;

            println!(
                "Sent to {} · {} emails · {}",
                result.channel_sent.as_deref().unwrap_or("#?"),
                result.email_count.unwrap_or(0),
                format_timestamp(result.timestamp.as_deref())
            );
            println!();
            println!("{}", to_plain_text(result.text()));
            Ok(())
        }
    }
}

fn agent_client(cfg: &Config) -> Result<Arc<dyn AgentClient>> {
    let api_key = key_store::resolve_api_key(&cfg.agent_id);
    Ok(Arc::new(HttpAgentClient::from_config(cfg, api_key)?))
}
