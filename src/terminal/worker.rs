use anyhow::Result;
use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread;

use crate::agent::{AgentClient, AgentEnvelope};
use crate::session::{AgentCall, SummaryRequest};

/// Work handed to a background thread.
pub enum Job {
    Emails(AgentCall),
    Channels(AgentCall),
    Summary(SummaryRequest),
}

/// What comes back to the UI loop.
pub enum Outcome {
    Emails(AgentCall, Result<AgentEnvelope>),
    Channels(AgentCall, Result<AgentEnvelope>),
    Summary(SummaryRequest, Result<AgentEnvelope>),
}

#[derive(Clone)]
pub struct Dispatcher {
    client: Arc<dyn AgentClient>,
    tx: Sender<Outcome>,
}

impl Dispatcher {
    pub fn new(client: Arc<dyn AgentClient>, tx: Sender<Outcome>) -> Self {
        Self { client, tx }
    }

    /// Run `job` on its own thread. Jobs are independent and may overlap.
    pub fn dispatch(&self, job: Job) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        thread::spawn(move || {
            let outcome = match job {
                Job::Emails(call) => {
                    let res = call.run(client.as_ref());
                    Outcome::Emails(call, res)
                }
                Job::Channels(call) => {
                    let res = call.run(client.as_ref());
                    Outcome::Channels(call, res)
                }
                Job::Summary(req) => {
                    let res = req.call.run(client.as_ref());
                    Outcome::Summary(req, res)
                }
            };
            // the UI may already be gone
            let _ = tx.send(outcome);
        });
    }
}
