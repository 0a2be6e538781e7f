//! Selection and request orchestration shared by both screens.
//!
//! Each agent operation is split into `begin_*` (validate, mark pending,
//! build the call) and `apply_*` (interpret the envelope). The TUI runs the
//! call itself on a worker thread; the blocking helpers at the bottom chain
//! the three steps for the CLI and tests.

pub mod error;
pub mod narration;
pub mod sample;
pub mod selection;

use anyhow::Result;
use chrono::{SecondsFormat, Utc};

use crate::agent::{AgentClient, AgentEnvelope, AgentResult, instructions};
use crate::domain::channel::{Channel, channel_label};
use crate::domain::email::{Email, EmailId};
use crate::domain::summary::SummaryResult;

pub use error::{DigestError, ValidationError};
pub use selection::Selection;

const EMAILS_FAILED: &str = "Failed to fetch emails";
const CHANNELS_FAILED: &str = "Failed to fetch channels";
const SUMMARY_FAILED: &str = "Failed to generate and send summary";
const UNEXPECTED: &str = "An unexpected error occurred";

/// One instruction for the agent, ready to run on any thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentCall {
    pub instruction: String,
    pub agent_id: String,
    /// Data-source generation the call was issued under.
    pub generation: u64,
}

impl AgentCall {
    pub fn run(&self, client: &dyn AgentClient) -> Result<AgentEnvelope> {
        client.invoke(&self.instruction, &self.agent_id)
    }
}

/// A validated summary request and the local facts used to fill gaps in
/// the agent's answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRequest {
    pub call: AgentCall,
    pub selected_count: usize,
    /// `#name`, or `#id` for a channel without a name.
    pub channel_label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Pending,
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    agent_id: String,
    fetch_count: usize,

    emails: Vec<Email>,
    channels: Vec<Channel>,
    selection: Selection,

    pub last_summary: Option<SummaryResult>,
    pub summary_expanded: bool,
    sample_mode: bool,
    /// Bumped whenever sample mode flips; older outcomes are discarded.
    generation: u64,

    emails_phase: Phase,
    channels_phase: Phase,
    send_phase: Phase,

    pub emails_error: Option<DigestError>,
    pub channels_error: Option<DigestError>,
    pub send_error: Option<DigestError>,
}

impl Session {
    pub fn new(agent_id: impl Into<String>, fetch_count: usize) -> Self {
        Self {
            agent_id: agent_id.into(),
            fetch_count,
            ..Self::default()
        }
    }

    pub fn emails(&self) -> &[Email] {
        &self.emails
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn sample_mode(&self) -> bool {
        self.sample_mode
    }

    pub fn fetch_count(&self) -> usize {
        self.fetch_count
    }

    pub fn emails_pending(&self) -> bool {
        self.emails_phase == Phase::Pending
    }

    pub fn channels_pending(&self) -> bool {
        self.channels_phase == Phase::Pending
    }

    pub fn send_pending(&self) -> bool {
        self.send_phase == Phase::Pending
    }

    pub fn channel(&self, id: &str) -> Option<&Channel> {
        self.channels.iter().find(|c| c.id == id)
    }

    pub fn selected_channel(&self) -> Option<&Channel> {
        self.selection.channel_id().and_then(|id| self.channel(id))
    }

    /// Selected emails in the order they were loaded.
    pub fn selected_emails(&self) -> Vec<&Email> {
        self.emails
            .iter()
            .filter(|e| self.selection.contains(&e.id))
            .collect()
    }

    // ----- selection -----

    pub fn toggle_email(&mut self, id: &str) {
        if self.emails.iter().any(|e| e.id == id) {
            self.selection.toggle(id);
        }
    }

    pub fn toggle_all_emails(&mut self) {
        let ids = self.loaded_ids();
        self.selection.toggle_all(&ids);
    }

    pub fn select_all_emails(&mut self) {
        let ids = self.loaded_ids();
        self.selection.set_emails(&ids);
    }

    /// Select the first `count` loaded emails, dropping any other choice.
    pub fn select_first_emails(&mut self, count: usize) {
        let ids: Vec<EmailId> = self.loaded_ids().into_iter().take(count).collect();
        self.selection.set_emails(&ids);
    }

    pub fn select_channel(&mut self, id: &str) {
        if id.is_empty() || self.channel(id).is_some() {
            self.selection.select_channel(id);
        }
    }

    /// Select a channel typed by the user: matched by id or name (with or
    /// without `#`), otherwise registered as a channel of that name.
    pub fn use_channel(&mut self, typed: &str) -> Option<&Channel> {
        let wanted = typed.trim().trim_start_matches('#');
        if wanted.is_empty() {
            self.selection.select_channel("");
            return None;
        }

        let id = match self
            .channels
            .iter()
            .find(|c| c.id == wanted || c.name == wanted)
        {
            Some(c) => c.id.clone(),
            None => {
                self.channels.push(Channel {
                    id: wanted.to_string(),
                    name: wanted.to_string(),
                    member_count: None,
                    is_private: None,
                });
                wanted.to_string()
            }
        };
        self.selection.select_channel(&id);
        self.channel(&id)
    }

    /// Inline hint under the send button, `None` when sending is allowed.
    pub fn validation_hint(&self) -> Option<ValidationError> {
        match (self.selection.is_empty(), self.selection.channel_id().is_none()) {
            (true, true) => Some(ValidationError::NothingSelected),
            (true, false) => Some(ValidationError::NoEmails),
            (false, true) => Some(ValidationError::NoChannel),
            (false, false) => None,
        }
    }

    pub fn can_send(&self) -> bool {
        self.validation_hint().is_none() && !self.send_pending()
    }

    // ----- sample mode -----

    /// Switching sample data on loads fixtures with a preselection;
    /// switching it off drops everything derived from loaded data.
    pub fn set_sample_mode(&mut self, on: bool) {
        self.sample_mode = on;
        self.generation += 1;
        self.selection.clear();
        self.emails_error = None;
        self.channels_error = None;
        self.send_error = None;

        if on {
            self.emails = sample::emails(Utc::now());
            self.channels = sample::channels();
            let ids: Vec<EmailId> = sample::PRESELECTED_EMAILS
                .iter()
                .map(|s| s.to_string())
                .collect();
            self.selection.set_emails(&ids);
            self.selection.select_channel(sample::PRESELECTED_CHANNEL);
        } else {
            self.emails.clear();
            self.channels.clear();
            self.last_summary = None;
            self.summary_expanded = false;
        }
    }

    // ----- fetch emails -----

    /// `None` while a fetch is already running.
    pub fn begin_fetch_emails(&mut self) -> Option<AgentCall> {
        self.begin_fetch_emails_of(self.fetch_count)
    }

    /// Like [`Session::begin_fetch_emails`] with a one-off `count`.
    pub fn begin_fetch_emails_of(&mut self, count: usize) -> Option<AgentCall> {
        if self.emails_pending() {
            return None;
        }
        self.emails_phase = Phase::Pending;
        self.emails_error = None;
        Some(self.call(instructions::fetch_emails(count)))
    }

    pub fn apply_emails(
        &mut self,
        call: &AgentCall,
        outcome: Result<AgentEnvelope>,
    ) -> Result<(), DigestError> {
        self.emails_phase = Phase::Idle;
        self.check_current(call)?;
        let res = interpret(outcome, EMAILS_FAILED, EMAILS_FAILED).and_then(|result| {
            let emails: Vec<Email> = result
                .emails
                .unwrap_or_default()
                .into_iter()
                .map(Email::normalized)
                .collect();
            log::info!("loaded {} emails", emails.len());
            self.emails = emails;
            self.prune_selection();
            if self.emails.is_empty() {
                Err(DigestError::Empty("No emails found"))
            } else {
                Ok(())
            }
        });
        self.emails_error = res.as_ref().err().cloned();
        res
    }

    // ----- fetch channels -----

    pub fn begin_fetch_channels(&mut self) -> Option<AgentCall> {
        if self.channels_pending() {
            return None;
        }
        self.channels_phase = Phase::Pending;
        self.channels_error = None;
        Some(self.call(instructions::fetch_channels()))
    }

    pub fn apply_channels(
        &mut self,
        call: &AgentCall,
        outcome: Result<AgentEnvelope>,
    ) -> Result<(), DigestError> {
        self.channels_phase = Phase::Idle;
        self.check_current(call)?;
        let res = interpret(outcome, CHANNELS_FAILED, CHANNELS_FAILED).and_then(|result| {
            let channels = result.channels.unwrap_or_default();
            log::info!("loaded {} channels", channels.len());
            self.channels = channels;
            self.prune_selection();
            if self.channels.is_empty() {
                Err(DigestError::Empty("No channels found"))
            } else {
                Ok(())
            }
        });
        self.channels_error = res.as_ref().err().cloned();
        res
    }

    // ----- send summary -----

    /// Validate the selection and mark the send pending. On a validation
    /// failure the error is recorded and nothing should be sent.
    pub fn prepare_summary(&mut self) -> Result<SummaryRequest, DigestError> {
        let checked = if self.send_pending() {
            Err(ValidationError::InFlight)
        } else if self.selection.is_empty() {
            Err(ValidationError::NoEmails)
        } else if self.selection.channel_id().is_none() {
            Err(ValidationError::NoChannel)
        } else {
            Ok(())
        };
        if let Err(e) = checked {
            let err = DigestError::from(e);
            self.send_error = Some(err.clone());
            return Err(err);
        }

        let channel_id = self.selection.channel_id().unwrap_or_default().to_string();
        let channel = self.channel(&channel_id);
        let label = channel_label(channel, &channel_id);
        let target = channel
            .map(|c| c.name.as_str())
            .filter(|n| !n.is_empty())
            .unwrap_or(&channel_id)
            .to_string();

        let selected = self.selected_emails();
        let selected_count = selected.len();
        let instruction = instructions::summarize(selected, &target);

        self.send_error = None;
        self.send_phase = Phase::Pending;
        Ok(SummaryRequest {
            call: self.call(instruction),
            selected_count,
            channel_label: label,
        })
    }

    /// Settle a send. A failure leaves the previous summary in place.
    pub fn apply_summary(
        &mut self,
        request: &SummaryRequest,
        outcome: Result<AgentEnvelope>,
    ) -> Result<&SummaryResult, DigestError> {
        self.send_phase = Phase::Idle;
        self.check_current(&request.call)?;
        match interpret(outcome, SUMMARY_FAILED, UNEXPECTED) {
            Ok(result) => {
                log::info!(
                    "summary of {} emails delivered to {}",
                    request.selected_count,
                    request.channel_label
                );
                self.send_error = None;
                self.summary_expanded = true;
                Ok(self.last_summary.insert(summary_from(result, request)))
            }
            Err(e) => {
                self.send_error = Some(e.clone());
                Err(e)
            }
        }
    }

    // ----- blocking helpers -----

    pub fn fetch_emails(&mut self, client: &dyn AgentClient) -> Result<(), DigestError> {
        match self.begin_fetch_emails() {
            Some(call) => {
                let outcome = call.run(client);
                self.apply_emails(&call, outcome)
            }
            None => Ok(()),
        }
    }

    pub fn fetch_channels(&mut self, client: &dyn AgentClient) -> Result<(), DigestError> {
        match self.begin_fetch_channels() {
            Some(call) => {
                let outcome = call.run(client);
                self.apply_channels(&call, outcome)
            }
            None => Ok(()),
        }
    }

    pub fn send_summary(&mut self, client: &dyn AgentClient) -> Result<&SummaryResult, DigestError> {
        let request = self.prepare_summary()?;
        let outcome = request.call.run(client);
        self.apply_summary(&request, outcome)
    }

    fn call(&self, instruction: String) -> AgentCall {
        AgentCall {
            instruction,
            agent_id: self.agent_id.clone(),
            generation: self.generation,
        }
    }

    /// Outcomes of calls issued before the last sample-mode switch belong
    /// to data that is no longer shown.
    fn check_current(&self, call: &AgentCall) -> Result<(), DigestError> {
        if call.generation == self.generation {
            return Ok(());
        }
        log::debug!("dropping outcome from generation {}", call.generation);
        Err(DigestError::Stale)
    }

    fn loaded_ids(&self) -> Vec<EmailId> {
        self.emails.iter().map(|e| e.id.clone()).collect()
    }

    fn prune_selection(&mut self) {
        self.selection.retain_loaded(
            self.emails.iter().map(|e| e.id.as_str()),
            self.channels.iter().map(|c| c.id.as_str()),
        );
    }
}

/// Map a call outcome onto the error taxonomy, using the fallbacks when the
/// agent or the transport gave no message.
fn interpret(
    outcome: Result<AgentEnvelope>,
    agent_fallback: &str,
    transport_fallback: &str,
) -> Result<AgentResult, DigestError> {
    match outcome {
        Ok(envelope) if envelope.success => Ok(envelope.result()),
        Ok(envelope) => {
            let msg = envelope.error_message().unwrap_or(agent_fallback).to_string();
            log::warn!("agent reported failure: {msg}");
            Err(DigestError::Agent(msg))
        }
        Err(e) => {
            let msg = e.to_string();
            log::warn!("agent call failed: {msg}");
            Err(DigestError::Transport(if msg.trim().is_empty() {
                transport_fallback.to_string()
            } else {
                msg
            }))
        }
    }
}

fn summary_from(result: AgentResult, request: &SummaryRequest) -> SummaryResult {
    SummaryResult {
        summary: Some(result.summary.unwrap_or_default()),
        email_count: Some(result.email_count.unwrap_or(request.selected_count)),
        channel_sent: Some(request.channel_label.clone()),
        timestamp: Some(
            result
                .timestamp
                .unwrap_or_else(|| Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use serde_json::json;

    fn loaded() -> Session {
        let mut s = Session::new("agent-1", 10);
        s.set_sample_mode(true);
        s
    }

    #[test]
    fn sample_mode_preselects() {
        let s = loaded();
        assert_eq!(s.emails().len(), 10);
        assert_eq!(s.channels().len(), 8);
        assert_eq!(s.selection().email_ids(), ["1", "2", "3"]);
        assert_eq!(s.selection().channel_id(), Some("C001"));
        assert!(s.can_send());
    }

    #[test]
    fn sample_mode_off_clears_derived_state() {
        let mut s = loaded();
        s.last_summary = Some(SummaryResult::default());
        s.set_sample_mode(false);
        assert!(s.emails().is_empty());
        assert!(s.channels().is_empty());
        assert!(s.selection().is_empty());
        assert_eq!(s.selection().channel_id(), None);
        assert!(s.last_summary.is_none());
    }

    #[test]
    fn toggling_unknown_id_is_ignored() {
        let mut s = loaded();
        s.toggle_email("nope");
        assert_eq!(s.selection().len(), 3);
        s.select_channel("C999");
        assert_eq!(s.selection().channel_id(), Some("C001"));
    }

    #[test]
    fn no_emails_selected_is_rejected_before_sending() {
        let mut s = loaded();
        s.toggle_all_emails(); // 3 of 10 -> all
        s.toggle_all_emails(); // all -> none
        let err = s.prepare_summary().unwrap_err();
        assert_eq!(err, DigestError::Validation(ValidationError::NoEmails));
        assert!(err.to_string().contains("select at least one email"));
        assert!(!s.send_pending());
        assert_eq!(s.send_error, Some(err));
    }

    #[test]
    fn missing_channel_is_rejected() {
        let mut s = loaded();
        s.select_channel("");
        assert_eq!(
            s.prepare_summary().unwrap_err().to_string(),
            "Please select a Slack channel"
        );
    }

    #[test]
    fn validation_hints() {
        let mut s = Session::new("a", 10);
        assert_eq!(s.validation_hint(), Some(ValidationError::NothingSelected));
        s.set_sample_mode(true);
        assert_eq!(s.validation_hint(), None);
        s.select_channel("");
        assert_eq!(s.validation_hint(), Some(ValidationError::NoChannel));
    }

    #[test]
    fn summary_request_uses_channel_name_and_load_order() {
        let mut s = loaded();
        s.toggle_email("1");
        s.toggle_email("1"); // now [2, 3, 1]
        s.select_channel("C002");
        let req = s.prepare_summary().unwrap();
        assert!(s.send_pending());
        assert_eq!(req.selected_count, 3);
        assert_eq!(req.channel_label, "#engineering");
        assert_eq!(req.call.agent_id, "agent-1");
        assert!(req.call.instruction.contains("these 3 emails"));
        assert!(req.call.instruction.contains("Slack channel #engineering:"));
        let first = req.call.instruction.find("Project Deadline").unwrap();
        let second = req.call.instruction.find("Client Meeting").unwrap();
        assert!(first < second);

        assert_eq!(
            s.prepare_summary().unwrap_err(),
            DigestError::Validation(ValidationError::InFlight)
        );
    }

    #[test]
    fn email_count_falls_back_to_local_selection() {
        let mut s = loaded();
        s.toggle_email("3");
        let req = s.prepare_summary().unwrap();
        let out = s
            .apply_summary(&req, Ok(AgentEnvelope::ok(json!({"summary": "ok"}))))
            .unwrap();
        assert_eq!(out.summary.as_deref(), Some("ok"));
        assert_eq!(out.email_count, Some(2));
        assert_eq!(out.channel_sent.as_deref(), Some("#general"));
        assert!(out.timestamp.is_some());
        assert!(s.summary_expanded);
        assert!(!s.send_pending());
    }

    #[test]
    fn reported_fields_win() {
        let mut s = loaded();
        let req = s.prepare_summary().unwrap();
        let out = s
            .apply_summary(
                &req,
                Ok(AgentEnvelope::ok(json!({
                    "emailCount": 7,
                    "timestamp": "2026-01-01T00:00:00Z"
                }))),
            )
            .unwrap();
        assert_eq!(out.summary.as_deref(), Some(""));
        assert_eq!(out.email_count, Some(7));
        assert_eq!(out.timestamp.as_deref(), Some("2026-01-01T00:00:00Z"));
    }

    #[test]
    fn failure_keeps_previous_summary() {
        let mut s = loaded();
        let req = s.prepare_summary().unwrap();
        s.apply_summary(&req, Ok(AgentEnvelope::ok(json!({"summary": "first"}))))
            .unwrap();

        let req = s.prepare_summary().unwrap();
        let err = s
            .apply_summary(&req, Ok(AgentEnvelope::failed("")))
            .unwrap_err();
        assert_eq!(err, DigestError::Agent(SUMMARY_FAILED.into()));
        assert_eq!(
            s.last_summary.as_ref().and_then(|r| r.summary.as_deref()),
            Some("first")
        );

        let req = s.prepare_summary().unwrap();
        assert!(s.send_error.is_none());
        let err = s
            .apply_summary(&req, Err(anyhow!("connection refused")))
            .unwrap_err();
        assert_eq!(err, DigestError::Transport("connection refused".into()));
        assert!(!s.send_pending());
    }

    #[test]
    fn empty_email_list_is_soft_error() {
        let mut s = Session::new("a", 10);
        let call = s.begin_fetch_emails().unwrap();
        let err = s
            .apply_emails(&call, Ok(AgentEnvelope::ok(json!({"emails": []}))))
            .unwrap_err();
        assert!(err.is_soft());
        assert_eq!(err.to_string(), "No emails found");
    }

    #[test]
    fn fetch_replaces_emails_and_prunes_selection() {
        let mut s = loaded();
        let call = s.begin_fetch_emails().unwrap();
        assert!(s.begin_fetch_emails().is_none());
        s.apply_emails(&call, Ok(AgentEnvelope::ok(json!({
            "emails": [
                {"id": "2", "sender_name": "M", "sender_email": "m@x", "subject": "s", "snippet": "n", "date": ""},
                {"id": "11", "sender_name": "N", "sender_email": "n@x", "subject": "t", "snippet": "o", "date": ""}
            ]
        }))))
        .unwrap();
        assert_eq!(s.emails().len(), 2);
        assert_eq!(s.selection().email_ids(), ["2"]);
        assert!(!s.emails_pending());
    }

    #[test]
    fn fetch_failure_uses_fallback() {
        let mut s = Session::new("a", 10);
        let call = s.begin_fetch_channels().unwrap();
        let err = s
            .apply_channels(&call, Ok(AgentEnvelope::failed("")))
            .unwrap_err();
        assert_eq!(err.to_string(), CHANNELS_FAILED);
        assert_eq!(s.channels_error, Some(err));
    }

    #[test]
    fn typed_channel_is_matched_or_registered() {
        let mut s = loaded();
        assert_eq!(s.use_channel("#random").map(|c| c.id.clone()), Some("C004".into()));
        assert_eq!(s.selection().channel_id(), Some("C004"));

        s.use_channel("ops-alerts");
        assert_eq!(s.selection().channel_id(), Some("ops-alerts"));
        let req = s.prepare_summary().unwrap();
        assert_eq!(req.channel_label, "#ops-alerts");
    }

    #[test]
    fn one_off_fetch_count_leaves_default_alone() {
        let mut s = Session::new("a", 10);
        let call = s.begin_fetch_emails_of(3).unwrap();
        assert!(call.instruction.contains("last 3 emails"));
        s.apply_emails(&call, Err(anyhow!("down"))).unwrap_err();
        let call = s.begin_fetch_emails().unwrap();
        assert!(call.instruction.contains("last 10 emails"));
    }

    #[test]
    fn outcome_from_before_mode_switch_is_dropped() {
        let mut s = Session::new("a", 10);
        let call = s.begin_fetch_channels().unwrap();
        s.set_sample_mode(true);
        let err = s
            .apply_channels(&call, Ok(AgentEnvelope::ok(json!({"channels": [{"id": "X1"}]}))))
            .unwrap_err();
        assert_eq!(err, DigestError::Stale);
        assert!(!s.channels_pending());
        assert!(s.channels_error.is_none());
        assert_eq!(s.channels().len(), 8);
        assert_eq!(s.selection().channel_id(), Some("C001"));
    }

    #[test]
    fn select_first_emails_caps_selection() {
        let mut s = loaded();
        s.select_first_emails(5);
        assert_eq!(s.selection().email_ids(), ["1", "2", "3", "4", "5"]);
        s.select_first_emails(100);
        assert_eq!(s.selection().len(), 10);
    }
}
