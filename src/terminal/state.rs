use ratatui::widgets::ListState;
use std::time::Instant;

use crate::session::narration::Narration;
use crate::session::{DigestError, Session};
use crate::terminal::form::{ComposeForm, ComposeRequest};
use crate::terminal::worker::{Job, Outcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Browser,
    Compose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Emails,
    Channels,
}

pub struct AppState {
    pub session: Session,
    pub screen: Screen,
    pub focus: Focus,

    pub email_list: ListState,
    pub channel_list: ListState,
    pub summary_scroll: u16,

    /// Cosmetic progress text while a summary is in flight.
    pub narration: Option<Narration>,

    pub form: ComposeForm,
    /// Channel typed in the compose form, waiting for its email fetch.
    pub compose_target: Option<String>,

    pub notify: bool,
}

impl AppState {
    pub fn new(session: Session, default_channel: Option<&str>) -> Self {
        let count = session.fetch_count();
        let mut s = Self {
            session,
            screen: Screen::Browser,
            focus: Focus::Emails,
            email_list: ListState::default(),
            channel_list: ListState::default(),
            summary_scroll: 0,
            narration: None,
            form: ComposeForm::new(default_channel, count),
            compose_target: None,
            notify: false,
        };
        s.clamp_cursors();
        s
    }

    pub fn narration_text(&self, now: Instant) -> Option<&'static str> {
        self.narration.as_ref().and_then(|n| n.current(now))
    }

    // ----- cursor movement -----

    pub fn move_cursor(&mut self, delta: i32) {
        let (list, len) = match self.focus {
            Focus::Emails => (&mut self.email_list, self.session.emails().len()),
            Focus::Channels => (&mut self.channel_list, self.session.channels().len()),
        };
        if len == 0 {
            list.select(None);
            return;
        }
        let cur = list.selected().unwrap_or(0) as i32;
        let next = (cur + delta).clamp(0, len as i32 - 1) as usize;
        list.select(Some(next));
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Emails => Focus::Channels,
            Focus::Channels => Focus::Emails,
        };
    }

    /// Keep both cursors inside their (possibly replaced) lists.
    pub fn clamp_cursors(&mut self) {
        clamp(&mut self.email_list, self.session.emails().len());
        clamp(&mut self.channel_list, self.session.channels().len());
    }

    /// Space on the focused row: toggle the email or pick the channel.
    pub fn activate_cursor(&mut self) {
        match self.focus {
            Focus::Emails => {
                let id = self
                    .email_list
                    .selected()
                    .and_then(|i| self.session.emails().get(i))
                    .map(|e| e.id.clone());
                if let Some(id) = id {
                    self.session.toggle_email(&id);
                }
            }
            Focus::Channels => {
                let id = self
                    .channel_list
                    .selected()
                    .and_then(|i| self.session.channels().get(i))
                    .map(|c| c.id.clone());
                if let Some(id) = id {
                    self.session.select_channel(&id);
                }
            }
        }
    }

    pub fn toggle_sample_mode(&mut self) {
        let on = !self.session.sample_mode();
        self.session.set_sample_mode(on);
        self.compose_target = None;
        self.summary_scroll = 0;
        self.email_list.select(None);
        self.channel_list.select(None);
        self.clamp_cursors();
    }

    pub fn toggle_summary_expanded(&mut self) {
        self.session.summary_expanded = !self.session.summary_expanded;
        self.summary_scroll = 0;
    }

    // ----- jobs -----

    pub fn fetch_emails(&mut self) -> Option<Job> {
        self.session.begin_fetch_emails().map(Job::Emails)
    }

    pub fn fetch_channels(&mut self) -> Option<Job> {
        self.session.begin_fetch_channels().map(Job::Channels)
    }

    /// Start a send; a validation failure only records the error.
    pub fn send_summary(&mut self) -> Option<Job> {
        let req = self.session.prepare_summary().ok()?;
        self.narration = Some(Narration::start(Instant::now()));
        Some(Job::Summary(req))
    }

    /// Compose submit: fetch `count` emails, then summarize all of them.
    pub fn start_compose(&mut self, req: ComposeRequest) -> Option<Job> {
        let job = self.session.begin_fetch_emails_of(req.count).map(Job::Emails);
        if job.is_some() {
            self.compose_target = Some(req.channel);
        } else {
            self.form.error = Some("Emails are already being fetched".to_string());
        }
        job
    }

    /// Fold a finished job into the state. May return a follow-up job.
    pub fn apply(&mut self, outcome: Outcome) -> Option<Job> {
        match outcome {
            Outcome::Emails(call, res) => {
                let fetched = self.session.apply_emails(&call, res);
                self.clamp_cursors();
                let target = self.compose_target.take()?;
                self.continue_compose(&target, fetched)
            }
            Outcome::Channels(call, res) => {
                let _ = self.session.apply_channels(&call, res);
                self.clamp_cursors();
                None
            }
            Outcome::Summary(req, res) => {
                // the real outcome settles the send; narration is dropped unseen
                if let Some(n) = self.narration.as_mut() {
                    n.cancel();
                }
                self.narration = None;
                self.summary_scroll = 0;
                if let Ok(result) = self.session.apply_summary(&req, res) {
                    if self.notify {
                        crate::notify::notify_delivered(result);
                    }
                }
                None
            }
        }
    }

    fn continue_compose(&mut self, channel: &str, fetched: Result<(), DigestError>) -> Option<Job> {
        if let Err(e) = fetched {
            self.form.error = Some(e.to_string());
            return None;
        }
        self.session.select_all_emails();
        self.session.use_channel(channel);
        self.clamp_cursors();
        match self.send_summary() {
            Some(job) => Some(job),
            None => {
                self.form.error = self.session.send_error.as_ref().map(|e| e.to_string());
                None
            }
        }
    }
}

fn clamp(list: &mut ListState, len: usize) {
    match list.selected() {
        _ if len == 0 => list.select(None),
        None => list.select(Some(0)),
        Some(i) if i >= len => list.select(Some(len - 1)),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentEnvelope;
    use serde_json::json;

    fn state() -> AppState {
        AppState::new(Session::new("agent", 10), None)
    }

    #[test]
    fn space_toggles_email_under_cursor() {
        let mut s = state();
        s.toggle_sample_mode();
        assert_eq!(s.email_list.selected(), Some(0));
        s.move_cursor(3);
        s.activate_cursor(); // email "4"
        assert_eq!(s.session.selection().len(), 4);
        s.activate_cursor();
        assert_eq!(s.session.selection().len(), 3);
    }

    #[test]
    fn cursor_stays_in_bounds() {
        let mut s = state();
        s.move_cursor(1);
        assert_eq!(s.email_list.selected(), None);
        s.toggle_sample_mode();
        s.toggle_focus();
        s.move_cursor(100);
        assert_eq!(s.channel_list.selected(), Some(7));
        s.move_cursor(-100);
        assert_eq!(s.channel_list.selected(), Some(0));
    }

    #[test]
    fn summary_outcome_clears_narration() {
        let mut s = state();
        s.toggle_sample_mode();
        let Some(Job::Summary(req)) = s.send_summary() else {
            panic!("expected summary job");
        };
        assert!(s.narration.is_some());
        s.apply(Outcome::Summary(req, Ok(AgentEnvelope::ok(json!({"summary": "done"})))));
        assert!(s.narration.is_none());
        assert!(!s.session.send_pending());
        assert_eq!(
            s.session.last_summary.as_ref().and_then(|r| r.email_count),
            Some(3)
        );
    }

    #[test]
    fn invalid_send_starts_no_narration() {
        let mut s = state();
        assert!(s.send_summary().is_none());
        assert!(s.narration.is_none());
        assert!(s.session.send_error.is_some());
    }

    #[test]
    fn compose_chains_fetch_into_send() {
        let mut s = state();
        let Some(Job::Emails(call)) = s.start_compose(ComposeRequest {
            channel: "ops".into(),
            count: 2,
        }) else {
            panic!("expected email fetch");
        };
        assert!(call.instruction.contains("last 2 emails"));

        let follow = s.apply(Outcome::Emails(call, Ok(AgentEnvelope::ok(json!({
            "emails": [
                {"id": "a", "subject": "one"},
                {"id": "b", "subject": "two"}
            ]
        })))));
        let Some(Job::Summary(req)) = follow else {
            panic!("expected summary job");
        };
        assert_eq!(req.selected_count, 2);
        assert_eq!(req.channel_label, "#ops");
        assert!(s.compose_target.is_none());

        // the compose count was a one-off
        let Some(Job::Emails(call)) = s.fetch_emails() else {
            panic!("expected email fetch");
        };
        assert!(call.instruction.contains("last 10 emails"));
    }

    #[test]
    fn compose_stops_on_empty_inbox() {
        let mut s = state();
        let Some(Job::Emails(call)) = s.start_compose(ComposeRequest {
            channel: "ops".into(),
            count: 5,
        }) else {
            panic!("expected email fetch");
        };
        let follow = s.apply(Outcome::Emails(call, Ok(AgentEnvelope::ok(json!({"emails": []})))));
        assert!(follow.is_none());
        assert_eq!(s.form.error.as_deref(), Some("No emails found"));
    }

    #[test]
    fn sample_summary_landing_after_switch_off_is_dropped() {
        let mut s = state();
        s.toggle_sample_mode();
        let Some(Job::Summary(req)) = s.send_summary() else {
            panic!("expected summary job");
        };
        s.toggle_sample_mode();
        s.apply(Outcome::Summary(req, Ok(AgentEnvelope::ok(json!({"summary": "sample digest"})))));
        assert!(!s.session.sample_mode());
        assert!(s.session.emails().is_empty());
        assert!(s.session.last_summary.is_none());
        assert!(s.session.send_error.is_none());
        assert!(!s.session.send_pending());
        assert!(s.narration.is_none());
    }

    #[test]
    fn live_fetch_landing_after_switch_on_keeps_fixtures() {
        let mut s = state();
        let Some(Job::Emails(call)) = s.fetch_emails() else {
            panic!("expected email fetch");
        };
        s.toggle_sample_mode();
        let follow = s.apply(Outcome::Emails(call, Ok(AgentEnvelope::ok(json!({
            "emails": [{"id": "live-1"}]
        })))));
        assert!(follow.is_none());
        assert!(s.session.sample_mode());
        assert_eq!(s.session.emails().len(), 10);
        assert_eq!(s.session.selection().email_ids(), ["1", "2", "3"]);
        assert!(!s.session.emails_pending());
        assert!(s.session.emails_error.is_none());
    }
}
