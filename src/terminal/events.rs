use ratatui::crossterm::event::{KeyCode, KeyEvent};

use crate::terminal::form::FormAction;
use crate::terminal::state::{AppState, Screen};
use crate::terminal::worker::Job;

pub enum Action {
    None,
    Quit,
    Dispatch(Job),
}

impl From<Option<Job>> for Action {
    fn from(job: Option<Job>) -> Self {
        job.map_or(Action::None, Action::Dispatch)
    }
}

pub fn handle_key(key: KeyEvent, state: &mut AppState) -> Action {
    match state.screen {
        Screen::Browser => handle_browser_keys(key, state),
        Screen::Compose => handle_compose_keys(key, state),
    }
}

fn handle_browser_keys(key: KeyEvent, state: &mut AppState) -> Action {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Tab => {
            state.toggle_focus();
            Action::None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            state.move_cursor(1);
            Action::None
        }
        KeyCode::Up | KeyCode::Char('k') => {
            state.move_cursor(-1);
            Action::None
        }
        KeyCode::Char(' ') => {
            state.activate_cursor();
            Action::None
        }
        KeyCode::Char('a') => {
            state.session.toggle_all_emails();
            Action::None
        }
        KeyCode::Char('f') => state.fetch_emails().into(),
        KeyCode::Char('c') => state.fetch_channels().into(),
        KeyCode::Enter => state.send_summary().into(),
        KeyCode::Char('s') => {
            state.toggle_sample_mode();
            Action::None
        }
        KeyCode::Char('e') => {
            state.toggle_summary_expanded();
            Action::None
        }
        KeyCode::PageDown => {
            state.summary_scroll = state.summary_scroll.saturating_add(5);
            Action::None
        }
        KeyCode::PageUp => {
            state.summary_scroll = state.summary_scroll.saturating_sub(5);
            Action::None
        }
        KeyCode::Char('m') | KeyCode::F(2) => {
            state.screen = Screen::Compose;
            Action::None
        }
        _ => Action::None,
    }
}

fn handle_compose_keys(key: KeyEvent, state: &mut AppState) -> Action {
    if key.code == KeyCode::F(2) {
        state.screen = Screen::Browser;
        return Action::None;
    }
    match state.form.handle_key(key) {
        FormAction::None => Action::None,
        FormAction::Escape => {
            state.screen = Screen::Browser;
            Action::None
        }
        FormAction::Submit => match state.form.submit() {
            Some(req) => state.start_compose(req).into(),
            None => Action::None,
        },
    }
}
