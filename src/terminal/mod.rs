pub mod events;
pub mod form;
pub mod state;
pub mod ui;
pub mod worker;

use anyhow::{Result, anyhow};
use ratatui::DefaultTerminal;
use ratatui::crossterm::event::{self, Event, KeyEventKind};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use crate::agent::AgentClient;
use crate::terminal::events::{Action, handle_key};
use crate::terminal::state::{AppState, Screen};
use crate::terminal::worker::{Dispatcher, Outcome};

const TICK: Duration = Duration::from_millis(100);

pub struct TuiOptions {
    pub compose: bool,
    pub notify: bool,
}

pub fn run_tui(mut state: AppState, client: Arc<dyn AgentClient>, opts: TuiOptions) -> Result<()> {
    color_eyre::install().map_err(|e| anyhow!("failed to install error hooks: {e}"))?;

    if opts.compose {
        state.screen = Screen::Compose;
    }
    state.notify = opts.notify;

    let (tx, rx) = mpsc::channel();
    let dispatcher = Dispatcher::new(client, tx);

    let terminal = ratatui::init();
    let result = run(terminal, &mut state, &dispatcher, &rx);
    ratatui::restore();

    result
}

fn run(
    mut terminal: DefaultTerminal,
    state: &mut AppState,
    dispatcher: &Dispatcher,
    rx: &Receiver<Outcome>,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::render(f, state))?;

        while let Ok(outcome) = rx.try_recv() {
            if let Some(job) = state.apply(outcome) {
                dispatcher.dispatch(job);
            }
        }

        // poll with a timeout so narration keeps advancing without input
        if !event::poll(TICK)? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match handle_key(key, state) {
                Action::Quit => break,
                Action::Dispatch(job) => dispatcher.dispatch(job),
                Action::None => {}
            }
        }
    }
    Ok(())
}
