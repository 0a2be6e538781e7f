use chrono::Utc;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};
use std::time::Instant;

use crate::render::time::{format_relative_time, format_timestamp};
use crate::render::tui::summary_lines;
use crate::session::DigestError;
use crate::terminal::form::FormField;
use crate::terminal::state::{AppState, Focus, Screen};

/// Lines of a long summary shown while collapsed.
const COLLAPSED_LINES: usize = 6;

pub fn render(f: &mut Frame, state: &mut AppState) {
    let [header, body, footer] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(f.area());

    render_header(f, header, state);

    let [left, right] =
        Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)]).areas(body);
    let [top_right, send, preview] = Layout::vertical([
        Constraint::Percentage(40),
        Constraint::Length(7),
        Constraint::Min(5),
    ])
    .areas(right);

    match state.screen {
        Screen::Browser => {
            render_emails(f, left, state);
            render_channels(f, top_right, state);
        }
        Screen::Compose => {
            render_form(f, left, state);
            render_channels(f, top_right, state);
        }
    }
    render_send_panel(f, send, state);
    render_preview(f, preview, state);
    render_footer(f, footer, state);
}

fn border(active: bool) -> Style {
    if active {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn error_style(e: &DigestError) -> Style {
    if e.is_soft() {
        Style::default().fg(Color::Gray)
    } else {
        Style::default().fg(Color::Red)
    }
}

fn render_header(f: &mut Frame, area: Rect, state: &AppState) {
    let mode = if state.session.sample_mode() {
        Span::styled(" SAMPLE DATA ", Style::default().fg(Color::Black).bg(Color::Yellow))
    } else {
        Span::styled(" live ", Style::default().fg(Color::Green))
    };
    let screen = match state.screen {
        Screen::Browser => "browse",
        Screen::Compose => "compose",
    };
    let line = Line::from(vec![
        Span::styled(
            " Mail → Slack digest ",
            Style::default().add_modifier(Modifier::BOLD),
        ),
        mode,
        Span::styled(format!(" [{screen}]"), Style::default().fg(Color::DarkGray)),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn render_emails(f: &mut Frame, area: Rect, state: &mut AppState) {
    let session = &state.session;
    let title = if session.emails_pending() {
        " Emails (loading...) ".to_string()
    } else {
        format!(
            " Emails ({}/{} selected) ",
            session.selection().len(),
            session.emails().len()
        )
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border(state.focus == Focus::Emails));

    if session.emails().is_empty() {
        let text = match &session.emails_error {
            Some(e) => Line::styled(e.to_string(), error_style(e)),
            None if session.emails_pending() => Line::raw("Fetching emails..."),
            None => Line::raw("No emails loaded. Press f to fetch, s for sample data."),
        };
        f.render_widget(Paragraph::new(text).block(block), area);
        return;
    }

    let now = Utc::now();
    let items: Vec<ListItem> = session
        .emails()
        .iter()
        .map(|e| {
            let checked = session.selection().contains(&e.id);
            let mark = if checked { "[x] " } else { "[ ] " };
            let head = Line::from(vec![
                Span::styled(mark, Style::default().fg(Color::Cyan)),
                Span::styled(
                    e.sender_name.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  {}", format_relative_time(&e.date, now)),
                    Style::default().fg(Color::DarkGray),
                ),
            ]);
            let subj = Line::from(format!("    {}", e.subject));
            let snip = Line::styled(format!("    {}", e.snippet), Style::default().fg(Color::Gray));
            ListItem::new(Text::from(vec![head, subj, snip]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_symbol("➜ ")
        .highlight_style(Style::default().fg(Color::Green));

    f.render_stateful_widget(list, area, &mut state.email_list);
}

fn render_channels(f: &mut Frame, area: Rect, state: &mut AppState) {
    let session = &state.session;
    let title = if session.channels_pending() {
        " Slack Channels (loading...) ".to_string()
    } else {
        format!(" Slack Channels ({}) ", session.channels().len())
    };
    let active = state.screen == Screen::Browser && state.focus == Focus::Channels;
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border(active));

    if session.channels().is_empty() {
        let text = match &session.channels_error {
            Some(e) => Line::styled(e.to_string(), error_style(e)),
            None if session.channels_pending() => Line::raw("Loading channels..."),
            None => Line::raw("No channels loaded. Press c to load them."),
        };
        f.render_widget(Paragraph::new(text).block(block), area);
        return;
    }

    let items: Vec<ListItem> = session
        .channels()
        .iter()
        .map(|c| {
            let picked = session.selection().channel_id() == Some(c.id.as_str());
            let mut spans = vec![
                Span::styled(
                    if picked { "(•) " } else { "( ) " },
                    Style::default().fg(Color::Green),
                ),
                Span::raw(format!("#{}", c.name)),
            ];
            if let Some(n) = c.member_count {
                spans.push(Span::styled(
                    format!("  {n} members"),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            if c.is_private() {
                spans.push(Span::styled("  private", Style::default().fg(Color::Magenta)));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_symbol("➜ ")
        .highlight_style(Style::default().fg(Color::Green));

    f.render_stateful_widget(list, area, &mut state.channel_list);
}

fn render_form(f: &mut Frame, area: Rect, state: &AppState) {
    let form = &state.form;
    let block = Block::default()
        .title(" Compose Summary ")
        .borders(Borders::ALL)
        .border_style(border(true));

    let field = |label: &str, value: &str, active: bool| {
        let style = if active {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        let cursor = if active { "▏" } else { "" };
        Line::from(vec![
            Span::styled(format!("{label:<14}"), Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(format!("{value}{cursor}"), style),
        ])
    };

    let mut lines = vec![
        field("Slack channel", &form.channel, form.field == FormField::Channel),
        Line::default(),
        field("Email count", &form.count, form.field == FormField::Count),
        Line::default(),
    ];
    if state.compose_target.is_some() {
        lines.push(Line::styled("Fetching emails...", Style::default().fg(Color::Cyan)));
    }
    if let Some(err) = &form.error {
        lines.push(Line::styled(err.clone(), Style::default().fg(Color::Red)));
    }
    lines.push(Line::default());
    lines.push(Line::styled(
        "Enter fetches the latest emails, selects them all and sends the summary.",
        Style::default().fg(Color::DarkGray),
    ));

    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

fn render_send_panel(f: &mut Frame, area: Rect, state: &AppState) {
    let session = &state.session;
    let block = Block::default().title(" Send Summary ").borders(Borders::ALL);

    let channel = session
        .selection()
        .channel_id()
        .map(|id| match session.channel(id) {
            Some(c) => format!("#{}", c.name),
            None => format!("#{id}"),
        })
        .unwrap_or_else(|| "none".to_string());

    let mut lines = vec![Line::from(vec![
        Span::raw(format!("{} emails selected", session.selection().len())),
        Span::styled("  →  ", Style::default().fg(Color::DarkGray)),
        Span::raw(channel),
    ])];

    if session.send_pending() {
        let step = state
            .narration_text(Instant::now())
            .unwrap_or("Processing...");
        lines.push(Line::styled(step, Style::default().fg(Color::Cyan)));
    } else if let Some(hint) = session.validation_hint() {
        lines.push(Line::styled(hint.to_string(), Style::default().fg(Color::Yellow)));
    }

    if let Some(e) = &session.send_error {
        lines.push(Line::styled(e.to_string(), error_style(e)));
    } else if let Some(last) = &session.last_summary {
        if !session.send_pending() {
            lines.push(Line::styled(
                format!("Sent to {}", last.channel_sent.as_deref().unwrap_or("#?")),
                Style::default().fg(Color::Green),
            ));
        }
    }

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_preview(f: &mut Frame, area: Rect, state: &AppState) {
    let session = &state.session;
    let Some(last) = &session.last_summary else {
        let block = Block::default().title(" Summary Preview ").borders(Borders::ALL);
        f.render_widget(
            Paragraph::new("No summary yet.").block(block),
            area,
        );
        return;
    };

    let title = format!(
        " Summary Preview · {} emails · Sent to {} · {} ",
        last.email_count.unwrap_or(0),
        last.channel_sent.as_deref().unwrap_or("#?"),
        format_timestamp(last.timestamp.as_deref()),
    );
    let block = Block::default().title(title).borders(Borders::ALL);

    if last.text().is_empty() {
        f.render_widget(
            Paragraph::new(Line::styled(
                "No summary content",
                Style::default().fg(Color::DarkGray),
            ))
            .block(block),
            area,
        );
        return;
    }

    let mut lines = summary_lines(last.text());
    if last.is_long() {
        if session.summary_expanded {
            lines.push(Line::styled("[e] Show Less", Style::default().fg(Color::DarkGray)));
        } else {
            lines.truncate(COLLAPSED_LINES);
            lines.push(Line::styled(
                "… [e] Show Full Summary",
                Style::default().fg(Color::DarkGray),
            ));
        }
    }

    f.render_widget(
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((state.summary_scroll, 0)),
        area,
    );
}

fn render_footer(f: &mut Frame, area: Rect, state: &AppState) {
    let key = |k: &'static str| Span::styled(k, Style::default().add_modifier(Modifier::BOLD));
    let hint = match state.screen {
        Screen::Browser => Line::from(vec![
            key("j/k"),
            Span::raw(" move  "),
            key("Space"),
            Span::raw(" pick  "),
            key("a"),
            Span::raw(" all  "),
            key("f/c"),
            Span::raw(" fetch  "),
            key("Enter"),
            Span::raw(" send  "),
            key("s"),
            Span::raw(" sample  "),
            key("m"),
            Span::raw(" compose  "),
            key("q"),
            Span::raw(" quit"),
        ]),
        Screen::Compose => Line::from(vec![
            key("Tab"),
            Span::raw(" field  "),
            key("Enter"),
            Span::raw(" submit  "),
            key("Esc"),
            Span::raw(" back"),
        ]),
    };
    f.render_widget(Paragraph::new(hint), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Session;
    use ratatui::{Terminal, backend::TestBackend};

    fn draw(state: &mut AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| render(f, state)).unwrap();
        let buf = terminal.backend().buffer().clone();
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn empty_session_shows_hints() {
        let mut state = AppState::new(Session::new("a", 10), None);
        let screen = draw(&mut state);
        assert!(screen.contains("No emails loaded"));
        assert!(screen.contains("Please select emails and a Slack channel"));
    }

    #[test]
    fn sample_mode_lists_emails_and_channels() {
        let mut state = AppState::new(Session::new("a", 10), None);
        state.toggle_sample_mode();
        let screen = draw(&mut state);
        assert!(screen.contains("SAMPLE DATA"));
        assert!(screen.contains("Sarah Chen"));
        assert!(screen.contains("#general"));
        assert!(screen.contains("3 emails selected"));
    }

    #[test]
    fn compose_screen_renders_form() {
        let mut state = AppState::new(Session::new("a", 10), Some("ops"));
        state.screen = Screen::Compose;
        let screen = draw(&mut state);
        assert!(screen.contains("Compose Summary"));
        assert!(screen.contains("ops"));
    }
}
