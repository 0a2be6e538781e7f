use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

use crate::render::markdown::{self, Block, Inline};

/// Turn a summary into styled terminal lines, one per input line.
pub fn summary_lines(text: &str) -> Vec<Line<'static>> {
    markdown::render(Some(text)).map(block_line).collect()
}

pub fn block_line(block: Block<'_>) -> Line<'static> {
    match block {
        Block::Heading { level, text } => {
            let style = match level {
                1 => Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
                2 => Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                _ => Style::default().add_modifier(Modifier::BOLD),
            };
            Line::from(Span::styled(text.to_string(), style))
        }
        Block::Bullet(inline) => prefixed("  • ", &inline),
        Block::Ordered(inline) => prefixed("  ‣ ", &inline),
        Block::Spacer => Line::default(),
        Block::Paragraph(inline) => Line::from(inline_spans(&inline)),
    }
}

fn prefixed(marker: &'static str, inline: &Inline<'_>) -> Line<'static> {
    let mut spans = vec![Span::styled(marker, Style::default().fg(Color::DarkGray))];
    spans.extend(inline_spans(inline));
    Line::from(spans)
}

fn inline_spans(inline: &Inline<'_>) -> Vec<Span<'static>> {
    inline
        .segments()
        .into_iter()
        .filter(|s| !s.text.is_empty())
        .map(|s| {
            if s.bold {
                Span::styled(
                    s.text.to_string(),
                    Style::default().add_modifier(Modifier::BOLD),
                )
            } else {
                Span::raw(s.text.to_string())
            }
        })
        .collect()
}
