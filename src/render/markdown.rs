//! Line-oriented markdown subset used for agent summaries.
//!
//! Every input line becomes exactly one [`Block`]; consecutive list items
//! are not grouped. Supported: `#`/`##`/`###` headings, `-`/`*` bullets,
//! `1.` ordered items, `**bold**` spans, blank lines and paragraphs.

use regex::Regex;
use std::sync::LazyLock;

static ORDERED_PREFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+\.\s").unwrap());

static BOLD_SPAN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block<'a> {
    Heading { level: u8, text: &'a str },
    Bullet(Inline<'a>),
    Ordered(Inline<'a>),
    Spacer,
    Paragraph(Inline<'a>),
}

/// Inline content of a line after bold formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline<'a> {
    /// No `**...**` pair was found; the text is untouched.
    Plain(&'a str),
    /// Alternating literal / bold segments, starting with a literal one.
    Segments(Vec<Segment<'a>>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub text: &'a str,
    pub bold: bool,
}

impl<'a> Inline<'a> {
    pub fn segments(&self) -> Vec<Segment<'a>> {
        match self {
            Inline::Plain(text) => vec![Segment {
                text: *text,
                bold: false,
            }],
            Inline::Segments(segs) => segs.clone(),
        }
    }

    /// Text with the emphasis markers removed.
    pub fn to_plain_string(&self) -> String {
        match self {
            Inline::Plain(text) => (*text).to_string(),
            Inline::Segments(segs) => segs.iter().map(|s| s.text).collect(),
        }
    }
}

/// Render `text` lazily into one block per `\n`-separated line.
/// `None` and `""` yield nothing.
pub fn render(text: Option<&str>) -> impl Iterator<Item = Block<'_>> {
    text.filter(|t| !t.is_empty())
        .into_iter()
        .flat_map(|t| t.split('\n'))
        .map(render_line)
}

pub fn render_line(line: &str) -> Block<'_> {
    if let Some(rest) = line.strip_prefix("### ") {
        return Block::Heading { level: 3, text: rest };
    }
    if let Some(rest) = line.strip_prefix("## ") {
        return Block::Heading { level: 2, text: rest };
    }
    if let Some(rest) = line.strip_prefix("# ") {
        return Block::Heading { level: 1, text: rest };
    }
    if let Some(rest) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
        return Block::Bullet(format_inline(rest));
    }
    if let Some(m) = ORDERED_PREFIX.find(line) {
        return Block::Ordered(format_inline(&line[m.end()..]));
    }
    if line.trim().is_empty() {
        return Block::Spacer;
    }
    Block::Paragraph(format_inline(line))
}

/// Split on `**text**`: even segments are literal, odd ones bold.
pub fn format_inline(text: &str) -> Inline<'_> {
    let mut segments = Vec::new();
    let mut last = 0;

    for caps in BOLD_SPAN.captures_iter(text) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        segments.push(Segment {
            text: &text[last..whole.start()],
            bold: false,
        });
        segments.push(Segment {
            text: inner.as_str(),
            bold: true,
        });
        last = whole.end();
    }

    if segments.is_empty() {
        return Inline::Plain(text);
    }
    segments.push(Segment {
        text: &text[last..],
        bold: false,
    });
    Inline::Segments(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts<'a>(inline: &Inline<'a>) -> Vec<(&'a str, bool)> {
        inline.segments().iter().map(|s| (s.text, s.bold)).collect()
    }

    #[test]
    fn empty_and_absent_input_render_nothing() {
        assert_eq!(render(None).count(), 0);
        assert_eq!(render(Some("")).count(), 0);
    }

    #[test]
    fn one_block_per_line_in_order() {
        let input = "# A\n\nplain\n- item\n- item two\n2. next";
        let blocks: Vec<_> = render(Some(input)).collect();
        assert_eq!(blocks.len(), input.split('\n').count());
        assert_eq!(blocks[0], Block::Heading { level: 1, text: "A" });
        assert_eq!(blocks[1], Block::Spacer);
        assert_eq!(blocks[2], Block::Paragraph(Inline::Plain("plain")));
        assert_eq!(blocks[3], Block::Bullet(Inline::Plain("item")));
        assert_eq!(blocks[4], Block::Bullet(Inline::Plain("item two")));
        assert_eq!(blocks[5], Block::Ordered(Inline::Plain("next")));
    }

    #[test]
    fn trailing_newline_yields_spacer() {
        let blocks: Vec<_> = render(Some("x\n")).collect();
        assert_eq!(blocks, vec![Block::Paragraph(Inline::Plain("x")), Block::Spacer]);
    }

    #[test]
    fn heading_levels_take_precedence() {
        assert_eq!(render_line("## Title"), Block::Heading { level: 2, text: "Title" });
        assert_eq!(render_line("### Deep"), Block::Heading { level: 3, text: "Deep" });
        // no space: not a heading
        assert_eq!(render_line("##x"), Block::Paragraph(Inline::Plain("##x")));
        // heading text is not bold-formatted
        assert_eq!(
            render_line("# **big**"),
            Block::Heading { level: 1, text: "**big**" }
        );
    }

    #[test]
    fn bullet_with_bold_alternates_segments() {
        let Block::Bullet(inline) = render_line("- **bold** rest") else {
            panic!("expected bullet");
        };
        assert_eq!(texts(&inline), vec![("", false), ("bold", true), (" rest", false)]);
    }

    #[test]
    fn star_bullet() {
        assert_eq!(render_line("* x"), Block::Bullet(Inline::Plain("x")));
    }

    #[test]
    fn ordered_item_ignores_number_value() {
        assert_eq!(render_line("3. step"), Block::Ordered(Inline::Plain("step")));
        assert_eq!(render_line("120.\tstep"), Block::Ordered(Inline::Plain("step")));
        assert_eq!(render_line("3.step"), Block::Paragraph(Inline::Plain("3.step")));
    }

    #[test]
    fn whitespace_only_line_is_spacer() {
        assert_eq!(render_line("   \t"), Block::Spacer);
    }

    #[test]
    fn inline_without_pair_is_untouched() {
        assert_eq!(format_inline("a ** b"), Inline::Plain("a ** b"));
    }

    #[test]
    fn inline_multiple_spans() {
        let inline = format_inline("**a** and **b**");
        assert_eq!(
            texts(&inline),
            vec![("", false), ("a", true), (" and ", false), ("b", true), ("", false)]
        );
        assert_eq!(inline.to_plain_string(), "a and b");
    }

    #[test]
    fn empty_bold_span() {
        let inline = format_inline("x****y");
        assert_eq!(texts(&inline), vec![("x", false), ("", true), ("y", false)]);
    }
}
