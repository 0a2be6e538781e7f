use crate::render::markdown::{self, Block};

/// Plain-text rendering for stdout: markers stripped, headings underlined.
pub fn to_plain_text(text: &str) -> String {
    let mut out = Vec::new();
    for block in markdown::render(Some(text)) {
        match block {
            Block::Heading { level, text } => {
                out.push(text.to_string());
                if level == 1 {
                    out.push("=".repeat(text.chars().count()));
                } else if level == 2 {
                    out.push("-".repeat(text.chars().count()));
                }
            }
            Block::Bullet(inline) => out.push(format!("  * {}", inline.to_plain_string())),
            Block::Ordered(inline) => out.push(format!("  - {}", inline.to_plain_string())),
            Block::Spacer => out.push(String::new()),
            Block::Paragraph(inline) => out.push(inline.to_plain_string()),
        }
    }
    out.join("\n")
}
