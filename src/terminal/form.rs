use ratatui::crossterm::event::{KeyCode, KeyEvent};

/// Largest batch the compose form will ask the agent for.
pub const MAX_EMAIL_COUNT: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Channel,
    Count,
}

pub enum FormAction {
    None,
    Submit,
    Escape,
}

/// What a valid submit asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeRequest {
    pub channel: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ComposeForm {
    pub channel: String,
    pub count: String,
    pub field: FormField,
    pub error: Option<String>,
}

impl ComposeForm {
    pub fn new(channel: Option<&str>, count: usize) -> Self {
        Self {
            channel: channel.unwrap_or_default().to_string(),
            count: count.to_string(),
            field: FormField::Channel,
            error: None,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormAction {
        match key.code {
            KeyCode::Esc => return FormAction::Escape,
            KeyCode::Enter => return FormAction::Submit,
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.field = match self.field {
                    FormField::Channel => FormField::Count,
                    FormField::Count => FormField::Channel,
                };
            }
            KeyCode::Backspace => {
                self.active_mut().pop();
            }
            KeyCode::Char(c) => {
                // the count field only takes digits
                if self.field == FormField::Channel || c.is_ascii_digit() {
                    self.active_mut().push(c);
                }
            }
            _ => {}
        }
        FormAction::None
    }

    fn active_mut(&mut self) -> &mut String {
        match self.field {
            FormField::Channel => &mut self.channel,
            FormField::Count => &mut self.count,
        }
    }

    /// Validate the inputs, recording the message on failure.
    pub fn submit(&mut self) -> Option<ComposeRequest> {
        let res = self.validate();
        self.error = res.as_ref().err().cloned();
        res.ok()
    }

    fn validate(&self) -> Result<ComposeRequest, String> {
        if self.channel.trim().trim_start_matches('#').trim().is_empty() {
            return Err(EMPTY_CHANNEL.to_string());
        }
        let count: usize = self
            .count
            .trim()
            .parse()
            .map_err(|_| "Email count must be a number".to_string())?;
        compose_request(&self.channel, count)
    }
}

const EMPTY_CHANNEL: &str = "Please enter a Slack channel";

/// Checks shared by the compose form and `send`: a non-empty channel
/// (leading `#` optional) and a count in `1..=MAX_EMAIL_COUNT`.
pub fn compose_request(channel: &str, count: usize) -> Result<ComposeRequest, String> {
    let channel = channel.trim().trim_start_matches('#').trim();
    if channel.is_empty() {
        return Err(EMPTY_CHANNEL.to_string());
    }
    if !(1..=MAX_EMAIL_COUNT).contains(&count) {
        return Err(format!("Email count must be between 1 and {MAX_EMAIL_COUNT}"));
    }
    Ok(ComposeRequest {
        channel: channel.to_string(),
        count,
    })
}
