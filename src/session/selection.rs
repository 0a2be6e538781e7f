use crate::domain::channel::ChannelId;
use crate::domain::email::EmailId;

/// Emails marked for the next summary (insertion order, no duplicates)
/// plus at most one destination channel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    email_ids: Vec<EmailId>,
    channel_id: Option<ChannelId>,
}

impl Selection {
    pub fn email_ids(&self) -> &[EmailId] {
        &self.email_ids
    }

    pub fn channel_id(&self) -> Option<&str> {
        self.channel_id.as_deref()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.email_ids.iter().any(|x| x == id)
    }

    pub fn len(&self) -> usize {
        self.email_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.email_ids.is_empty()
    }

    pub fn toggle(&mut self, id: &str) {
        if let Some(pos) = self.email_ids.iter().position(|x| x == id) {
            self.email_ids.remove(pos);
        } else {
            self.email_ids.push(id.to_string());
        }
    }

    /// Clear when every loaded email is already selected, otherwise select all.
    pub fn toggle_all(&mut self, loaded: &[EmailId]) {
        if self.email_ids.len() == loaded.len() {
            self.email_ids.clear();
        } else {
            self.set_emails(loaded);
        }
    }

    pub fn set_emails(&mut self, ids: &[EmailId]) {
        self.email_ids.clear();
        for id in ids {
            if !self.contains(id) {
                self.email_ids.push(id.clone());
            }
        }
    }

    /// Replaces the current channel; an empty id clears it.
    pub fn select_channel(&mut self, id: &str) {
        self.channel_id = (!id.is_empty()).then(|| id.to_string());
    }

    /// Drop ids that are no longer loaded.
    pub fn retain_loaded<'a>(
        &mut self,
        emails: impl IntoIterator<Item = &'a str>,
        channels: impl IntoIterator<Item = &'a str>,
    ) {
        let emails: Vec<&str> = emails.into_iter().collect();
        self.email_ids.retain(|id| emails.contains(&id.as_str()));

        let keep = match &self.channel_id {
            Some(ch) => channels.into_iter().any(|c| c == ch.as_str()),
            None => true,
        };
        if !keep {
            self.channel_id = None;
        }
    }

    pub fn clear(&mut self) {
        self.email_ids.clear();
        self.channel_id = None;
    }
}
