use thiserror::Error;

/// Local checks that stop a summary before any request is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please select emails and a Slack channel")]
    NothingSelected,
    #[error("Please select at least one email")]
    NoEmails,
    #[error("Please select a Slack channel")]
    NoChannel,
    #[error("A summary is already being sent")]
    InFlight,
}

/// Everything the UI may show in an error slot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DigestError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The agent answered with `success: false`.
    #[error("{0}")]
    Agent(String),
    /// The request never produced a usable envelope.
    #[error("{0}")]
    Transport(String),
    /// The call worked but returned nothing to show.
    #[error("{0}")]
    Empty(&'static str),
    /// The result was requested before sample mode was switched.
    #[error("Discarded a result from before the data source changed")]
    Stale,
}

impl DigestError {
    /// Soft errors are informational; the UI renders them dimmed.
    pub fn is_soft(&self) -> bool {
        matches!(self, DigestError::Empty(_) | DigestError::Stale)
    }
}
