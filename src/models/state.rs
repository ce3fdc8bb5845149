use std::fmt;

/// Stage at which a session failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailedStage {
    Load,
    Submit,
}

/// Lifecycle of a quiz session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionStatus {
    /// No quiz requested yet.
    #[default]
    NotStarted,
    /// Waiting for the question bank.
    Loading,
    /// Learner is answering questions.
    InProgress,
    /// Answers are scored and on their way to the backend.
    Submitting,
    /// Backend acknowledged the submission.
    Completed,
    /// A network stage failed.
    Failed(FailedStage),
}

impl SessionStatus {
    /// Whether a network call is outstanding.
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Loading | Self::Submitting)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotStarted => f.write_str("not started"),
            Self::Loading => f.write_str("loading"),
            Self::InProgress => f.write_str("in progress"),
            Self::Submitting => f.write_str("submitting"),
            Self::Completed => f.write_str("completed"),
            Self::Failed(FailedStage::Load) => f.write_str("failed to load"),
            Self::Failed(FailedStage::Submit) => f.write_str("failed to submit"),
        }
    }
}
