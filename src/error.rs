//! Failure taxonomy of the quiz session engine.

use thiserror::Error;

use crate::models::SessionStatus;

/// Why the question bank could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("quiz not found")]
    NotFound,
    #[error("not signed in or session expired")]
    Unauthorized,
    #[error("quiz data is invalid: {0}")]
    Malformed(String),
    #[error("quiz service unavailable: {0}")]
    Unavailable(String),
}

impl LoadError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

/// Why a submission did not produce a result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("submission rejected: {0}")]
    Rejected(String),
    #[error("submission service unavailable: {0}")]
    Unavailable(String),
}

impl SubmitError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

/// A command was issued that the current session state does not allow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("cannot {command} while the session is {status}")]
    InvalidState {
        command: &'static str,
        status: SessionStatus,
    },
    #[error("answers are final once submitted")]
    AnswersSealed,
    #[error("question {index} is past the last of {total} questions")]
    NoSuchQuestion { index: usize, total: usize },
}

impl SessionError {
    pub(crate) fn invalid(command: &'static str, status: SessionStatus) -> Self {
        Self::InvalidState { command, status }
    }
}
