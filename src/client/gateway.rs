use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use crate::data::QuestionBank;
use crate::error::SubmitError;
use crate::models::QuizResult;
use crate::session::{self, SubmitRequest};

/// Delivers a session's final answers and returns the recorded result.
///
/// Implementations must treat requests sharing a `submission_token` as the same
/// attempt.
#[async_trait]
pub trait SubmissionGateway: Send + Sync {
    async fn submit(&self, request: &SubmitRequest) -> Result<QuizResult, SubmitError>;
}

#[async_trait]
impl<T: SubmissionGateway + ?Sized> SubmissionGateway for Arc<T> {
    async fn submit(&self, request: &SubmitRequest) -> Result<QuizResult, SubmitError> {
        (**self).submit(request).await
    }
}

/// In-process gateway for offline practice.
///
/// Scores with the local scorer against its question bank and records one
/// attempt per submission token.
pub struct LocalGateway {
    bank: Arc<dyn QuestionBank>,
    attempts: Mutex<HashMap<Uuid, QuizResult>>,
}

impl LocalGateway {
    pub fn new(bank: Arc<dyn QuestionBank>) -> Self {
        Self {
            bank,
            attempts: Mutex::new(HashMap::new()),
        }
    }

    /// Number of distinct attempts recorded.
    pub fn attempt_count(&self) -> usize {
        self.attempts.lock().map_or(0, |attempts| attempts.len())
    }

    fn recorded(&self, token: &Uuid) -> Result<Option<QuizResult>, SubmitError> {
        let attempts = self
            .attempts
            .lock()
            .map_err(|_| SubmitError::Unavailable("attempt log poisoned".to_string()))?;
        Ok(attempts.get(token).copied())
    }
}

#[async_trait]
impl SubmissionGateway for LocalGateway {
    async fn submit(&self, request: &SubmitRequest) -> Result<QuizResult, SubmitError> {
        if let Some(result) = self.recorded(&request.submission_token)? {
            tracing::debug!("Replaying attempt {}", request.submission_token);
            return Ok(result);
        }

        let quiz = self
            .bank
            .load(&request.quiz_id, &request.credentials)
            .await
            .map_err(|err| SubmitError::Rejected(err.to_string()))?;
        let result = session::score(&quiz, &request.answers);

        let mut attempts = self
            .attempts
            .lock()
            .map_err(|_| SubmitError::Unavailable("attempt log poisoned".to_string()))?;
        Ok(*attempts.entry(request.submission_token).or_insert(result))
    }
}
