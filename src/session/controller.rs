//! Quiz session state machine.
//!
//! The controller never performs I/O. Commands that need the network return an
//! [`Effect`] carrying a [`Ticket`]; the caller runs it and hands the outcome back
//! as a [`SessionEvent`]. Only the event whose ticket matches the outstanding call
//! is applied, so completions from a discarded session are dropped.

use std::sync::Arc;

use uuid::Uuid;

use crate::error::{LoadError, SessionError, SubmitError};
use crate::models::{Credentials, FailedStage, Question, Quiz, QuizId, QuizResult, SessionStatus};

use super::answers::AnswerStore;
use super::scorer;

/// Identifies one outstanding network call of one live session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    liveness: Uuid,
    call: u64,
}

#[derive(Debug, Clone)]
pub struct LoadRequest {
    pub ticket: Ticket,
    pub quiz_id: QuizId,
    pub credentials: Arc<Credentials>,
}

#[derive(Debug, Clone)]
pub struct SubmitRequest {
    pub ticket: Ticket,
    pub quiz_id: QuizId,
    pub credentials: Arc<Credentials>,
    /// Same value on every retry of this session's submission.
    pub submission_token: Uuid,
    pub answers: Vec<Option<String>>,
}

/// Network work requested by the controller.
#[derive(Debug, Clone)]
pub enum Effect {
    Load(LoadRequest),
    Submit(SubmitRequest),
}

/// Completion of an [`Effect`], delivered back to the controller.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    Loaded {
        ticket: Ticket,
        outcome: Result<Quiz, LoadError>,
    },
    Submitted {
        ticket: Ticket,
        outcome: Result<QuizResult, SubmitError>,
    },
}

/// The error that moved the session into `Failed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    Load(LoadError),
    Submit(SubmitError),
}

impl Failure {
    pub fn stage(&self) -> FailedStage {
        match self {
            Self::Load(_) => FailedStage::Load,
            Self::Submit(_) => FailedStage::Submit,
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Load(err) => err.is_retryable(),
            Self::Submit(err) => err.is_retryable(),
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::Load(err) => err.to_string(),
            Self::Submit(err) => err.to_string(),
        }
    }
}

/// Immediate verdict on the answer just selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub is_correct: bool,
    pub correct_option: String,
}

impl Feedback {
    fn for_answer(question: &Question, answer: &str) -> Self {
        Self {
            is_correct: question.is_correct(answer),
            correct_option: question.correct_option.clone(),
        }
    }

    pub fn message(&self) -> String {
        if self.is_correct {
            "Correct! Well done!".to_string()
        } else {
            format!("Incorrect. The correct answer is: {}", self.correct_option)
        }
    }
}

/// Owns one learner's attempt at one quiz.
#[derive(Debug)]
pub struct SessionController {
    status: SessionStatus,
    liveness: Uuid,
    next_call: u64,
    pending: Option<Ticket>,
    quiz_id: Option<QuizId>,
    credentials: Option<Arc<Credentials>>,
    quiz: Option<Arc<Quiz>>,
    current_index: usize,
    answers: AnswerStore,
    feedback: Option<Feedback>,
    submission_token: Option<Uuid>,
    provisional: Option<QuizResult>,
    result: Option<QuizResult>,
    failure: Option<Failure>,
}

impl SessionController {
    pub fn new() -> Self {
        Self {
            status: SessionStatus::NotStarted,
            liveness: Uuid::new_v4(),
            next_call: 0,
            pending: None,
            quiz_id: None,
            credentials: None,
            quiz: None,
            current_index: 0,
            answers: AnswerStore::default(),
            feedback: None,
            submission_token: None,
            provisional: None,
            result: None,
            failure: None,
        }
    }

    /// Request the question bank for `quiz_id`.
    pub fn start(
        &mut self,
        quiz_id: QuizId,
        credentials: Arc<Credentials>,
    ) -> Result<Effect, SessionError> {
        self.expect_status("start", SessionStatus::NotStarted)?;

        tracing::info!("Starting quiz {} for user {}", quiz_id, credentials.user_id);
        self.quiz_id = Some(quiz_id);
        self.credentials = Some(credentials);
        self.enter_loading("start")
    }

    /// Record `option` as the answer to the current question.
    pub fn select_answer(&mut self, option: impl Into<String>) -> Result<&Feedback, SessionError> {
        self.expect_status("select an answer", SessionStatus::InProgress)?;
        let quiz = self.loaded_quiz("select an answer")?;
        let option = option.into();

        let feedback = quiz
            .questions
            .get(self.current_index)
            .map(|question| Feedback::for_answer(question, &option))
            .ok_or_else(|| SessionError::invalid("select an answer", self.status))?;
        self.answers.set(self.current_index, option)?;

        Ok(self.feedback.insert(feedback))
    }

    /// Move to the next question, or score and submit after the last one.
    pub fn advance(&mut self) -> Result<Option<Effect>, SessionError> {
        self.expect_status("advance", SessionStatus::InProgress)?;
        self.feedback = None;

        if self.current_index + 1 < self.total_questions() {
            self.current_index += 1;
            tracing::debug!("Advanced to question {}", self.current_index + 1);
            return Ok(None);
        }

        self.enter_submitting("advance").map(Some)
    }

    /// Re-issue the call that failed, with the same quiz id or submission token.
    pub fn retry(&mut self) -> Result<Effect, SessionError> {
        let retryable = self.failure.as_ref().is_some_and(Failure::is_retryable);

        match self.status {
            SessionStatus::Failed(FailedStage::Load) if retryable => {
                tracing::info!("Retrying load of quiz {:?}", self.quiz_id);
                self.failure = None;
                self.enter_loading("retry")
            }
            SessionStatus::Failed(FailedStage::Submit) if retryable => {
                tracing::info!("Retrying submission {:?}", self.submission_token);
                self.failure = None;
                self.enter_submitting("retry")
            }
            status => Err(SessionError::invalid("retry", status)),
        }
    }

    /// Apply the completion of a network call.
    ///
    /// Events whose ticket is not the outstanding one are ignored. May return a
    /// follow-up effect (an empty quiz is submitted as soon as it loads).
    pub fn apply(&mut self, event: SessionEvent) -> Option<Effect> {
        let ticket = match &event {
            SessionEvent::Loaded { ticket, .. } | SessionEvent::Submitted { ticket, .. } => *ticket,
        };
        if self.pending != Some(ticket) {
            tracing::debug!("Dropping stale completion {:?}", ticket);
            return None;
        }
        self.pending = None;

        match event {
            SessionEvent::Loaded { outcome, .. } => self.on_loaded(outcome),
            SessionEvent::Submitted { outcome, .. } => {
                self.on_submitted(outcome);
                None
            }
        }
    }

    /// Tear the session down. Outstanding completions will be dropped.
    pub fn discard(&mut self) {
        if self.pending.is_some() {
            tracing::info!("Discarding session with a call in flight");
        }
        *self = Self::new();
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn quiz_id(&self) -> Option<&QuizId> {
        self.quiz_id.as_ref()
    }

    pub fn quiz(&self) -> Option<&Quiz> {
        self.quiz.as_deref()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> Option<&Question> {
        if self.status != SessionStatus::InProgress {
            return None;
        }
        self.quiz()?.questions.get(self.current_index)
    }

    pub fn total_questions(&self) -> usize {
        self.quiz().map_or(0, Quiz::total_questions)
    }

    pub fn is_last_question(&self) -> bool {
        self.current_index + 1 >= self.total_questions()
    }

    pub fn answers(&self) -> &AnswerStore {
        &self.answers
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    pub fn submission_token(&self) -> Option<Uuid> {
        self.submission_token
    }

    /// Locally computed result, available from the moment answers are submitted.
    pub fn provisional_result(&self) -> Option<QuizResult> {
        self.provisional
    }

    /// Result acknowledged by the backend. Present only once completed.
    pub fn result(&self) -> Option<QuizResult> {
        self.result
    }

    pub fn failure(&self) -> Option<&Failure> {
        self.failure.as_ref()
    }

    /// Which questions were answered correctly, once answers are final.
    pub fn breakdown(&self) -> Vec<bool> {
        match self.quiz() {
            Some(quiz) if self.answers.is_sealed() => scorer::breakdown(quiz, self.answers.as_slice()),
            _ => Vec::new(),
        }
    }

    pub fn progress_percent(&self) -> f64 {
        match self.status {
            SessionStatus::InProgress => {
                let total = self.total_questions();
                if total == 0 {
                    100.0
                } else {
                    (self.current_index + 1) as f64 / total as f64 * 100.0
                }
            }
            SessionStatus::Submitting
            | SessionStatus::Completed
            | SessionStatus::Failed(FailedStage::Submit) => 100.0,
            _ => 0.0,
        }
    }

    fn on_loaded(&mut self, outcome: Result<Quiz, LoadError>) -> Option<Effect> {
        match outcome {
            Ok(quiz) => {
                tracing::info!("Loaded quiz {} with {} questions", quiz.id, quiz.total_questions());
                self.answers = AnswerStore::new(quiz.total_questions());
                self.current_index = 0;
                self.quiz = Some(Arc::new(quiz));
                self.status = SessionStatus::InProgress;

                if self.total_questions() == 0 {
                    return self.enter_submitting("finish an empty quiz").ok();
                }
                None
            }
            Err(err) => {
                tracing::warn!("Failed to load quiz {:?}: {}", self.quiz_id, err);
                self.fail(Failure::Load(err));
                None
            }
        }
    }

    fn on_submitted(&mut self, outcome: Result<QuizResult, SubmitError>) {
        match outcome.and_then(|result| self.check_result(result)) {
            Ok(result) => {
                if self.provisional.is_some_and(|provisional| provisional != result) {
                    tracing::warn!(
                        "Backend result {:?} differs from local score {:?}",
                        result,
                        self.provisional
                    );
                }
                tracing::info!(
                    "Quiz {:?} completed: {}/{}",
                    self.quiz_id,
                    result.score,
                    result.total_questions
                );
                self.result = Some(result);
                self.status = SessionStatus::Completed;
            }
            Err(err) => {
                tracing::warn!("Submission {:?} failed: {}", self.submission_token, err);
                self.fail(Failure::Submit(err));
            }
        }
    }

    /// The backend result must describe the quiz that was actually taken.
    fn check_result(&self, result: QuizResult) -> Result<QuizResult, SubmitError> {
        let total = self.total_questions();
        if result.total_questions as usize != total || !result.is_consistent() {
            return Err(SubmitError::Rejected(format!(
                "backend returned {}/{} for {} points on a quiz of {} questions",
                result.score, result.total_questions, result.points_earned, total
            )));
        }
        Ok(result)
    }

    fn enter_loading(&mut self, command: &'static str) -> Result<Effect, SessionError> {
        let (quiz_id, credentials) = match (&self.quiz_id, &self.credentials) {
            (Some(quiz_id), Some(credentials)) => (quiz_id.clone(), Arc::clone(credentials)),
            _ => return Err(SessionError::invalid(command, self.status)),
        };

        self.status = SessionStatus::Loading;
        Ok(Effect::Load(LoadRequest {
            ticket: self.issue_ticket(),
            quiz_id,
            credentials,
        }))
    }

    fn enter_submitting(&mut self, command: &'static str) -> Result<Effect, SessionError> {
        let quiz = self.loaded_quiz(command)?;
        let (quiz_id, credentials) = match (&self.quiz_id, &self.credentials) {
            (Some(quiz_id), Some(credentials)) => (quiz_id.clone(), Arc::clone(credentials)),
            _ => return Err(SessionError::invalid(command, self.status)),
        };

        self.answers.seal();
        let provisional = scorer::score(&quiz, self.answers.as_slice());
        let submission_token = *self.submission_token.get_or_insert_with(Uuid::new_v4);

        tracing::info!(
            "Submitting quiz {} with token {} (local score {}/{})",
            quiz_id,
            submission_token,
            provisional.score,
            provisional.total_questions
        );
        self.provisional = Some(provisional);
        self.status = SessionStatus::Submitting;

        Ok(Effect::Submit(SubmitRequest {
            ticket: self.issue_ticket(),
            quiz_id,
            credentials,
            submission_token,
            answers: self.answers.as_slice().to_vec(),
        }))
    }

    fn fail(&mut self, failure: Failure) {
        self.status = SessionStatus::Failed(failure.stage());
        self.failure = Some(failure);
    }

    fn issue_ticket(&mut self) -> Ticket {
        self.next_call += 1;
        let ticket = Ticket {
            liveness: self.liveness,
            call: self.next_call,
        };
        self.pending = Some(ticket);
        ticket
    }

    fn loaded_quiz(&self, command: &'static str) -> Result<Arc<Quiz>, SessionError> {
        self.quiz
            .clone()
            .ok_or_else(|| SessionError::invalid(command, self.status))
    }

    fn expect_status(&self, command: &'static str, expected: SessionStatus) -> Result<(), SessionError> {
        if self.status == expected {
            Ok(())
        } else {
            Err(SessionError::invalid(command, self.status))
        }
    }
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new()
    }
}
