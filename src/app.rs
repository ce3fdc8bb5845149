use std::sync::Arc;

use crate::QuizError;
use crate::client::{ApiClient, LocalGateway, RetryingGateway, SessionRunner};
use crate::config::Config;
use crate::data::{JsonFileQuestionBank, QuestionBank};
use crate::error::SessionError;
use crate::models::{Credentials, QuizId};
use crate::session::SessionController;

/// Terminal front end state around one quiz session.
pub struct App {
    runner: SessionRunner,
    quiz_id: QuizId,
    credentials: Arc<Credentials>,
    selected_option: usize,
    result_scroll: usize,
    notice: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(runner: SessionRunner, quiz_id: QuizId, credentials: Arc<Credentials>) -> Self {
        Self {
            runner,
            quiz_id,
            credentials,
            selected_option: 0,
            result_scroll: 0,
            notice: None,
            should_quit: false,
        }
    }

    /// Wire the session to the backend, or to a local file in practice mode.
    pub fn from_config(config: &Config) -> Result<Self, QuizError> {
        let runner = match &config.practice {
            Some(path) => {
                let bank: Arc<dyn QuestionBank> = Arc::new(JsonFileQuestionBank::new(path));
                let gateway = Arc::new(LocalGateway::new(Arc::clone(&bank)));
                SessionRunner::new(bank, gateway)
            }
            None => {
                let client = ApiClient::new(config.api_url.clone(), config.timeout())?;
                let gateway = RetryingGateway::new(client.clone(), config.retry_config());
                SessionRunner::new(Arc::new(client), Arc::new(gateway))
            }
        };

        Ok(Self::new(runner, config.quiz_id(), config.credentials()))
    }

    pub fn begin(&mut self) -> Result<(), SessionError> {
        self.runner
            .start(self.quiz_id.clone(), Arc::clone(&self.credentials))
    }

    pub fn session(&self) -> &SessionController {
        self.runner.controller()
    }

    pub fn runner_mut(&mut self) -> &mut SessionRunner {
        &mut self.runner
    }

    /// Apply finished network calls. Returns whether the session changed.
    pub fn pump(&mut self) -> bool {
        self.runner.pump()
    }

    pub fn selected_option(&self) -> usize {
        self.selected_option
    }

    pub fn result_scroll(&self) -> usize {
        self.result_scroll
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    fn option_count(&self) -> usize {
        self.session()
            .current_question()
            .map_or(0, |question| question.options.len())
    }

    pub fn select_next_option(&mut self) {
        let count = self.option_count();
        if count > 0 {
            self.selected_option = (self.selected_option + 1) % count;
        }
    }

    pub fn select_previous_option(&mut self) {
        let count = self.option_count();
        if count > 0 {
            self.selected_option = (self.selected_option + count - 1) % count;
        }
    }

    /// Record the highlighted option, or move on if it is already recorded.
    pub fn confirm(&mut self) {
        let session = self.session();
        let Some(option) = session
            .current_question()
            .and_then(|question| question.options.get(self.selected_option))
            .cloned()
        else {
            return;
        };

        let already_chosen = session.answers().get(session.current_index()) == Some(option.as_str());
        if already_chosen {
            self.next_question();
        } else {
            let outcome = self.runner.select_answer(option).map(|_| ());
            self.note(outcome);
        }
    }

    pub fn next_question(&mut self) {
        let outcome = self.runner.advance();
        if outcome.is_ok() {
            self.selected_option = 0;
        }
        self.note(outcome);
    }

    pub fn retry(&mut self) {
        let outcome = self.runner.retry();
        self.note(outcome);
    }

    /// Start a fresh attempt at the same quiz.
    pub fn restart(&mut self) {
        self.runner.discard();
        self.selected_option = 0;
        self.result_scroll = 0;
        let outcome = self.begin();
        self.note(outcome);
    }

    pub fn scroll_results_down(&mut self) {
        let max_scroll = self.session().total_questions().saturating_sub(1);
        self.result_scroll = (self.result_scroll + 1).min(max_scroll);
    }

    pub fn scroll_results_up(&mut self) {
        self.result_scroll = self.result_scroll.saturating_sub(1);
    }

    pub fn quit(&mut self) {
        self.runner.discard();
        self.should_quit = true;
    }

    fn note(&mut self, outcome: Result<(), SessionError>) {
        self.notice = outcome.err().map(|err| {
            tracing::debug!("Command refused: {}", err);
            err.to_string()
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SessionStatus, UserId};

    fn practice_app(json: &str) -> (App, std::path::PathBuf) {
        let path = std::env::temp_dir().join(format!("quiz-app-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, json).unwrap();

        let bank: Arc<dyn QuestionBank> = Arc::new(JsonFileQuestionBank::new(&path));
        let gateway = Arc::new(LocalGateway::new(Arc::clone(&bank)));
        let app = App::new(
            SessionRunner::new(bank, gateway),
            QuizId::new("1"),
            Credentials::new(UserId::new("practice"), String::new()),
        );
        (app, path)
    }

    const QUIZ: &str = r#"{"id": 1, "title": "React Basics Quiz", "questions": [
        {"id": 1, "text": "What is JSX?", "options": ["JavaScript XML", "JSON XML"],
         "correctAnswer": "JavaScript XML"},
        {"id": 2, "text": "Which hook runs side effects?", "options": ["useState", "useEffect"],
         "correctAnswer": "useEffect"}
    ]}"#;

    #[tokio::test]
    async fn test_keyboard_flow_through_practice_quiz() {
        let (mut app, path) = practice_app(QUIZ);
        app.begin().unwrap();
        assert_eq!(app.runner_mut().settle().await, SessionStatus::InProgress);

        // First question: pick the highlighted option, then move on.
        app.confirm();
        assert_eq!(app.session().answers().get(0), Some("JavaScript XML"));
        assert!(app.session().feedback().is_some_and(|f| f.is_correct));
        app.confirm();
        assert_eq!(app.session().current_index(), 1);

        // Second question: option cursor wraps around.
        app.select_previous_option();
        assert_eq!(app.selected_option(), 1);
        app.confirm();
        app.confirm();

        assert_eq!(app.runner_mut().settle().await, SessionStatus::Completed);
        let result = app.session().result().unwrap();
        assert_eq!((result.score, result.points_earned), (2, 200));
        assert!(app.notice().is_none());

        std::fs::remove_file(path).unwrap();
    }

    #[tokio::test]
    async fn test_refused_command_sets_notice() {
        let (mut app, path) = practice_app(QUIZ);
        app.begin().unwrap();
        app.retry();

        assert!(app.notice().is_some());
        std::fs::remove_file(path).unwrap();
    }

    #[tokio::test]
    async fn test_restart_begins_new_attempt() {
        let (mut app, path) = practice_app(QUIZ);
        app.begin().unwrap();
        app.runner_mut().settle().await;
        app.next_question();
        app.next_question();
        app.runner_mut().settle().await;
        let first_token = app.session().submission_token();

        app.restart();
        assert_eq!(app.runner_mut().settle().await, SessionStatus::InProgress);
        assert!(app.session().submission_token().is_none());
        assert!(first_token.is_some());

        std::fs::remove_file(path).unwrap();
    }
}
