//! # quiz-session
//!
//! Client side engine for taking a quiz against a learning-platform backend:
//! loads a quiz's question bank, walks the learner through it one question at a
//! time, scores the answers and submits them exactly once.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use quiz_session::client::{ApiClient, RetryConfig, RetryingGateway, SessionRunner};
//! use quiz_session::models::{Credentials, QuizId, UserId};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ApiClient::new("http://localhost:8080/api".parse()?, Duration::from_secs(10))?;
//! let gateway = RetryingGateway::new(client.clone(), RetryConfig::default());
//! let mut runner = SessionRunner::new(Arc::new(client), Arc::new(gateway));
//!
//! let credentials = Credentials::new(UserId::new("learner@example.com"), "jwt".into());
//! runner.start(QuizId::new("3"), credentials)?;
//! runner.settle().await;
//!
//! runner.select_answer("JavaScript XML")?;
//! runner.advance()?;
//! runner.settle().await;
//! println!("{:?}", runner.controller().result());
//! # Ok(())
//! # }
//! ```

mod app;
pub mod client;
pub mod config;
pub mod data;
pub mod error;
pub mod logging;
pub mod models;
pub mod protocol;
pub mod session;
pub mod terminal;
mod ui;

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use thiserror::Error;

pub use app::App;
pub use client::ApiClientError;
pub use config::Config;
pub use error::{LoadError, SessionError, SubmitError};
pub use models::{FailedStage, SessionStatus};

/// How long to wait for a key press before checking for network completions.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Error type for running a quiz in the terminal.
#[derive(Debug, Error)]
pub enum QuizError {
    #[error("failed to set up the api client: {0}")]
    Client(#[from] ApiClientError),
    #[error("failed to start the session: {0}")]
    Session(#[from] SessionError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Take the configured quiz in the terminal until the learner quits.
pub async fn run(config: Config) -> Result<(), QuizError> {
    let mut app = App::from_config(&config)?;
    app.begin()?;

    let mut terminal = terminal::TerminalSession::enter()?;
    let result = run_event_loop(&mut terminal, &mut app);
    app.quit();
    result
}

fn run_event_loop(terminal: &mut terminal::AppTerminal, app: &mut App) -> Result<(), QuizError> {
    while !app.should_quit {
        app.pump();
        terminal.draw(|frame| ui::render(frame, app))?;

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                handle_input(app, key.code);
            }
        }
    }

    Ok(())
}

fn handle_input(app: &mut App, key: KeyCode) {
    if matches!(key, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc) {
        app.quit();
        return;
    }

    match app.session().status() {
        SessionStatus::InProgress => handle_quiz_input(app, key),
        SessionStatus::Completed => handle_result_input(app, key),
        SessionStatus::Failed(_) => handle_failed_input(app, key),
        SessionStatus::NotStarted | SessionStatus::Loading | SessionStatus::Submitting => {}
    }
}

fn handle_quiz_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Up | KeyCode::Char('k') => app.select_previous_option(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next_option(),
        KeyCode::Enter | KeyCode::Char(' ') => app.confirm(),
        KeyCode::Right | KeyCode::Char('n') => app.next_question(),
        _ => {}
    }
}

fn handle_result_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Down | KeyCode::Char('j') => app.scroll_results_down(),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_results_up(),
        KeyCode::Char('r') | KeyCode::Char('R') => app.restart(),
        _ => {}
    }
}

fn handle_failed_input(app: &mut App, key: KeyCode) {
    if matches!(key, KeyCode::Char('r') | KeyCode::Char('R') | KeyCode::Enter) {
        app.retry();
    }
}
