//! Async driver for a [`SessionController`].
//!
//! Network effects run on spawned tasks; their completions come back over a
//! channel and are applied one at a time, so the caller is never blocked on I/O.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::data::QuestionBank;
use crate::error::{LoadError, SessionError, SubmitError};
use crate::models::{Credentials, QuizId, SessionStatus};
use crate::session::{Effect, Feedback, SessionController, SessionEvent};

use super::gateway::SubmissionGateway;

pub struct SessionRunner {
    controller: SessionController,
    bank: Arc<dyn QuestionBank>,
    gateway: Arc<dyn SubmissionGateway>,
    tx: mpsc::UnboundedSender<SessionEvent>,
    rx: mpsc::UnboundedReceiver<SessionEvent>,
    in_flight: Option<JoinHandle<()>>,
}

impl SessionRunner {
    pub fn new(bank: Arc<dyn QuestionBank>, gateway: Arc<dyn SubmissionGateway>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        Self {
            controller: SessionController::new(),
            bank,
            gateway,
            tx,
            rx,
            in_flight: None,
        }
    }

    pub fn controller(&self) -> &SessionController {
        &self.controller
    }

    pub fn status(&self) -> SessionStatus {
        self.controller.status()
    }

    pub fn start(&mut self, quiz_id: QuizId, credentials: Arc<Credentials>) -> Result<(), SessionError> {
        let effect = self.controller.start(quiz_id, credentials)?;
        self.dispatch(effect);
        Ok(())
    }

    pub fn select_answer(&mut self, option: impl Into<String>) -> Result<Feedback, SessionError> {
        self.controller.select_answer(option).cloned()
    }

    pub fn advance(&mut self) -> Result<(), SessionError> {
        if let Some(effect) = self.controller.advance()? {
            self.dispatch(effect);
        }
        Ok(())
    }

    pub fn retry(&mut self) -> Result<(), SessionError> {
        let effect = self.controller.retry()?;
        self.dispatch(effect);
        Ok(())
    }

    /// Abandon the session. A call still in flight is cancelled and its
    /// completion, if already queued, is ignored.
    pub fn discard(&mut self) {
        if let Some(task) = self.in_flight.take() {
            task.abort();
        }
        self.controller.discard();
    }

    /// Apply every completion that has already arrived. Returns whether any did.
    pub fn pump(&mut self) -> bool {
        let mut applied = false;
        while let Ok(event) = self.rx.try_recv() {
            self.handle(event);
            applied = true;
        }
        applied
    }

    /// Wait for the next completion and apply it.
    pub async fn next_event(&mut self) -> SessionStatus {
        if let Some(event) = self.rx.recv().await {
            self.handle(event);
        }
        self.status()
    }

    /// Wait until no network call is outstanding.
    pub async fn settle(&mut self) -> SessionStatus {
        while self.status().is_busy() {
            self.next_event().await;
        }
        self.status()
    }

    fn handle(&mut self, event: SessionEvent) {
        if let Some(effect) = self.controller.apply(event) {
            self.dispatch(effect);
        }
    }

    fn dispatch(&mut self, effect: Effect) {
        let tx = self.tx.clone();

        let task = match effect {
            Effect::Load(request) => {
                let bank = Arc::clone(&self.bank);
                let ticket = request.ticket;
                supervise(
                    async move { bank.load(&request.quiz_id, &request.credentials).await },
                    LoadError::Unavailable,
                    move |outcome| {
                        let _ = tx.send(SessionEvent::Loaded { ticket, outcome });
                    },
                )
            }
            Effect::Submit(request) => {
                let gateway = Arc::clone(&self.gateway);
                let ticket = request.ticket;
                supervise(
                    async move { gateway.submit(&request).await },
                    SubmitError::Unavailable,
                    move |outcome| {
                        let _ = tx.send(SessionEvent::Submitted { ticket, outcome });
                    },
                )
            }
        };

        self.in_flight = Some(task);
    }
}

/// Aborts the wrapped task when dropped.
struct AbortOnDrop<T>(JoinHandle<T>);

impl<T> Drop for AbortOnDrop<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Run `work` on its own task and always hand an outcome to `deliver`. A task
/// that panics is reported through `crashed` instead of going silent.
fn supervise<T, E, W, C, D>(work: W, crashed: C, deliver: D) -> JoinHandle<()>
where
    T: Send + 'static,
    E: Send + 'static,
    W: Future<Output = Result<T, E>> + Send + 'static,
    C: FnOnce(String) -> E + Send + 'static,
    D: FnOnce(Result<T, E>) + Send + 'static,
{
    tokio::spawn(async move {
        let mut worker = AbortOnDrop(tokio::spawn(work));
        let outcome = match (&mut worker.0).await {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::error!("Network task failed: {}", err);
                Err(crashed(format!("network task failed: {}", err)))
            }
        };
        deliver(outcome);
    })
}

impl Drop for SessionRunner {
    fn drop(&mut self) {
        if let Some(task) = self.in_flight.take() {
            task.abort();
        }
    }
}
