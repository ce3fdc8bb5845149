//! The quiz session engine: answer storage, scoring and the session state machine.

mod answers;
mod controller;
mod scorer;

pub use answers::AnswerStore;
pub use controller::{
    Effect, Failure, Feedback, LoadRequest, SessionController, SessionEvent, SubmitRequest, Ticket,
};
pub use scorer::{breakdown, score};
