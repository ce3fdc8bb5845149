mod question;
mod result;
mod state;

pub use question::{Credentials, Question, Quiz, QuizId, UserId};
pub use result::{POINTS_PER_QUESTION, QuizResult};
pub use state::{FailedStage, SessionStatus};
