mod loader;

pub use loader::{JsonFileQuestionBank, QuestionBank};
