mod messages;

pub use messages::{
    ErrorBody, MAX_OPTIONS, MIN_OPTIONS, QuestionBankPayload, QuestionPayload, SubmissionBody,
    WireId,
};
