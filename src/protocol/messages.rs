//! Wire format of the quiz backend.
//!
//! All bodies are JSON. Question banks come from `GET /quizzes/{quizId}`,
//! answers go to `POST /quizzes/{quizId}/user/{userId}/take`.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::LoadError;
use crate::models::{Question, Quiz, QuizId};

/// Allowed number of options per question.
pub const MIN_OPTIONS: usize = 2;
pub const MAX_OPTIONS: usize = 4;

/// Identifier that the backend may send as a number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum WireId {
    Number(i64),
    Text(String),
}

impl fmt::Display for WireId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireId::Number(n) => write!(f, "{}", n),
            WireId::Text(s) => f.write_str(s),
        }
    }
}

/// Question bank response: a bare list, or a quiz object wrapping the list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum QuestionBankPayload {
    Titled {
        #[serde(default)]
        id: Option<WireId>,
        title: String,
        questions: Vec<QuestionPayload>,
    },
    Bare(Vec<QuestionPayload>),
}

impl QuestionBankPayload {
    /// Quiz id carried by the payload, if any.
    pub fn declared_id(&self) -> Option<String> {
        match self {
            QuestionBankPayload::Titled { id, .. } => id.as_ref().map(WireId::to_string),
            QuestionBankPayload::Bare(_) => None,
        }
    }

    /// Validate the payload and build the session's quiz.
    pub fn into_quiz(self, quiz_id: &QuizId) -> Result<Quiz, LoadError> {
        let (title, questions) = match self {
            QuestionBankPayload::Titled { id, title, questions } => {
                if let Some(id) = id {
                    if id.to_string() != quiz_id.as_str() {
                        return Err(LoadError::Malformed(format!(
                            "asked for quiz {} but received quiz {}",
                            quiz_id, id
                        )));
                    }
                }
                (title, questions)
            }
            QuestionBankPayload::Bare(questions) => (format!("Quiz {}", quiz_id), questions),
        };

        let questions = questions
            .into_iter()
            .map(QuestionPayload::into_question)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Quiz {
            id: quiz_id.clone(),
            title,
            questions,
        })
    }
}

/// One question object. Options arrive either as `option1..option4` or as an
/// `options` list.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionPayload {
    pub id: WireId,
    #[serde(alias = "text")]
    pub question_text: String,
    #[serde(default)]
    pub option1: Option<String>,
    #[serde(default)]
    pub option2: Option<String>,
    #[serde(default)]
    pub option3: Option<String>,
    #[serde(default)]
    pub option4: Option<String>,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default, alias = "correctOption")]
    pub correct_answer: Option<String>,
}

impl QuestionPayload {
    pub fn into_question(self) -> Result<Question, LoadError> {
        let id = self.id.to_string();
        let options = if self.options.is_empty() {
            [self.option1, self.option2, self.option3, self.option4]
                .into_iter()
                .flatten()
                .collect()
        } else {
            self.options
        };

        if !(MIN_OPTIONS..=MAX_OPTIONS).contains(&options.len()) {
            return Err(LoadError::Malformed(format!(
                "question {} has {} option(s)",
                id,
                options.len()
            )));
        }

        let correct_option = self.correct_answer.ok_or_else(|| {
            LoadError::Malformed(format!("question {} has no correct answer", id))
        })?;
        if !options.contains(&correct_option) {
            return Err(LoadError::Malformed(format!(
                "correct answer of question {} is not one of its options",
                id
            )));
        }

        Ok(Question {
            id,
            text: self.question_text,
            options,
            correct_option,
        })
    }
}

/// Body of the take-quiz request. Unanswered positions are `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionBody {
    pub submission_token: Uuid,
    pub answers: Vec<Option<String>>,
}

/// Error body some backend endpoints return.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_question_list() {
        let json = r#"[
            {"id": 1, "questionText": "What is JSX?", "option1": "JavaScript XML",
             "option2": "JSON XML", "correctAnswer": "JavaScript XML"}
        ]"#;
        let payload: QuestionBankPayload = serde_json::from_str(json).unwrap();
        let quiz = payload.into_quiz(&QuizId::new("3")).unwrap();

        assert_eq!(quiz.title, "Quiz 3");
        assert_eq!(quiz.questions.len(), 1);
        assert_eq!(quiz.questions[0].id, "1");
        assert_eq!(quiz.questions[0].options, vec!["JavaScript XML", "JSON XML"]);
        assert_eq!(quiz.questions[0].correct_option, "JavaScript XML");
    }

    #[test]
    fn test_titled_quiz_with_option_list() {
        let json = r#"{"id": "3", "title": "React Basics Quiz", "questions": [
            {"id": "q1", "text": "Which hook is used for side effects?",
             "options": ["useState", "useEffect", "useContext", "useReducer"],
             "correctAnswer": "useEffect"}
        ]}"#;
        let payload: QuestionBankPayload = serde_json::from_str(json).unwrap();
        let quiz = payload.into_quiz(&QuizId::new("3")).unwrap();

        assert_eq!(quiz.title, "React Basics Quiz");
        assert_eq!(quiz.questions[0].options.len(), 4);
    }

    #[test]
    fn test_titled_quiz_id_mismatch() {
        let json = r#"{"id": 9, "title": "Other", "questions": []}"#;
        let payload: QuestionBankPayload = serde_json::from_str(json).unwrap();
        assert!(matches!(
            payload.into_quiz(&QuizId::new("3")),
            Err(LoadError::Malformed(_))
        ));
    }

    #[test]
    fn test_question_without_correct_answer_is_malformed() {
        let json = r#"[{"id": 1, "questionText": "Q", "option1": "a", "option2": "b"}]"#;
        let payload: QuestionBankPayload = serde_json::from_str(json).unwrap();
        assert!(matches!(
            payload.into_quiz(&QuizId::new("1")),
            Err(LoadError::Malformed(_))
        ));
    }

    #[test]
    fn test_option_count_is_checked() {
        let json = r#"[{"id": 1, "questionText": "Q", "option1": "a", "correctAnswer": "a"}]"#;
        let payload: QuestionBankPayload = serde_json::from_str(json).unwrap();
        assert!(payload.into_quiz(&QuizId::new("1")).is_err());

        let json = r#"[{"id": 1, "questionText": "Q", "options": ["a","b","c","d","e"],
                        "correctAnswer": "a"}]"#;
        let payload: QuestionBankPayload = serde_json::from_str(json).unwrap();
        assert!(payload.into_quiz(&QuizId::new("1")).is_err());
    }

    #[test]
    fn test_correct_answer_must_be_an_option() {
        let json = r#"[{"id": 1, "questionText": "Q", "option1": "a", "option2": "b",
                        "correctAnswer": "c"}]"#;
        let payload: QuestionBankPayload = serde_json::from_str(json).unwrap();
        assert!(payload.into_quiz(&QuizId::new("1")).is_err());
    }

    #[test]
    fn test_submission_body_serialization() {
        let body = SubmissionBody {
            submission_token: Uuid::nil(),
            answers: vec![Some("A".to_string()), None],
        };
        let json = serde_json::to_string(&body).unwrap();

        assert!(json.contains("\"submissionToken\":\"00000000-0000-0000-0000-000000000000\""));
        assert!(json.contains("\"answers\":[\"A\",null]"));
    }
}
