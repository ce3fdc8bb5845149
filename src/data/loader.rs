use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::LoadError;
use crate::models::{Credentials, Quiz, QuizId};
use crate::protocol::QuestionBankPayload;

/// Source of the ordered question set of a quiz.
#[async_trait]
pub trait QuestionBank: Send + Sync {
    async fn load(&self, quiz_id: &QuizId, credentials: &Credentials) -> Result<Quiz, LoadError>;
}

/// Question bank backed by a JSON file, used for offline practice.
///
/// The file holds the same payload the backend serves. A file carrying a quiz
/// id only answers for that id.
#[derive(Debug, Clone)]
pub struct JsonFileQuestionBank {
    path: PathBuf,
}

impl JsonFileQuestionBank {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl QuestionBank for JsonFileQuestionBank {
    async fn load(&self, quiz_id: &QuizId, _credentials: &Credentials) -> Result<Quiz, LoadError> {
        let json_content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(LoadError::NotFound);
            }
            Err(err) => {
                return Err(LoadError::Unavailable(format!(
                    "failed to read {}: {}",
                    self.path.display(),
                    err
                )));
            }
        };

        let payload: QuestionBankPayload = serde_json::from_str(&json_content).map_err(|err| {
            LoadError::Malformed(format!("failed to parse {}: {}", self.path.display(), err))
        })?;

        if payload
            .declared_id()
            .is_some_and(|declared| declared != quiz_id.as_str())
        {
            return Err(LoadError::NotFound);
        }

        payload.into_quiz(quiz_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserId;

    fn write_temp(content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("quiz-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, content).unwrap();
        path
    }

    fn credentials() -> std::sync::Arc<Credentials> {
        Credentials::new(UserId::new("practice"), String::new())
    }

    #[tokio::test]
    async fn test_loads_questions_from_file() {
        let path = write_temp(
            r#"{"id": 1, "title": "React Basics Quiz", "questions": [
                {"id": 1, "text": "What is JSX?",
                 "options": ["JavaScript XML", "Java Syntax Extension"],
                 "correctAnswer": "JavaScript XML"}
            ]}"#,
        );
        let bank = JsonFileQuestionBank::new(&path);
        let quiz = bank.load(&QuizId::new("1"), &credentials()).await.unwrap();

        assert_eq!(quiz.title, "React Basics Quiz");
        assert_eq!(quiz.questions[0].correct_option, "JavaScript XML");
        std::fs::remove_file(path).unwrap();
    }

    #[tokio::test]
    async fn test_other_quiz_id_is_not_found() {
        let path = write_temp(r#"{"id": 1, "title": "Only quiz", "questions": []}"#);
        let bank = JsonFileQuestionBank::new(&path);

        let err = bank.load(&QuizId::new("2"), &credentials()).await.unwrap_err();
        assert_eq!(err, LoadError::NotFound);
        std::fs::remove_file(path).unwrap();
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let bank = JsonFileQuestionBank::new("/definitely/not/here/questions.json");
        let err = bank.load(&QuizId::new("1"), &credentials()).await.unwrap_err();
        assert_eq!(err, LoadError::NotFound);
    }

    #[tokio::test]
    async fn test_invalid_json_is_malformed() {
        let path = write_temp("not json");
        let bank = JsonFileQuestionBank::new(&path);

        let err = bank.load(&QuizId::new("1"), &credentials()).await.unwrap_err();
        assert!(matches!(err, LoadError::Malformed(_)));
        std::fs::remove_file(path).unwrap();
    }
}
