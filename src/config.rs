//! Command line and environment configuration.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use url::Url;

use crate::client::{DEFAULT_API_URL, RetryConfig};
use crate::models::{Credentials, QuizId, UserId};

/// User id recorded for offline practice sessions.
const PRACTICE_USER: &str = "practice";

#[derive(Parser, Clone)]
#[command(version, about = "Take a quiz in the terminal", long_about = None)]
pub struct Config {
    /// Base url of the quiz backend
    #[arg(long, env = "QUIZ_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: Url,

    /// Id of the quiz to take
    #[arg(short, long, env = "QUIZ_ID")]
    pub quiz: String,

    /// Learner id the attempt is recorded for
    #[arg(short, long, env = "QUIZ_USER_ID", required_unless_present = "practice")]
    pub user: Option<String>,

    /// Bearer token issued at login
    #[arg(
        long,
        env = "QUIZ_AUTH_TOKEN",
        hide_env_values = true,
        required_unless_present = "practice"
    )]
    pub token: Option<String>,

    /// Practice offline with questions from a JSON file
    #[arg(long, env = "QUIZ_PRACTICE_FILE", value_name = "FILE")]
    pub practice: Option<PathBuf>,

    /// HTTP request timeout in seconds
    #[arg(long, env = "QUIZ_HTTP_TIMEOUT", default_value_t = 10)]
    pub timeout_secs: u64,

    /// Attempts per submission before giving up
    #[arg(long, env = "QUIZ_SUBMIT_ATTEMPTS", default_value_t = 4)]
    pub submit_attempts: usize,

    /// Write logs to this file
    #[arg(long, env = "QUIZ_LOG_FILE", value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

impl Config {
    pub fn quiz_id(&self) -> QuizId {
        QuizId::new(self.quiz.trim())
    }

    pub fn credentials(&self) -> Arc<Credentials> {
        let user = self.user.as_deref().unwrap_or(PRACTICE_USER);
        Credentials::new(UserId::new(user), self.token.clone().unwrap_or_default())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig::default().with_max_attempts(self.submit_attempts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_online_requires_user_and_token() {
        assert!(Config::try_parse_from(["quiz-session", "--quiz", "3"]).is_err());

        let config = Config::try_parse_from([
            "quiz-session",
            "--quiz",
            "3",
            "--user",
            "learner@example.com",
            "--token",
            "jwt",
        ])
        .unwrap();
        assert_eq!(config.quiz_id(), QuizId::new("3"));
        assert_eq!(config.api_url.as_str(), "http://localhost:8080/api");
        assert_eq!(config.credentials().bearer_token(), "jwt");
        assert_eq!(config.retry_config().max_attempts, 4);
    }

    #[test]
    fn test_practice_needs_no_credentials() {
        let config =
            Config::try_parse_from(["quiz-session", "-q", "1", "--practice", "questions.json"])
                .unwrap();
        assert_eq!(config.credentials().user_id, UserId::new("practice"));
        assert!(config.practice.is_some());
    }

    #[test]
    fn test_submit_attempts_at_least_one() {
        let config = Config::try_parse_from([
            "quiz-session",
            "-q",
            "1",
            "--practice",
            "q.json",
            "--submit-attempts",
            "0",
        ])
        .unwrap();
        assert_eq!(config.retry_config().max_attempts, 1);
    }
}
