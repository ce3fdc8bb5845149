//! REST client for the quiz backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use url::Url;

use crate::data::QuestionBank;
use crate::error::{LoadError, SubmitError};
use crate::models::{Credentials, Quiz, QuizId, QuizResult};
use crate::protocol::{ErrorBody, QuestionBankPayload, SubmissionBody};
use crate::session::SubmitRequest;

use super::gateway::SubmissionGateway;

/// Default backend location.
pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";

#[derive(Debug, thiserror::Error)]
pub enum ApiClientError {
    #[error("api url {0} cannot be used as a base url")]
    InvalidBaseUrl(Url),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Client for `GET /quizzes/{quizId}` and `POST /quizzes/{quizId}/user/{userId}/take`.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, ApiClientError> {
        if base_url.cannot_be_a_base() {
            return Err(ApiClientError::InvalidBaseUrl(base_url));
        }

        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Base url extended with percent-encoded path segments.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub fn quiz_url(&self, quiz_id: &QuizId) -> Url {
        self.endpoint(&["quizzes", quiz_id.as_str()])
    }

    pub fn take_url(&self, request: &SubmitRequest) -> Url {
        self.endpoint(&[
            "quizzes",
            request.quiz_id.as_str(),
            "user",
            request.credentials.user_id.as_str(),
            "take",
        ])
    }
}

fn is_transient(status: StatusCode) -> bool {
    status.is_server_error()
        || status == StatusCode::REQUEST_TIMEOUT
        || status == StatusCode::TOO_MANY_REQUESTS
}

/// Best-effort human readable reason from an error response.
async fn error_reason(response: Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|body| body.message)
        .or_else(|| (!body.trim().is_empty()).then(|| body.trim().to_string()))
        .unwrap_or_else(|| status.to_string())
}

#[async_trait]
impl QuestionBank for ApiClient {
    async fn load(&self, quiz_id: &QuizId, credentials: &Credentials) -> Result<Quiz, LoadError> {
        let url = self.quiz_url(quiz_id);
        tracing::debug!("GET {}", url);

        let response = self
            .http
            .get(url)
            .bearer_auth(credentials.bearer_token())
            .send()
            .await
            .map_err(|err| LoadError::Unavailable(err.to_string()))?;

        let status = response.status();
        match status {
            StatusCode::NOT_FOUND => return Err(LoadError::NotFound),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => return Err(LoadError::Unauthorized),
            status if is_transient(status) => {
                return Err(LoadError::Unavailable(error_reason(response).await));
            }
            status if !status.is_success() => {
                return Err(LoadError::Malformed(error_reason(response).await));
            }
            _ => {}
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| LoadError::Unavailable(err.to_string()))?;
        let payload: QuestionBankPayload = serde_json::from_slice(&body)
            .map_err(|err| LoadError::Malformed(err.to_string()))?;

        payload.into_quiz(quiz_id)
    }
}

#[async_trait]
impl SubmissionGateway for ApiClient {
    async fn submit(&self, request: &SubmitRequest) -> Result<QuizResult, SubmitError> {
        let url = self.take_url(request);
        tracing::debug!("POST {} token {}", url, request.submission_token);

        let body = SubmissionBody {
            submission_token: request.submission_token,
            answers: request.answers.clone(),
        };
        let response = self
            .http
            .post(url)
            .bearer_auth(request.credentials.bearer_token())
            .json(&body)
            .send()
            .await
            .map_err(|err| SubmitError::Unavailable(err.to_string()))?;

        let status = response.status();
        if is_transient(status) {
            return Err(SubmitError::Unavailable(error_reason(response).await));
        }
        if !status.is_success() {
            return Err(SubmitError::Rejected(error_reason(response).await));
        }

        // The attempt is recorded at this point; a garbled body is retried with
        // the same token and the backend replays the result.
        let result: QuizResult = response
            .json()
            .await
            .map_err(|err| SubmitError::Unavailable(err.to_string()))?;

        if !result.is_consistent() {
            return Err(SubmitError::Rejected(format!(
                "backend returned an inconsistent result: {}/{} for {} points",
                result.score, result.total_questions, result.points_earned
            )));
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserId;
    use crate::session::{Effect, SessionController};

    fn api(base: &str) -> ApiClient {
        ApiClient::new(Url::parse(base).unwrap(), Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn test_quiz_url() {
        let client = api("http://localhost:8080/api");
        assert_eq!(
            client.quiz_url(&QuizId::new("12")).as_str(),
            "http://localhost:8080/api/quizzes/12"
        );

        let client = api("http://localhost:8080/api/");
        assert_eq!(
            client.quiz_url(&QuizId::new("12")).as_str(),
            "http://localhost:8080/api/quizzes/12"
        );
    }

    #[test]
    fn test_take_url_encodes_user() {
        let client = api(DEFAULT_API_URL);
        let mut controller = SessionController::new();
        let credentials = Credentials::new(UserId::new("a b@example.com"), "t".into());
        let Ok(Effect::Load(load)) = controller.start(QuizId::new("3"), credentials.clone()) else {
            panic!("expected load effect");
        };
        let request = SubmitRequest {
            ticket: load.ticket,
            quiz_id: QuizId::new("3"),
            credentials,
            submission_token: uuid::Uuid::nil(),
            answers: Vec::new(),
        };

        assert_eq!(
            client.take_url(&request).as_str(),
            "http://localhost:8080/api/quizzes/3/user/a%20b@example.com/take"
        );
    }

    #[test]
    fn test_rejects_non_base_url() {
        let url = Url::parse("mailto:someone@example.com").unwrap();
        assert!(matches!(
            ApiClient::new(url, Duration::from_secs(1)),
            Err(ApiClientError::InvalidBaseUrl(_))
        ));
    }
}
