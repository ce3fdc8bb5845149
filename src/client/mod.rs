//! Network side of a quiz session: the REST client, submission gateways and the
//! async runner that feeds their results back into the session.

mod gateway;
mod http;
mod retry;
mod runner;

pub use gateway::{LocalGateway, SubmissionGateway};
pub use http::{ApiClient, ApiClientError, DEFAULT_API_URL};
pub use retry::{RetryConfig, RetryingGateway, retry_async_with_config};
pub use runner::SessionRunner;
