//! Access to the survey server.

use std::time::Duration;

use prakriti::wire::{ErrorBody, SubmitResponse};
use prakriti::{QuestionBank, SubmitFailure, Submission};
use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use thiserror::Error;

const EXPORT_PATH: &str = "/api/export-csv";

/// Where the wizard gets its questions from and sends submissions to.
pub trait SurveyGateway {
    fn fetch_questions(&self) -> Result<QuestionBank, GatewayError>;

    fn submit(&self, submission: &Submission) -> Result<SubmitResponse, GatewayError>;

    /// All stored responses as CSV, or `None` when nothing is stored yet.
    fn export_csv(&self) -> Result<Option<String>, GatewayError>;
}

/// Error type for gateway calls.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The server could not be reached or the connection broke.
    #[error("Could not reach the survey server: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server rejected the submission.
    #[error("Validation failed")]
    Rejected(Vec<String>),

    /// The server accepted the submission but failed to handle it.
    #[error("{0}")]
    Server(String),

    /// A reply that does not match what the endpoint returns.
    #[error("Unexpected response from server ({status}): {body}")]
    Unexpected { status: u16, body: String },
}

impl GatewayError {
    /// How the survey flow should treat this error after a submission.
    pub fn into_failure(self) -> SubmitFailure {
        match self {
            Self::Rejected(messages) => SubmitFailure::Rejected(messages),
            Self::Server(message) => SubmitFailure::Persistence(message),
            other => SubmitFailure::Fatal(other.to_string()),
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// Gateway talking to `prakriti-server` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(base_url: impl Into<String>) -> Result<Self, GatewayError> {
        let client = Client::builder().timeout(Duration::from_secs(15)).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Where the CSV export of all responses can be downloaded.
    pub fn export_url(&self) -> String {
        self.url(EXPORT_PATH)
    }
}

fn unexpected(status: StatusCode, body: String) -> GatewayError {
    GatewayError::Unexpected {
        status: status.as_u16(),
        body,
    }
}

fn decode<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, GatewayError> {
    let status = response.status();
    let text = response.text()?;
    serde_json::from_str(&text).map_err(|_| unexpected(status, text))
}

impl SurveyGateway for HttpGateway {
    fn fetch_questions(&self) -> Result<QuestionBank, GatewayError> {
        let url = self.url("/api/questions");
        tracing::debug!(%url, "fetching questions");
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(unexpected(status, response.text().unwrap_or_default()));
        }
        decode(response)
    }

    fn submit(&self, submission: &Submission) -> Result<SubmitResponse, GatewayError> {
        let url = self.url("/api/submit");
        tracing::debug!(%url, "submitting survey");
        let response = self.client.post(url).json(submission).send()?;
        let status = response.status();
        if status.is_success() {
            return decode(response);
        }

        let text = response.text()?;
        let Ok(body) = serde_json::from_str::<ErrorBody>(&text) else {
            return Err(unexpected(status, text));
        };
        match status {
            StatusCode::BAD_REQUEST if body.is_validation() => {
                Err(GatewayError::Rejected(body.details))
            }
            StatusCode::INTERNAL_SERVER_ERROR => Err(GatewayError::Server(body.error)),
            _ => Err(unexpected(status, body.error)),
        }
    }

    fn export_csv(&self) -> Result<Option<String>, GatewayError> {
        let url = self.export_url();
        tracing::debug!(%url, "downloading export");
        let response = self.client.get(url).send()?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let text = response.text()?;
        if status.is_success() {
            return Ok(Some(text));
        }
        match serde_json::from_str::<ErrorBody>(&text) {
            Ok(body) if status == StatusCode::INTERNAL_SERVER_ERROR => {
                Err(GatewayError::Server(body.error))
            }
            _ => Err(unexpected(status, text)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failures_map_to_flow() {
        assert_eq!(
            GatewayError::Rejected(vec!["x".into()]).into_failure(),
            SubmitFailure::Rejected(vec!["x".into()])
        );
        assert_eq!(
            GatewayError::Server("try again".into()).into_failure(),
            SubmitFailure::Persistence("try again".into())
        );
        assert!(matches!(
            unexpected(StatusCode::BAD_REQUEST, "Invalid JSON format".into()).into_failure(),
            SubmitFailure::Fatal(_)
        ));
    }

    #[test]
    fn base_url_trailing_slash() {
        let gateway = HttpGateway::new("http://localhost:3000/").unwrap();
        assert_eq!(gateway.base_url(), "http://localhost:3000");
        assert_eq!(gateway.url("/api/questions"), "http://localhost:3000/api/questions");
        assert_eq!(gateway.export_url(), "http://localhost:3000/api/export-csv");
    }
}
