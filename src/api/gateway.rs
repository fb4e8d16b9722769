use std::fmt;

use async_trait::async_trait;

use super::types::{Credentials, NewQuestion, Question, QuestionId, QuestionPatch, Session};

/// Errors that can occur while talking to the Q&A API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// Transport failure (connection refused, timeout, body cut short).
    Network(String),
    /// The body was not the JSON shape we expected.
    Decode(String),
    /// HTTP 404 for the requested resource.
    NotFound(String),
    /// Any other non-success status.
    Api { status: u16, message: String },
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayError::Network(msg) => write!(f, "network error: {msg}"),
            GatewayError::Decode(msg) => write!(f, "decode error: {msg}"),
            GatewayError::NotFound(what) => write!(f, "not found: {what}"),
            GatewayError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
        }
    }
}

impl std::error::Error for GatewayError {}

/// Access to the questions and session endpoints.
///
/// Every call resolves once, is not retried and cannot be cancelled.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// `GET /questions`
    async fn list_questions(&self) -> Result<Vec<Question>, GatewayError>;

    /// `GET /questions/{id}`, including author and answers.
    async fn get_question(&self, id: QuestionId) -> Result<Question, GatewayError>;

    /// `POST /questions`, resolving with the stored question and its new id.
    async fn create_question(&self, fields: &NewQuestion) -> Result<Question, GatewayError>;

    /// `PATCH /questions/{id}`. Fields absent from `fields` keep their server value.
    async fn update_question(
        &self,
        id: QuestionId,
        fields: &QuestionPatch,
    ) -> Result<Question, GatewayError>;

    /// `POST /session`. The session cookie it sets is kept by the HTTP client.
    async fn login(&self, credentials: &Credentials) -> Result<Session, GatewayError>;
}
