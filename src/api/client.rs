//! HTTP implementation of [`Gateway`].
//!
//! One `reqwest::Client` per gateway, with its cookie store switched on so the
//! session cookie from `POST /session` rides along on every later request.

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::gateway::{Gateway, GatewayError};
use super::types::{Credentials, NewQuestion, Question, QuestionId, QuestionPatch, Session};

pub struct HttpGateway {
    base_url: String,
    client: reqwest::Client,
}

impl HttpGateway {
    /// Builds a gateway rooted at `base_url` (e.g. `http://localhost:3000/api/v1`).
    pub fn new(base_url: impl Into<String>) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|e| GatewayError::Network(e.to_string()))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends one request and decodes the JSON response.
    ///
    /// Non-success statuses never reach the decoder.
    async fn send<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T, GatewayError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        info!("{} {}", method, url);

        let mut request = self.client.request(method.clone(), &url);
        if let Some(body) = body {
            let payload =
                serde_json::to_vec(body).map_err(|e| GatewayError::Decode(e.to_string()))?;
            debug!("Request body: {} bytes", payload.len());
            request = request.header(CONTENT_TYPE, "application/json").body(payload);
        }

        let response = request
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;
        debug!("{} {} -> {} ({} bytes)", method, url, status, text.len());

        if status == StatusCode::NOT_FOUND {
            warn!("{} {} not found", method, path);
            return Err(GatewayError::NotFound(path.to_string()));
        }
        if !status.is_success() {
            warn!("API error: {} - {}", status, text);
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message: text,
            });
        }

        serde_json::from_str(&text).map_err(|e| {
            warn!("Failed to decode {} {}: {}", method, path, e);
            GatewayError::Decode(e.to_string())
        })
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn list_questions(&self) -> Result<Vec<Question>, GatewayError> {
        self.send::<(), _>(Method::GET, "/questions", None).await
    }

    async fn get_question(&self, id: QuestionId) -> Result<Question, GatewayError> {
        self.send::<(), _>(Method::GET, &format!("/questions/{id}"), None)
            .await
    }

    async fn create_question(&self, fields: &NewQuestion) -> Result<Question, GatewayError> {
        self.send(Method::POST, "/questions", Some(fields)).await
    }

    async fn update_question(
        &self,
        id: QuestionId,
        fields: &QuestionPatch,
    ) -> Result<Question, GatewayError> {
        self.send(Method::PATCH, &format!("/questions/{id}"), Some(fields))
            .await
    }

    async fn login(&self, credentials: &Credentials) -> Result<Session, GatewayError> {
        info!("Creating session for {}", credentials.email);
        self.send(Method::POST, "/session", Some(credentials)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let gateway = HttpGateway::new("http://localhost:3000/api/v1/").unwrap();
        assert_eq!(gateway.base_url(), "http://localhost:3000/api/v1");
        assert_eq!(
            gateway.url("/questions"),
            "http://localhost:3000/api/v1/questions"
        );
    }
}
