//! Transport seam between the submission client and the records API.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::config::IntakeConfig;
use crate::error::{ConfigError, TransportError};
use crate::registration::model::PatientRecord;

/// A response read in full from the records API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Whether the response declares a JSON body.
    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.to_ascii_lowercase().contains("json"))
    }
}

/// Delivers one record to the records API. One call is one attempt.
#[async_trait]
pub trait RecordsTransport: Send + Sync {
    async fn post_record(
        &self,
        record: &PatientRecord,
    ) -> Result<TransportResponse, TransportError>;
}

/// `reqwest`-backed transport posting JSON to the record-creation endpoint.
pub struct HttpRecordsTransport {
    client: reqwest::Client,
    endpoint: String,
    token: Option<SecretString>,
}

impl HttpRecordsTransport {
    pub fn new(
        endpoint: impl Into<String>,
        token: Option<SecretString>,
    ) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("patient-intake/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            token,
        })
    }

    pub fn from_config(config: &IntakeConfig) -> Result<Self, ConfigError> {
        Self::new(config.endpoint(), config.records_token.clone())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl RecordsTransport for HttpRecordsTransport {
    async fn post_record(
        &self,
        record: &PatientRecord,
    ) -> Result<TransportResponse, TransportError> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .json(record);
        if let Some(ref token) = self.token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request
            .send()
            .await
            .map_err(|e| TransportError::Request(error_chain(&e)))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Request(error_chain(&e)))?;

        debug!(status, body_len = body.len(), "Records API responded");

        Ok(TransportResponse {
            status,
            content_type,
            body,
        })
    }
}

/// Flatten an error and its sources into one message.
///
/// reqwest's top-level message is generic ("error sending request"); the
/// useful part (refused, dns, reset) lives further down the chain.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
