use async_trait::async_trait;
use neura_ipc::{ChatReply, ChatRequest, ErrorBody, CHAT_PATH};
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, instrument};

/// Failures talking to the relay. The session renders all of them the same way.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("relay request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("relay answered {status}: {message}")]
    Status { status: u16, message: String },

    #[error("failed to decode relay reply: {0}")]
    Decode(String),
}

/// Anything that can carry one chat turn to the relay and bring back its reply
#[async_trait]
pub trait RelayTransport: Send + Sync {
    async fn send(&self, request: &ChatRequest) -> Result<String, ClientError>;
}

/// HTTP client for the relay's chat route
#[derive(Debug, Clone)]
pub struct RelayClient {
    client: Client,
    endpoint: String,
}

impl RelayClient {
    /// `base_url` is the relay origin, e.g. `http://127.0.0.1:8080`
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), CHAT_PATH),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl RelayTransport for RelayClient {
    #[instrument(skip(self, request), fields(endpoint = %self.endpoint))]
    async fn send(&self, request: &ChatRequest) -> Result<String, ClientError> {
        debug!(history = request.history.len(), "Sending message to relay");
        let response = self.client.post(&self.endpoint).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response.bytes().await?;
        let reply: ChatReply =
            serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))?;
        debug!(reply_len = reply.reply.len(), "Received reply from relay");
        Ok(reply.reply)
    }
}
