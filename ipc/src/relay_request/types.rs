use serde::{Deserialize, Serialize};

/// Route served by the relay for chat turns
pub const CHAT_PATH: &str = "/api/chat";

pub const ERROR_MESSAGE_REQUIRED: &str = "Message is required";
pub const ERROR_METHOD_NOT_ALLOWED: &str = "Method not allowed";
pub const ERROR_PROCESSING_FAILED: &str = "Failed to process your message";

/// A request from a client to the relay
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChatRequest {
    /// The user's latest message
    pub message: String,
    /// Earlier turns of the conversation, oldest first. Omitted unless the client opts in.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub history: Vec<HistoryTurn>,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            history: Vec::new(),
        }
    }

    pub fn with_history(mut self, history: Vec<HistoryTurn>) -> Self {
        self.history = history;
        self
    }
}

/// Speaker of a replayed turn
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HistoryRole {
    User,
    Assistant,
}

/// One prior turn of the conversation as the client saw it
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HistoryTurn {
    pub role: HistoryRole,
    pub content: String,
}

/// Successful relay response
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChatReply {
    pub reply: String,
}

/// Error payload returned with every non-2xx relay status
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
