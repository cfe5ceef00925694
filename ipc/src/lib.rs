// Wire definitions shared by the relay daemon and its clients.

pub mod relay_request; // For client <-> relay communication

pub use relay_request::{
    ChatReply, ChatRequest, ErrorBody, HistoryRole, HistoryTurn, CHAT_PATH,
    ERROR_MESSAGE_REQUIRED, ERROR_METHOD_NOT_ALLOWED, ERROR_PROCESSING_FAILED,
};
