use crate::conversation::{Conversation, Message};
use crate::relay_client::{ClientError, RelayTransport};
use neura_ipc::ChatRequest;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatState {
    /// Ready for input
    Idle,
    /// A message is with the relay; input is disabled
    Pending,
}

/// Why a submission never left Idle
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitRejected {
    #[error("message is empty")]
    Empty,
    #[error("a reply is still pending")]
    Busy,
}

/// A user message that has been appended and is waiting for its reply
#[derive(Debug)]
#[must_use = "a pending turn must be completed to return the session to idle"]
pub struct PendingTurn {
    request: ChatRequest,
}

impl PendingTurn {
    pub fn request(&self) -> &ChatRequest {
        &self.request
    }
}

/// Conversation plus the one-request-at-a-time state machine around it
#[derive(Debug)]
pub struct ChatSession {
    conversation: Conversation,
    state: ChatState,
    send_history: bool,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new(false)
    }
}

impl ChatSession {
    /// With `send_history` set, each request carries the earlier turns so the relay can replay them.
    pub fn new(send_history: bool) -> Self {
        Self {
            conversation: Conversation::new(),
            state: ChatState::Idle,
            send_history,
        }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn state(&self) -> ChatState {
        self.state
    }

    pub fn is_pending(&self) -> bool {
        self.state == ChatState::Pending
    }

    /// Appends the user's message and moves to Pending.
    ///
    /// Whitespace-only text and submissions made while Pending are rejected
    /// without touching the conversation.
    pub fn begin(&mut self, text: &str) -> Result<PendingTurn, SubmitRejected> {
        if text.trim().is_empty() {
            return Err(SubmitRejected::Empty);
        }
        if self.is_pending() {
            return Err(SubmitRejected::Busy);
        }

        let history = if self.send_history {
            self.conversation.history_turns()
        } else {
            Vec::new()
        };

        self.conversation.push(Message::user(text));
        self.state = ChatState::Pending;

        Ok(PendingTurn {
            request: ChatRequest::new(text).with_history(history),
        })
    }

    /// Appends the reply, or the apology if the turn failed, and returns to Idle
    pub fn complete(
        &mut self,
        turn: PendingTurn,
        outcome: Result<String, ClientError>,
    ) -> &Message {
        let message = match outcome {
            Ok(reply) => Message::assistant(reply),
            Err(e) => {
                warn!(error = %e, message_len = turn.request.message.len(), "Chat turn failed");
                Message::apology()
            }
        };

        self.state = ChatState::Idle;
        self.conversation.push(message)
    }

    /// Runs one whole turn: append, relay, append the outcome
    pub async fn submit<T>(&mut self, text: &str, transport: &T) -> Result<&Message, SubmitRejected>
    where
        T: RelayTransport + ?Sized,
    {
        let turn = self.begin(text)?;
        debug!("Submitting message");
        let outcome = transport.send(turn.request()).await;
        Ok(self.complete(turn, outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::{Role, APOLOGY};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Answers from a script and records every request it saw
    #[derive(Default)]
    struct ScriptedTransport {
        replies: Mutex<Vec<Result<String, ClientError>>>,
        seen: Mutex<Vec<ChatRequest>>,
    }

    impl ScriptedTransport {
        fn new(replies: Vec<Result<String, ClientError>>) -> Self {
            Self {
                replies: Mutex::new(replies.into_iter().rev().collect()),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.seen.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl RelayTransport for ScriptedTransport {
        async fn send(&self, request: &ChatRequest) -> Result<String, ClientError> {
            self.seen.lock().unwrap().push(request.clone());
            self.replies
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Ok("default reply".to_string()))
        }
    }

    fn relay_500() -> ClientError {
        ClientError::Status {
            status: 500,
            message: "Failed to process your message".to_string(),
        }
    }

    #[tokio::test]
    async fn test_submit_appends_user_then_reply() {
        let transport = ScriptedTransport::new(vec![Ok("How long has that been going on?".to_string())]);
        let mut session = ChatSession::default();

        let reply = session.submit("I can't sleep", &transport).await.unwrap();
        assert_eq!(reply.role(), Role::Assistant);
        assert_eq!(reply.content(), "How long has that been going on?");

        let messages = session.conversation().messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].role(), Role::User);
        assert_eq!(messages[1].content(), "I can't sleep");
        assert_eq!(session.state(), ChatState::Idle);
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_empty_input_changes_nothing() {
        let transport = ScriptedTransport::default();
        let mut session = ChatSession::default();

        for text in ["", "   ", "\n\t"] {
            let result = session.submit(text, &transport).await;
            assert_eq!(result.unwrap_err(), SubmitRejected::Empty);
        }

        assert_eq!(session.conversation().len(), 1);
        assert_eq!(session.state(), ChatState::Idle);
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_failure_appends_apology_and_returns_to_idle() {
        let transport = ScriptedTransport::new(vec![Err(relay_500())]);
        let mut session = ChatSession::default();

        let reply = session.submit("hello", &transport).await.unwrap();
        assert_eq!(reply.content(), APOLOGY);
        assert!(reply.is_apology());
        assert_eq!(session.state(), ChatState::Idle);
        assert_eq!(session.conversation().len(), 3);
    }

    #[test]
    fn test_second_submission_while_pending_is_rejected() {
        let mut session = ChatSession::default();

        let turn = session.begin("first").unwrap();
        assert!(session.is_pending());
        assert_eq!(session.conversation().len(), 2);

        assert_eq!(session.begin("second").unwrap_err(), SubmitRejected::Busy);
        assert_eq!(session.conversation().len(), 2);

        session.complete(turn, Ok("reply".to_string()));
        assert_eq!(session.state(), ChatState::Idle);
        assert!(session.begin("second").is_ok());
    }

    #[tokio::test]
    async fn test_turns_alternate_and_grow() {
        let transport = ScriptedTransport::new(vec![
            Ok("one".to_string()),
            Err(relay_500()),
            Ok("three".to_string()),
        ]);
        let mut session = ChatSession::default();

        let mut previous_len = session.conversation().len();
        for text in ["a", "b", "c"] {
            session.submit(text, &transport).await.unwrap();
            let len = session.conversation().len();
            assert_eq!(len, previous_len + 2);
            previous_len = len;
        }

        let roles: Vec<Role> = session
            .conversation()
            .messages()
            .iter()
            .map(|m| m.role())
            .collect();
        for (i, role) in roles.iter().enumerate() {
            let expected = if i % 2 == 0 { Role::Assistant } else { Role::User };
            assert_eq!(*role, expected, "message {i}");
        }
    }

    #[tokio::test]
    async fn test_single_turn_requests_carry_no_history() {
        let transport = ScriptedTransport::new(vec![Ok("hi".to_string()), Ok("sure".to_string())]);
        let mut session = ChatSession::new(false);

        session.submit("hello", &transport).await.unwrap();
        session.submit("can we talk?", &transport).await.unwrap();

        let seen = transport.seen.lock().unwrap();
        assert_eq!(seen[1].message, "can we talk?");
        assert!(seen[1].history.is_empty());
    }

    #[tokio::test]
    async fn test_history_excludes_the_message_being_sent() {
        let transport = ScriptedTransport::new(vec![Ok("hi".to_string()), Ok("sure".to_string())]);
        let mut session = ChatSession::new(true);

        session.submit("hello", &transport).await.unwrap();
        session.submit("can we talk?", &transport).await.unwrap();

        let seen = transport.seen.lock().unwrap();
        assert!(seen[0].history.is_empty());
        let history: Vec<&str> = seen[1].history.iter().map(|t| t.content.as_str()).collect();
        assert_eq!(history, vec!["hello", "hi"]);
    }
}
