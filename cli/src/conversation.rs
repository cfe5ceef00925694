use neura_ipc::{HistoryRole, HistoryTurn};
use uuid::Uuid;

pub const GREETING: &str = "Hello, I'm Neura, your AI Therapist. How are you feeling today?";
pub const GREETING_ID: &str = "welcome-message";
pub const APOLOGY: &str =
    "I'm sorry, I'm having trouble responding right now. Please try again.";

const APOLOGY_ID_PREFIX: &str = "error-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    fn id_prefix(self) -> &'static str {
        match self {
            Role::User => "user-",
            Role::Assistant => "assistant-",
        }
    }
}

/// One displayed chat message. Never modified after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    role: Role,
    content: String,
    id: String,
}

impl Message {
    fn with_prefix(role: Role, content: String, prefix: &str) -> Self {
        Self {
            role,
            content,
            id: format!("{}{}", prefix, Uuid::new_v4()),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::with_prefix(Role::User, content.into(), Role::User.id_prefix())
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::with_prefix(Role::Assistant, content.into(), Role::Assistant.id_prefix())
    }

    /// The fixed reply shown when a turn fails for any reason
    pub fn apology() -> Self {
        Self::with_prefix(Role::Assistant, APOLOGY.to_string(), APOLOGY_ID_PREFIX)
    }

    fn greeting() -> Self {
        Self {
            role: Role::Assistant,
            content: GREETING.to_string(),
            id: GREETING_ID.to_string(),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Stable key for the renderer
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_apology(&self) -> bool {
        self.id.starts_with(APOLOGY_ID_PREFIX)
    }

    fn is_greeting(&self) -> bool {
        self.id == GREETING_ID
    }
}

/// Ordered messages of the current session, oldest first.
///
/// Always holds at least the greeting. Nothing here is persisted.
#[derive(Debug, Clone)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    pub fn new() -> Self {
        Self {
            messages: vec![Message::greeting()],
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn last(&self) -> &Message {
        // The greeting is never removed
        &self.messages[self.messages.len() - 1]
    }

    pub(crate) fn push(&mut self, message: Message) -> &Message {
        self.messages.push(message);
        self.last()
    }

    /// Prior turns in the shape the relay replays.
    ///
    /// The greeting and apologies are local UI text the model never produced, so they are left out.
    pub fn history_turns(&self) -> Vec<HistoryTurn> {
        self.messages
            .iter()
            .filter(|m| !m.is_greeting() && !m.is_apology())
            .map(|m| HistoryTurn {
                role: match m.role {
                    Role::User => HistoryRole::User,
                    Role::Assistant => HistoryRole::Assistant,
                },
                content: m.content.clone(),
            })
            .collect()
    }
}
