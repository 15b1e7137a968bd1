//! Conversation transcript — the message history the UI renders.
//!
//! The transcript is the *display* record of the session: every user turn
//! and every coach reply, in order, starting with the coach's greeting.
//! It is distinct from [`crate::llm::ConversationMemory`], which is the
//! *model-facing* record and is pruned to a token budget; the transcript
//! is never pruned.

// ---------------------------------------------------------------------------
// Greeting
// ---------------------------------------------------------------------------

/// The coach's opening line, present in every fresh transcript.
pub const GREETING: &str = "Hello! What topics do you enjoy talking about in English?";

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// Who said a transcript message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// The learner practicing their English.
    User,
    /// The conversation coach.
    Assistant,
}

impl Role {
    /// Short display name for chat bubbles.
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "You",
            Role::Assistant => "Coach",
        }
    }
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// A single transcript entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    /// Build a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Build a coach message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Transcript
// ---------------------------------------------------------------------------

/// Ordered message history for one session.
///
/// A new transcript always opens with [`GREETING`] from the coach, so the
/// learner sees an invitation to speak before their first turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    /// Create a transcript seeded with the coach's greeting.
    pub fn new() -> Self {
        Self {
            messages: vec![Message::assistant(GREETING)],
        }
    }

    /// Append a user turn.
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(Message::user(content));
    }

    /// Append a coach reply.
    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(Message::assistant(content));
    }

    /// All messages in chronological order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// The most recent message, if any.
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Number of messages, greeting included.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// `true` only for a transcript constructed without the greeting
    /// (never the case for [`Transcript::new`]).
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_transcript_opens_with_greeting() {
        let transcript = Transcript::new();
        assert_eq!(transcript.len(), 1);

        let first = &transcript.messages()[0];
        assert_eq!(first.role, Role::Assistant);
        assert_eq!(first.content, GREETING);
    }

    #[test]
    fn pushes_append_in_order() {
        let mut transcript = Transcript::new();
        transcript.push_user("i like football");
        transcript.push_assistant("Football is a great topic!");

        let messages = transcript.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1], Message::user("i like football"));
        assert_eq!(messages[2], Message::assistant("Football is a great topic!"));
    }

    #[test]
    fn last_returns_most_recent() {
        let mut transcript = Transcript::new();
        assert_eq!(transcript.last().map(|m| m.role), Some(Role::Assistant));

        transcript.push_user("hello");
        assert_eq!(transcript.last().map(|m| m.role), Some(Role::User));
    }

    #[test]
    fn role_labels() {
        assert_eq!(Role::User.label(), "You");
        assert_eq!(Role::Assistant.label(), "Coach");
    }

    #[test]
    fn clone_does_not_share_history() {
        let mut a = Transcript::new();
        let b = a.clone();

        a.push_user("only in a");
        assert_eq!(a.len(), 2);
        assert_eq!(b.len(), 1);
    }
}
