//! Conversational reply client with explicit memory flow.
//!
//! [`ConversationModel::reply`] takes the current [`ConversationMemory`] by
//! reference and returns the reply together with a **new** memory value that
//! has the latest exchange recorded and any over-budget exchanges folded
//! into the summary.  The caller's memory is never mutated, so a failed call
//! leaves the session's memory exactly as it was.
//!
//! # Call shape
//!
//! ```text
//! reply(input, memory)
//!   ├─ chat: system(instruction + summary) + buffered exchanges + input
//!   ├─ record (input, reply) into a copy of memory
//!   └─ over budget?  drain oldest → summarizer chat call → new summary
//!        (summarizer failure: warn and drop the drained exchanges)
//! ```

use async_trait::async_trait;

use crate::config::{ApiConfig, ConversationConfig};
use crate::llm::client::{ChatMessage, ChatParams, CompletionsClient, LlmError};
use crate::llm::memory::{render_exchanges, ConversationMemory, Exchange};
use crate::llm::prompt;

// ---------------------------------------------------------------------------
// ConversationModel trait
// ---------------------------------------------------------------------------

/// Async trait for generating conversational replies.
///
/// Not safe to call twice concurrently against the same memory value — the
/// second result would overwrite the first's recorded exchange.  The session
/// runs turns sequentially, so this cannot happen in practice.
#[async_trait]
pub trait ConversationModel: Send + Sync {
    /// Produce a reply to `input` given `memory`, returning the reply and
    /// the memory value the session should adopt.
    async fn reply(
        &self,
        input: &str,
        memory: &ConversationMemory,
    ) -> Result<(String, ConversationMemory), LlmError>;
}

const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn ConversationModel>) {}
};

// ---------------------------------------------------------------------------
// ApiResponder
// ---------------------------------------------------------------------------

/// Conversation client backed by a hosted chat-completions endpoint.
///
/// Unlike grammar correction and topic suggestion this speaks the structured
/// chat format, and the same transport doubles as the summarizer for memory
/// maintenance.
pub struct ApiResponder {
    transport: CompletionsClient,
    params: ChatParams,
}

impl ApiResponder {
    /// Build a responder from application config.
    pub fn from_config(api: &ApiConfig, conversation: &ConversationConfig) -> Self {
        Self {
            transport: CompletionsClient::from_config(api),
            params: ChatParams {
                model: conversation.model.clone(),
                max_tokens: conversation.max_tokens,
                temperature: conversation.temperature,
                top_p: Some(conversation.top_p),
                stop: conversation.stop.clone(),
            },
        }
    }

    /// Assemble the chat request: system instruction (with summary), the
    /// buffered exchanges oldest-first, then the new input.
    fn build_messages(input: &str, memory: &ConversationMemory) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(memory.len() * 2 + 2);
        messages.push(ChatMessage::system(prompt::conversation_system(
            memory.summary(),
        )));

        for exchange in memory.exchanges() {
            messages.push(ChatMessage::user(exchange.user.clone()));
            messages.push(ChatMessage::assistant(exchange.assistant.clone()));
        }

        messages.push(ChatMessage::user(input));
        messages
    }

    /// Fold `drained` exchanges into `summary` with a summarizer call.
    ///
    /// Runs without stop sequences — the drained lines themselves contain
    /// `Human:` labels the conversation call would cut on.
    async fn summarize(&self, summary: &str, drained: &[Exchange]) -> Result<String, LlmError> {
        let prompt_text = prompt::summarizer_prompt(summary, &render_exchanges(drained));
        let params = ChatParams {
            model: self.params.model.clone(),
            max_tokens: self.params.max_tokens,
            temperature: self.params.temperature,
            top_p: None,
            stop: Vec::new(),
        };

        self.transport
            .chat(&params, &[ChatMessage::user(prompt_text)])
            .await
    }
}

#[async_trait]
impl ConversationModel for ApiResponder {
    async fn reply(
        &self,
        input: &str,
        memory: &ConversationMemory,
    ) -> Result<(String, ConversationMemory), LlmError> {
        let messages = Self::build_messages(input, memory);
        let reply = self.transport.chat(&self.params, &messages).await?;

        let mut next = memory.clone();
        next.record(input, reply.clone());

        if next.is_over_budget() {
            let drained = next.drain_over_budget();
            match self.summarize(next.summary(), &drained).await {
                Ok(summary) => next.set_summary(summary),
                Err(e) => {
                    // Lossy but safe: the budget is already restored, only
                    // the drained context is lost.
                    log::warn!(
                        "memory summarization failed, dropping {} pruned exchange(s): {e}",
                        drained.len()
                    );
                }
            }
        }

        Ok((reply, next))
    }
}

// ---------------------------------------------------------------------------
// MockConversationModel  (test-only)
// ---------------------------------------------------------------------------

/// A test double that replies with a fixed string and maintains the memory
/// contract (record, then drain without summarizing).
#[cfg(test)]
pub struct MockConversationModel {
    response: Result<String, LlmError>,
}

#[cfg(test)]
impl MockConversationModel {
    pub fn ok(reply: impl Into<String>) -> Self {
        Self {
            response: Ok(reply.into()),
        }
    }

    pub fn err(error: LlmError) -> Self {
        Self {
            response: Err(error),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl ConversationModel for MockConversationModel {
    async fn reply(
        &self,
        input: &str,
        memory: &ConversationMemory,
    ) -> Result<(String, ConversationMemory), LlmError> {
        let reply = self.response.clone()?;
        let mut next = memory.clone();
        next.record(input, reply.clone());
        let _ = next.drain_over_budget();
        Ok((reply, next))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiConfig, ConversationConfig};

    fn make_responder() -> ApiResponder {
        ApiResponder::from_config(&ApiConfig::default(), &ConversationConfig::default())
    }

    // ---- Construction ------------------------------------------------------

    #[test]
    fn from_config_carries_sampling_setup() {
        let responder = make_responder();
        assert_eq!(responder.params.max_tokens, 300);
        assert!((responder.params.temperature - 0.1).abs() < f32::EPSILON);
        assert_eq!(responder.params.top_p, Some(0.9));
        assert_eq!(responder.params.stop, vec!["\n\nHuman:".to_string()]);
    }

    #[test]
    fn responder_is_object_safe() {
        let responder: Box<dyn ConversationModel> = Box::new(make_responder());
        drop(responder);
    }

    // ---- Message assembly --------------------------------------------------

    #[test]
    fn build_messages_orders_history_before_input() {
        let mut memory = ConversationMemory::new(300);
        memory.record("I like football.", "Who is your favourite player?");

        let messages = ApiResponder::build_messages("I like Messi.", &memory);

        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[1].role, "user");
        assert_eq!(messages[1].content, "I like football.");
        assert_eq!(messages[2].role, "assistant");
        assert_eq!(messages[2].content, "Who is your favourite player?");
        assert_eq!(messages[3].role, "user");
        assert_eq!(messages[3].content, "I like Messi.");
    }

    #[test]
    fn build_messages_embeds_summary_in_system() {
        let mut memory = ConversationMemory::new(300);
        memory.set_summary("The human is a nurse from Madrid.");

        let messages = ApiResponder::build_messages("Hello again.", &memory);

        assert!(messages[0].content.contains("nurse from Madrid"));
        assert!(messages[0].content.contains("friendly conversation"));
    }

    #[test]
    fn build_messages_empty_memory_is_system_plus_input() {
        let memory = ConversationMemory::new(300);
        let messages = ApiResponder::build_messages("Hi!", &memory);

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[1].content, "Hi!");
    }

    // ---- Mock memory contract ----------------------------------------------

    #[tokio::test]
    async fn mock_reply_records_exchange_in_new_memory() {
        let model = MockConversationModel::ok("That sounds fun!");
        let memory = ConversationMemory::new(300);

        let (reply, next) = model.reply("I went hiking.", &memory).await.unwrap();

        assert_eq!(reply, "That sounds fun!");
        assert_eq!(next.len(), 1);
        let exchange = next.exchanges().next().unwrap();
        assert_eq!(exchange.user, "I went hiking.");
        assert_eq!(exchange.assistant, "That sounds fun!");
    }

    #[tokio::test]
    async fn mock_reply_leaves_input_memory_untouched() {
        let model = MockConversationModel::ok("Nice!");
        let memory = ConversationMemory::new(300);

        let _ = model.reply("Hello.", &memory).await.unwrap();

        assert!(memory.is_empty(), "caller's memory must not change");
    }

    #[tokio::test]
    async fn mock_error_returns_error_and_no_memory() {
        let model = MockConversationModel::err(LlmError::Timeout);
        let memory = ConversationMemory::new(300);

        let result = model.reply("Hello.", &memory).await;

        assert!(result.is_err());
        assert!(memory.is_empty());
    }

    #[tokio::test]
    async fn mock_reply_respects_budget() {
        let model = MockConversationModel::ok("ok");
        let mut memory = ConversationMemory::new(4);
        memory.record("u".repeat(16), "a".repeat(16)); // well over budget

        let (_, next) = model.reply("hi", &memory).await.unwrap();

        assert!(next.estimated_tokens() <= next.token_budget());
    }
}
