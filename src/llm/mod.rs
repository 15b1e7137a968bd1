//! Language-model clients for the speaking coach.
//!
//! This module provides:
//! * [`CompletionsClient`] — shared HTTP transport (flat + chat formats).
//! * [`GrammarCorrector`] / [`ApiCorrector`] — sentence correction.
//! * [`ConversationModel`] / [`ApiResponder`] — replies with explicit
//!   memory in/out.
//! * [`TopicSuggester`] / [`ApiTopicSuggester`] — speaking-topic prompts.
//! * [`ConversationMemory`] — summarizing, token-budgeted dialogue memory.
//! * [`LlmError`] — error variants shared by all three clients.
//!
//! Correction and topic suggestion stay on the flat completions format with
//! their own sampling setups; the conversation speaks structured chat.  The
//! two configurations are deliberate and must not be merged.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use speak_coach::config::AppConfig;
//! use speak_coach::llm::{ApiResponder, ConversationMemory, ConversationModel};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let responder = ApiResponder::from_config(&config.api, &config.conversation);
//!
//!     let memory = ConversationMemory::new(config.memory.token_budget);
//!     let (reply, memory) = responder
//!         .reply("I like to play football on weekends.", &memory)
//!         .await
//!         .unwrap();
//!
//!     println!("{reply} (memory now holds {} exchange(s))", memory.len());
//! }
//! ```

pub mod client;
pub mod corrector;
pub mod memory;
pub mod prompt;
pub mod responder;
pub mod topics;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use client::{ChatMessage, ChatParams, CompletionParams, CompletionsClient, LlmError};
pub use corrector::{ApiCorrector, GrammarCorrector};
pub use memory::{estimate_tokens, ConversationMemory, Exchange};
pub use responder::{ApiResponder, ConversationModel};
pub use topics::{ApiTopicSuggester, TopicSuggester};

#[cfg(test)]
pub use corrector::MockCorrector;
#[cfg(test)]
pub use responder::MockConversationModel;
#[cfg(test)]
pub use topics::MockTopicSuggester;
