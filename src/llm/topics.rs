//! Topic suggestion — a stateless, single-shot speaking prompt.
//!
//! Shares the flat completions format and endpoint with grammar correction
//! but runs at a higher temperature so consecutive suggestions differ.
//! No conversation memory is consulted or updated.

use async_trait::async_trait;

use crate::config::{ApiConfig, TopicConfig};
use crate::llm::client::{CompletionParams, CompletionsClient, LlmError};
use crate::llm::prompt;

// ---------------------------------------------------------------------------
// TopicSuggester trait
// ---------------------------------------------------------------------------

/// Async trait for suggesting one speaking-practice topic per call.
#[async_trait]
pub trait TopicSuggester: Send + Sync {
    /// Return one topic, phrased as a sentence or question.
    async fn suggest(&self) -> Result<String, LlmError>;
}

const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn TopicSuggester>) {}
};

// ---------------------------------------------------------------------------
// ApiTopicSuggester
// ---------------------------------------------------------------------------

/// Topic suggester backed by a hosted completions endpoint.
pub struct ApiTopicSuggester {
    transport: CompletionsClient,
    params: CompletionParams,
}

impl ApiTopicSuggester {
    /// Build a suggester from application config.
    pub fn from_config(api: &ApiConfig, topics: &TopicConfig) -> Self {
        Self {
            transport: CompletionsClient::from_config(api),
            params: CompletionParams {
                model: topics.model.clone(),
                max_tokens: topics.max_tokens,
                temperature: topics.temperature,
            },
        }
    }
}

#[async_trait]
impl TopicSuggester for ApiTopicSuggester {
    async fn suggest(&self) -> Result<String, LlmError> {
        let prompt = prompt::topic_prompt();
        self.transport.complete(&self.params, &prompt).await
    }
}

// ---------------------------------------------------------------------------
// MockTopicSuggester  (test-only)
// ---------------------------------------------------------------------------

/// A test double that returns a pre-configured response without any HTTP.
#[cfg(test)]
pub struct MockTopicSuggester {
    response: Result<String, LlmError>,
}

#[cfg(test)]
impl MockTopicSuggester {
    pub fn ok(topic: impl Into<String>) -> Self {
        Self {
            response: Ok(topic.into()),
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
impl TopicSuggester for MockTopicSuggester {
    async fn suggest(&self) -> Result<String, LlmError> {
        self.response.clone()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
