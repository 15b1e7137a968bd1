//! Core `GrammarCorrector` trait and `ApiCorrector` implementation.
//!
//! Correction is a single stateless call: the learner's sentence goes out
//! wrapped in the grammar instruction, the corrected sentence comes back.
//! It deliberately stays on the flat `/v1/completions` format with its own
//! sampling setup, separate from the conversational chat call.

use async_trait::async_trait;

use crate::config::{ApiConfig, GrammarConfig};
use crate::llm::client::{CompletionParams, CompletionsClient, LlmError};
use crate::llm::prompt;

// ---------------------------------------------------------------------------
// GrammarCorrector trait
// ---------------------------------------------------------------------------

/// Async trait for grammar correction.
///
/// Implementors must be `Send + Sync` so they can be shared across threads
/// (e.g. wrapped in `Arc<dyn GrammarCorrector>`).
#[async_trait]
pub trait GrammarCorrector: Send + Sync {
    /// Correct `text` and return the corrected sentence.
    ///
    /// An already-correct sentence comes back essentially unchanged; the
    /// caller does not need to special-case that.
    async fn correct(&self, text: &str) -> Result<String, LlmError>;
}

// Compile-time assertion: Box<dyn GrammarCorrector> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn GrammarCorrector>) {}
};

// ---------------------------------------------------------------------------
// ApiCorrector
// ---------------------------------------------------------------------------

/// Grammar corrector backed by a hosted completions endpoint.
pub struct ApiCorrector {
    transport: CompletionsClient,
    params: CompletionParams,
}

impl ApiCorrector {
    /// Build a corrector from application config.
    pub fn from_config(api: &ApiConfig, grammar: &GrammarConfig) -> Self {
        Self {
            transport: CompletionsClient::from_config(api),
            params: CompletionParams {
                model: grammar.model.clone(),
                max_tokens: grammar.max_tokens,
                temperature: grammar.temperature,
            },
        }
    }
}

#[async_trait]
impl GrammarCorrector for ApiCorrector {
    async fn correct(&self, text: &str) -> Result<String, LlmError> {
        let prompt = prompt::grammar_prompt(text);
        self.transport.complete(&self.params, &prompt).await
    }
}

// ---------------------------------------------------------------------------
// MockCorrector  (test-only)
// ---------------------------------------------------------------------------

/// A test double that returns a pre-configured response without any HTTP.
#[cfg(test)]
pub struct MockCorrector {
    response: Result<String, LlmError>,
}

#[cfg(test)]
impl MockCorrector {
    /// Create a mock that always returns `Ok(text)`.
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            response: Ok(text.into()),
        }
    }

    /// Create a mock that always returns `Err(error)`.
    pub fn err(error: LlmError) -> Self {
        Self {
            response: Err(error),
        }
    }

    /// Create a mock that echoes its input back unchanged (an
    /// already-correct sentence).
    pub fn echo() -> Self {
        Self {
            response: Ok(String::new()),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl GrammarCorrector for MockCorrector {
    async fn correct(&self, text: &str) -> Result<String, LlmError> {
        match &self.response {
            Ok(fixed) if fixed.is_empty() => Ok(text.to_string()),
            other => other.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiConfig, GrammarConfig};

    fn make_corrector() -> ApiCorrector {
        ApiCorrector::from_config(&ApiConfig::default(), &GrammarConfig::default())
    }

    #[test]
    fn from_config_builds_without_panic() {
        let _corrector = make_corrector();
    }

    #[test]
    fn from_config_carries_sampling_setup() {
        let corrector = make_corrector();
        assert_eq!(corrector.params.max_tokens, 100);
        assert!((corrector.params.temperature - 0.5).abs() < f32::EPSILON);
    }

    /// Verify that `ApiCorrector` is usable as `dyn GrammarCorrector`.
    #[test]
    fn corrector_is_object_safe() {
        let corrector: Box<dyn GrammarCorrector> = Box::new(make_corrector());
        drop(corrector);
    }

    #[tokio::test]
    async fn mock_ok_returns_configured_text() {
        let mock = MockCorrector::ok("I am happy.");
        let out = mock.correct("i is happy").await.unwrap();
        assert_eq!(out, "I am happy.");
    }

    #[tokio::test]
    async fn mock_echo_returns_input_unchanged() {
        let mock = MockCorrector::echo();
        let out = mock.correct("This sentence is fine.").await.unwrap();
        assert_eq!(out, "This sentence is fine.");
    }

    /// Correcting an already-corrected sentence must be a fixed point.
    #[tokio::test]
    async fn echo_correction_is_idempotent() {
        let mock = MockCorrector::echo();
        let once = mock.correct("I went home early.").await.unwrap();
        let twice = mock.correct(&once).await.unwrap();
        assert_eq!(once, twice);
    }

    #[tokio::test]
    async fn mock_err_returns_configured_error() {
        let mock = MockCorrector::err(LlmError::Timeout);
        let err = mock.correct("anything").await.unwrap_err();
        assert!(matches!(err, LlmError::Timeout));
    }
}
