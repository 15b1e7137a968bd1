//! Core `SpeechSynthesizer` trait and hosted `ApiSynthesizer` implementation.
//!
//! Synthesis turns the assistant's reply into an [`AudioArtifact`]: MP3
//! bytes written to a well-known scratch file plus a base64 `data:` URL for
//! render layers that embed audio instead of decoding it.  Artifacts are
//! per-turn; each synthesis overwrites the previous scratch file.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use thiserror::Error;

use crate::config::{ApiConfig, TtsConfig};

/// Scratch file name for the most recent synthesized reply.
const RESPONSE_FILE: &str = "response.mp3";

// ---------------------------------------------------------------------------
// TtsError
// ---------------------------------------------------------------------------

/// All errors that can arise from the speech-synthesis subsystem.
#[derive(Debug, Clone, Error)]
pub enum TtsError {
    /// The reply text was empty or whitespace-only; there is nothing to say.
    #[error("cannot synthesize empty text")]
    EmptyText,

    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("speech request timed out")]
    Timeout,

    /// The endpoint answered with a non-success status code.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// Writing the scratch file failed.
    #[error("failed to write audio file: {0}")]
    Write(String),
}

impl From<reqwest::Error> for TtsError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TtsError::Timeout
        } else {
            TtsError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// AudioArtifact
// ---------------------------------------------------------------------------

/// A synthesized reply: the audio bytes, the scratch file they were written
/// to, and the MIME type describing them.
#[derive(Debug, Clone)]
pub struct AudioArtifact {
    /// Scratch file holding the bytes (overwritten by the next turn).
    pub path: PathBuf,
    /// The raw audio bytes.
    pub bytes: Vec<u8>,
    /// MIME type of `bytes` (`audio/mpeg` for MP3).
    pub mime: String,
}

impl AudioArtifact {
    /// Render the artifact as a base64 `data:` URL for embedding.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, BASE64.encode(&self.bytes))
    }
}

// ---------------------------------------------------------------------------
// SpeechSynthesizer trait
// ---------------------------------------------------------------------------

/// Object-safe, thread-safe interface for text-to-speech backends.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `text` and return the resulting artifact.
    ///
    /// Empty or whitespace-only input returns [`TtsError::EmptyText`]
    /// without touching the network.
    async fn synthesize(&self, text: &str) -> Result<AudioArtifact, TtsError>;
}

const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn SpeechSynthesizer>) {}
};

// ---------------------------------------------------------------------------
// ApiSynthesizer
// ---------------------------------------------------------------------------

/// Hosted speech client against an OpenAI-compatible `/v1/audio/speech`
/// endpoint.  The response body is raw MP3.
pub struct ApiSynthesizer {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    config: TtsConfig,
    scratch_dir: PathBuf,
}

impl ApiSynthesizer {
    /// Build a synthesizer from application config.
    ///
    /// `scratch_dir` receives `response.mp3`, rewritten on every call.
    pub fn from_config(api: &ApiConfig, tts: &TtsConfig, scratch_dir: PathBuf) -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(api.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            http,
            base_url: api.base_url.clone(),
            api_key: api.api_key.clone(),
            config: tts.clone(),
            scratch_dir,
        }
    }

    /// Path of the scratch file this synthesizer writes.
    pub fn response_path(&self) -> PathBuf {
        self.scratch_dir.join(RESPONSE_FILE)
    }

    fn write_response(&self, path: &Path, bytes: &[u8]) -> Result<(), TtsError> {
        std::fs::create_dir_all(&self.scratch_dir).map_err(|e| TtsError::Write(e.to_string()))?;
        std::fs::write(path, bytes).map_err(|e| TtsError::Write(e.to_string()))
    }
}

#[async_trait]
impl SpeechSynthesizer for ApiSynthesizer {
    async fn synthesize(&self, text: &str) -> Result<AudioArtifact, TtsError> {
        if text.trim().is_empty() {
            return Err(TtsError::EmptyText);
        }

        let url = format!("{}/v1/audio/speech", self.base_url);

        let body = serde_json::json!({
            "model":           self.config.model,
            "input":           text,
            "voice":           self.config.voice,
            "language":        self.config.language,
            "response_format": "mp3",
        });

        let mut req = self.http.post(&url).json(&body);

        let key = self.api_key.as_deref().unwrap_or("");
        if !key.is_empty() {
            req = req.bearer_auth(key);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(TtsError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response.bytes().await?.to_vec();

        let path = self.response_path();
        self.write_response(&path, &bytes)?;

        Ok(AudioArtifact {
            path,
            bytes,
            mime: "audio/mpeg".into(),
        })
    }
}

// ---------------------------------------------------------------------------
// MockSynthesizer  (test-only)
// ---------------------------------------------------------------------------

/// A test double that returns a fixed artifact (or error) without any
/// network or filesystem access.  The empty-text guard is enforced so
/// callers are tested against it.
#[cfg(test)]
pub struct MockSynthesizer {
    response: Result<Vec<u8>, TtsError>,
}

#[cfg(test)]
impl MockSynthesizer {
    /// Create a mock that returns an artifact wrapping `bytes`.
    pub fn ok(bytes: Vec<u8>) -> Self {
        Self {
            response: Ok(bytes),
        }
    }

    /// Create a mock that always returns `Err(error)`.
    pub fn err(error: TtsError) -> Self {
        Self {
            response: Err(error),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl SpeechSynthesizer for MockSynthesizer {
    async fn synthesize(&self, text: &str) -> Result<AudioArtifact, TtsError> {
        if text.trim().is_empty() {
            return Err(TtsError::EmptyText);
        }
        let bytes = self.response.clone()?;
        Ok(AudioArtifact {
            path: std::env::temp_dir().join(RESPONSE_FILE),
            bytes,
            mime: "audio/mpeg".into(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
