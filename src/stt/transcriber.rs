//! Core `Transcriber` trait and hosted `ApiTranscriber` implementation.
//!
//! # Overview
//!
//! [`Transcriber`] is the interface the session uses to turn captured
//! microphone samples into text.  It is object-safe and `Send + Sync` so it
//! can be held behind an `Arc<dyn Transcriber>`.
//!
//! [`ApiTranscriber`] encodes the samples as a 16-bit WAV, exports it to a
//! scratch file, and uploads it to an OpenAI-compatible
//! `/v1/audio/transcriptions` endpoint as a multipart form.
//!
//! [`MockTranscriber`] (available under `#[cfg(test)]`) returns a
//! pre-configured response — useful for session tests without a network.

use std::io::Write as _;
use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::audio::encode_wav_16k_mono;
use crate::config::{ApiConfig, SttConfig};

// ---------------------------------------------------------------------------
// SttError
// ---------------------------------------------------------------------------

/// All errors that can arise from the transcription subsystem.
#[derive(Debug, Clone, Error)]
pub enum SttError {
    /// The supplied audio buffer is shorter than the minimum 0.5 s
    /// (8 000 samples at 16 kHz).
    #[error("recording too short — minimum 0.5 s (8 000 samples at 16 kHz)")]
    AudioTooShort,

    /// The supplied audio buffer exceeds the maximum 60 s
    /// (960 000 samples at 16 kHz).
    #[error("recording too long — maximum 60 s (960 000 samples at 16 kHz)")]
    AudioTooLong,

    /// The endpoint recognized no speech in the upload.
    #[error("no speech was recognized in the recording")]
    NoSpeech,

    /// WAV encoding or scratch-file I/O failed before the upload.
    #[error("failed to prepare audio for upload: {0}")]
    Encode(String),

    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The upload did not complete within the configured timeout.
    #[error("transcription request timed out")]
    Timeout,

    /// The endpoint answered with a non-success status code.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// The HTTP response could not be parsed as expected JSON.
    #[error("failed to parse transcription response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for SttError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SttError::Timeout
        } else {
            SttError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Transcriber trait
// ---------------------------------------------------------------------------

/// Object-safe, thread-safe interface for speech-to-text backends.
///
/// # Contract
///
/// - `audio` must be **16 kHz, mono, f32** PCM samples.
/// - Returns `Err(SttError::AudioTooShort)` when `audio.len() < 8_000`.
/// - Returns `Err(SttError::AudioTooLong)` when `audio.len() > 960_000`.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe `audio` and return the recognized text.
    async fn transcribe(&self, audio: &[f32]) -> Result<String, SttError>;
}

// Compile-time assertion: Box<dyn Transcriber> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn Transcriber>) {}
};

// ---------------------------------------------------------------------------
// Audio length constants (16 kHz mono f32)
// ---------------------------------------------------------------------------

/// Minimum audio length: 0.5 s × 16 000 Hz = 8 000 samples.
pub(crate) const MIN_AUDIO_SAMPLES: usize = 8_000;
/// Maximum audio length: 60 s × 16 000 Hz = 960 000 samples.
pub(crate) const MAX_AUDIO_SAMPLES: usize = 960_000;

// ---------------------------------------------------------------------------
// ApiTranscriber
// ---------------------------------------------------------------------------

/// Hosted transcription client.
///
/// Uploads a WAV render of the capture as `multipart/form-data` with the
/// configured model and language, and reads the `text` field of the JSON
/// response.
pub struct ApiTranscriber {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
    language: String,
    scratch_dir: PathBuf,
}

impl ApiTranscriber {
    /// Build a transcriber from application config.
    ///
    /// `scratch_dir` receives the per-call WAV export; the file is removed
    /// when the call completes.
    pub fn from_config(api: &ApiConfig, stt: &SttConfig, scratch_dir: PathBuf) -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(api.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            http,
            base_url: api.base_url.clone(),
            api_key: api.api_key.clone(),
            model: stt.model.clone(),
            language: stt.language.clone(),
            scratch_dir,
        }
    }

    /// Export `wav` to a scratch file and hand back the live handle.
    fn write_scratch(&self, wav: &[u8]) -> Result<tempfile::NamedTempFile, SttError> {
        std::fs::create_dir_all(&self.scratch_dir).map_err(|e| SttError::Encode(e.to_string()))?;

        let mut file = tempfile::Builder::new()
            .prefix("capture-")
            .suffix(".wav")
            .tempfile_in(&self.scratch_dir)
            .map_err(|e| SttError::Encode(e.to_string()))?;

        file.write_all(wav)
            .map_err(|e| SttError::Encode(e.to_string()))?;
        file.flush().map_err(|e| SttError::Encode(e.to_string()))?;

        Ok(file)
    }
}

#[async_trait]
impl Transcriber for ApiTranscriber {
    async fn transcribe(&self, audio: &[f32]) -> Result<String, SttError> {
        if audio.len() < MIN_AUDIO_SAMPLES {
            return Err(SttError::AudioTooShort);
        }
        if audio.len() > MAX_AUDIO_SAMPLES {
            return Err(SttError::AudioTooLong);
        }

        let wav = encode_wav_16k_mono(audio).map_err(|e| SttError::Encode(e.to_string()))?;

        // The scratch export is what gets uploaded; the handle keeps the
        // file alive until the call returns.
        let scratch = self.write_scratch(&wav)?;
        let upload =
            std::fs::read(scratch.path()).map_err(|e| SttError::Encode(e.to_string()))?;

        let part = reqwest::multipart::Part::bytes(upload)
            .file_name("capture.wav")
            .mime_str("audio/wav")?;

        let form = reqwest::multipart::Form::new()
            .text("model", self.model.clone())
            .text("language", self.language.clone())
            .part("file", part);

        let url = format!("{}/v1/audio/transcriptions", self.base_url);
        let mut req = self.http.post(&url).multipart(form);

        let key = self.api_key.as_deref().unwrap_or("");
        if !key.is_empty() {
            req = req.bearer_auth(key);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SttError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| SttError::Parse(e.to_string()))?;

        let text = json["text"]
            .as_str()
            .ok_or_else(|| SttError::Parse("response is missing the text field".into()))?
            .trim()
            .to_string();

        drop(scratch);

        if text.is_empty() {
            return Err(SttError::NoSpeech);
        }

        Ok(text)
    }
}

// ---------------------------------------------------------------------------
// MockTranscriber  (test-only)
// ---------------------------------------------------------------------------

/// A test double that returns a pre-configured response without any network
/// or filesystem access.
///
/// # Example
///
/// ```rust,ignore
/// let stt = MockTranscriber::ok("hello there");
/// let text = stt.transcribe(&vec![0.0f32; 8_000]).await.unwrap();
/// assert_eq!(text, "hello there");
/// ```
#[cfg(test)]
pub struct MockTranscriber {
    response: Result<String, SttError>,
}

#[cfg(test)]
impl MockTranscriber {
    /// Create a mock that always returns `Ok(text)`.
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            response: Ok(text.into()),
        }
    }

    /// Create a mock that always returns `Err(error)`.
    pub fn err(error: SttError) -> Self {
        Self {
            response: Err(error),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl Transcriber for MockTranscriber {
    async fn transcribe(&self, audio: &[f32]) -> Result<String, SttError> {
        // Enforce the audio-length contract even in the mock so that callers
        // are tested against it.
        if audio.len() < MIN_AUDIO_SAMPLES {
            return Err(SttError::AudioTooShort);
        }
        if audio.len() > MAX_AUDIO_SAMPLES {
            return Err(SttError::AudioTooLong);
        }
        self.response.clone()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiConfig, SttConfig};

    fn make_transcriber() -> ApiTranscriber {
        ApiTranscriber::from_config(
            &ApiConfig::default(),
            &SttConfig::default(),
            std::env::temp_dir(),
        )
    }

    // --- MockTranscriber ---

    #[tokio::test]
    async fn mock_ok_returns_configured_text() {
        let stt = MockTranscriber::ok("hello there");
        let audio = vec![0.0f32; MIN_AUDIO_SAMPLES];
        assert_eq!(stt.transcribe(&audio).await.unwrap(), "hello there");
    }

    #[tokio::test]
    async fn mock_err_returns_configured_error() {
        let stt = MockTranscriber::err(SttError::NoSpeech);
        let audio = vec![0.0f32; MIN_AUDIO_SAMPLES];
        let err = stt.transcribe(&audio).await.unwrap_err();
        assert!(matches!(err, SttError::NoSpeech));
    }

    #[tokio::test]
    async fn mock_short_audio_returns_audio_too_short() {
        let stt = MockTranscriber::ok("text");
        let short = vec![0.0f32; MIN_AUDIO_SAMPLES - 1];
        let err = stt.transcribe(&short).await.unwrap_err();
        assert!(matches!(err, SttError::AudioTooShort));
    }

    #[tokio::test]
    async fn mock_long_audio_returns_audio_too_long() {
        let stt = MockTranscriber::ok("text");
        let long = vec![0.0f32; MAX_AUDIO_SAMPLES + 1];
        let err = stt.transcribe(&long).await.unwrap_err();
        assert!(matches!(err, SttError::AudioTooLong));
    }

    // --- Length boundaries ---

    #[tokio::test]
    async fn exactly_min_audio_does_not_error_in_mock() {
        let stt = MockTranscriber::ok("ok");
        let audio = vec![0.0f32; MIN_AUDIO_SAMPLES];
        assert!(stt.transcribe(&audio).await.is_ok());
    }

    #[tokio::test]
    async fn exactly_max_audio_does_not_error_in_mock() {
        let stt = MockTranscriber::ok("ok");
        let audio = vec![0.0f32; MAX_AUDIO_SAMPLES];
        assert!(stt.transcribe(&audio).await.is_ok());
    }

    // --- ApiTranscriber guards run before any I/O ---

    #[tokio::test]
    async fn api_short_audio_fails_before_upload() {
        let stt = make_transcriber();
        let short = vec![0.0f32; 100];
        let err = stt.transcribe(&short).await.unwrap_err();
        assert!(matches!(err, SttError::AudioTooShort));
    }

    #[tokio::test]
    async fn api_long_audio_fails_before_upload() {
        let stt = make_transcriber();
        let long = vec![0.0f32; MAX_AUDIO_SAMPLES + 1];
        let err = stt.transcribe(&long).await.unwrap_err();
        assert!(matches!(err, SttError::AudioTooLong));
    }

    // --- Scratch export ---

    #[test]
    fn write_scratch_persists_bytes_while_handle_lives() {
        let stt = make_transcriber();
        let file = stt.write_scratch(&[1, 2, 3, 4]).expect("scratch write");

        let read_back = std::fs::read(file.path()).expect("read scratch");
        assert_eq!(read_back, vec![1, 2, 3, 4]);

        let path = file.path().to_path_buf();
        drop(file);
        assert!(!path.exists(), "scratch file must be removed on drop");
    }

    // --- Object safety / error display ---

    #[test]
    fn box_dyn_transcriber_compiles() {
        let _stt: Box<dyn Transcriber> = Box::new(make_transcriber());
    }

    #[test]
    fn stt_error_display_audio_too_short() {
        assert!(SttError::AudioTooShort.to_string().contains("short"));
    }

    #[test]
    fn stt_error_display_no_speech() {
        assert!(SttError::NoSpeech.to_string().contains("no speech"));
    }
}
