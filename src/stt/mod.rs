//! STT (Speech-to-Text) module.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                 Transcriber (trait)                  │
//! │                                                      │
//! │   capture (16 kHz mono f32)                          │
//! │        │                                             │
//! │        ▼                                             │
//! │   encode_wav_16k_mono ──▶ scratch .wav               │
//! │        │                                             │
//! │        ▼                                             │
//! │   multipart POST /v1/audio/transcriptions            │
//! │        │                                             │
//! │        ▼                                             │
//! │   { "text": … } ──▶ recognized utterance             │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use speak_coach::config::{AppConfig, AppPaths};
//! use speak_coach::stt::{ApiTranscriber, Transcriber};
//!
//! # async fn example() {
//! let config = AppConfig::default();
//! let stt = ApiTranscriber::from_config(
//!     &config.api,
//!     &config.stt,
//!     AppPaths::new().scratch_dir,
//! );
//!
//! // audio: 16 kHz, mono, f32 PCM from the audio module
//! let audio: Vec<f32> = vec![0.0; 16_000]; // 1 s of silence
//! let text = stt.transcribe(&audio).await.unwrap();
//! println!("{text}");
//! # }
//! ```

pub mod transcriber;

// ── Public re-exports ──────────────────────────────────────────────────────

pub use transcriber::{ApiTranscriber, SttError, Transcriber};

// test-only re-export so session tests can import MockTranscriber without
// `use speak_coach::stt::transcriber::MockTranscriber`.
#[cfg(test)]
pub use transcriber::MockTranscriber;
