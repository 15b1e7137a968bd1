//! Text-to-speech subsystem.
//!
//! Turns assistant replies into playable audio via a hosted speech
//! endpoint:
//!
//! ```text
//!   reply text ──> /v1/audio/speech ──> MP3 bytes ──> AudioArtifact
//!                                          │
//!                                          └──> scratch response.mp3
//! ```
//!
//! The [`SpeechSynthesizer`] trait hides the backend so the session layer
//! can run against a mock in tests.  [`AudioArtifact`] carries the bytes
//! plus a `data:` URL renderer for surfaces that embed audio.
//!
//! # Quick start
//!
//! ```no_run
//! use speak_coach::config::AppConfig;
//! use speak_coach::tts::{ApiSynthesizer, SpeechSynthesizer};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::default();
//! let tts = ApiSynthesizer::from_config(
//!     &config.api,
//!     &config.tts,
//!     std::env::temp_dir(),
//! );
//!
//! let artifact = tts.synthesize("Nice to meet you!").await?;
//! println!("{} bytes at {}", artifact.bytes.len(), artifact.path.display());
//! # Ok(())
//! # }
//! ```

pub mod synthesizer;

pub use synthesizer::{ApiSynthesizer, AudioArtifact, SpeechSynthesizer, TtsError};

#[cfg(test)]
pub use synthesizer::MockSynthesizer;
