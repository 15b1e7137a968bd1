//! Speak Coach — hold-to-talk English conversation practice.
//!
//! The app records a spoken sentence, transcribes it, corrects the grammar,
//! feeds the corrected sentence to a conversation model with a summarised
//! memory of the session, and speaks the reply back:
//!
//! ```text
//!   mic (cpal) ──> ring buffer ──> transcription ──> grammar check
//!                                                         │
//!   speaker (rodio) <── speech synthesis <── conversation <┘
//! ```
//!
//! Module map:
//!
//! - [`audio`]   — capture, resampling, WAV encoding, playback.
//! - [`stt`]     — hosted transcription client.
//! - [`llm`]     — grammar correction, conversation with memory, topics.
//! - [`tts`]     — hosted speech synthesis client.
//! - [`session`] — turn state machine and the orchestrating runner.
//! - [`config`]  — TOML settings and platform paths.
//! - [`app`]     — the egui front-end.

pub mod app;
pub mod audio;
pub mod config;
pub mod llm;
pub mod session;
pub mod stt;
pub mod tts;
