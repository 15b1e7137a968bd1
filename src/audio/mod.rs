//! Audio pipeline — microphone capture → resampling → ring buffer → WAV upload,
//! plus speaker playback of synthesized replies.
//!
//! # Pipeline
//!
//! ```text
//! Microphone → cpal callback → AudioChunk (mpsc) → stereo_to_mono
//!           → resample_to_16k → RingBuffer → encode_wav_16k_mono → upload
//!
//! Reply MP3 bytes → rodio decode → default output device
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::mpsc;
//! use speak_coach::audio::{AudioCapture, AudioChunk};
//!
//! let (tx, rx) = mpsc::channel::<AudioChunk>();
//! let capture = AudioCapture::new().unwrap();
//! let _handle = capture.start(tx).unwrap(); // drops handle → stops stream
//!
//! while let Ok(chunk) = rx.recv() {
//!     println!("received {} samples @ {}Hz", chunk.samples.len(), chunk.sample_rate);
//! }
//! ```

pub mod buffer;
pub mod capture;
pub mod playback;
pub mod resample;
pub mod wav;

pub use buffer::RingBuffer;
pub use capture::{AudioCapture, AudioChunk, CaptureError, StreamHandle};
pub use playback::{play_bytes, PlaybackError};
pub use resample::{resample_to_16k, stereo_to_mono};
pub use wav::encode_wav_16k_mono;
