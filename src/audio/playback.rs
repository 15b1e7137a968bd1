//! Speaker playback via `rodio`.
//!
//! Replies arrive as encoded MP3 bytes from the speech endpoint; this module
//! decodes and plays them on the default output device.  [`play_bytes`]
//! blocks until playback finishes, so callers run it on a dedicated thread
//! rather than the UI or async runtime threads.

use std::io::Cursor;

use rodio::Decoder;
use thiserror::Error;

// ---------------------------------------------------------------------------
// PlaybackError
// ---------------------------------------------------------------------------

/// Errors that can occur while decoding or playing reply audio.
#[derive(Debug, Clone, Error)]
pub enum PlaybackError {
    /// The bytes could not be decoded as a known audio format.
    #[error("failed to decode audio: {0}")]
    Decode(String),

    /// The default output device could not be opened.
    #[error("failed to open audio output: {0}")]
    Stream(String),
}

// ---------------------------------------------------------------------------
// play_bytes
// ---------------------------------------------------------------------------

/// Decode `bytes` (MP3 or WAV) and play them to completion on the default
/// output device.
///
/// Decoding happens before the device is opened, so malformed bytes fail
/// fast without touching audio hardware.  Blocks the calling thread until
/// the sink drains.
pub fn play_bytes(bytes: Vec<u8>) -> Result<(), PlaybackError> {
    let source =
        Decoder::new(Cursor::new(bytes)).map_err(|e| PlaybackError::Decode(e.to_string()))?;

    // The stream must outlive the sink or playback goes silent.
    let stream = rodio::OutputStreamBuilder::open_default_stream()
        .map_err(|e| PlaybackError::Stream(e.to_string()))?;
    let sink = rodio::Sink::connect_new(&stream.mixer());

    sink.append(source);
    sink.sleep_until_end();

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// Garbage bytes must fail at the decode step, before any attempt to
    /// open an output device (keeps this test runnable on headless hosts).
    #[test]
    fn garbage_bytes_fail_to_decode() {
        let err = play_bytes(vec![0, 1, 2, 3, 4, 5]).unwrap_err();
        assert!(matches!(err, PlaybackError::Decode(_)));
    }

    #[test]
    fn empty_bytes_fail_to_decode() {
        let err = play_bytes(Vec::new()).unwrap_err();
        assert!(matches!(err, PlaybackError::Decode(_)));
    }

    #[test]
    fn error_display_mentions_decode() {
        let err = PlaybackError::Decode("bad header".into());
        assert!(err.to_string().contains("decode"));
    }
}
