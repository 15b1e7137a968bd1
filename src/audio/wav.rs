//! In-memory WAV encoding for transcription uploads.
//!
//! The transcription endpoint accepts WAV files, so captured **16 kHz mono
//! `f32`** audio is encoded to 16-bit PCM WAV bytes before upload.  The
//! encoder never touches the filesystem; callers decide where (or whether)
//! the bytes land on disk.

use std::io::Cursor;

// ---------------------------------------------------------------------------
// encode_wav_16k_mono
// ---------------------------------------------------------------------------

/// Encode 16 kHz mono `f32` samples as a complete 16-bit PCM WAV file.
///
/// Samples are clamped to `[-1.0, 1.0]` before quantization, so out-of-range
/// input saturates instead of wrapping.  The returned buffer is a full WAV
/// file (44-byte header + payload) ready for upload.
///
/// # Example
///
/// ```rust
/// use speak_coach::audio::encode_wav_16k_mono;
///
/// let samples = vec![0.0_f32; 16_000]; // 1 second of silence
/// let wav = encode_wav_16k_mono(&samples).unwrap();
/// assert_eq!(&wav[0..4], b"RIFF");
/// assert_eq!(&wav[8..12], b"WAVE");
/// assert_eq!(wav.len(), 44 + 16_000 * 2);
/// ```
pub fn encode_wav_16k_mono(samples: &[f32]) -> Result<Vec<u8>, hound::Error> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 16_000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut data = Vec::with_capacity(44 + samples.len() * 2);
    {
        let mut writer = hound::WavWriter::new(Cursor::new(&mut data), spec)?;
        for &sample in samples {
            let clamped = sample.clamp(-1.0, 1.0);
            writer.write_sample((clamped * i16::MAX as f32) as i16)?;
        }
        writer.finalize()?;
    }

    Ok(data)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
