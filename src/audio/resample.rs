//! Downmix and resampling for the transcription upload path.
//!
//! The hosted transcription endpoint wants **16 kHz mono `f32`**; capture
//! devices deliver whatever they like (44.1/48 kHz, one or more channels).
//! [`stereo_to_mono`] averages interleaved channels, [`resample_to_16k`]
//! converts the rate with linear interpolation, which is plenty for speech
//! headed to a transcription model. For music-grade quality swap the inner
//! loop for the `rubato` crate (`SincFixedIn`).

// ---------------------------------------------------------------------------
// stereo_to_mono
// ---------------------------------------------------------------------------

/// Average interleaved multi-channel audio down to one channel.
///
/// A trailing partial frame (fewer than `channels` samples) is dropped.
/// Mono input comes back as an owned copy; zero channels yields an empty
/// vector.
///
/// # Example
///
/// ```rust
/// use speak_coach::audio::stereo_to_mono;
///
/// let stereo = [0.8_f32, 0.2, -0.4, -0.6]; // L R L R
/// let mono = stereo_to_mono(&stereo, 2);
/// assert_eq!(mono.len(), 2);
/// assert!((mono[0] - 0.5).abs() < 1e-6);
/// assert!((mono[1] + 0.5).abs() < 1e-6);
/// ```
pub fn stereo_to_mono(samples: &[f32], channels: u16) -> Vec<f32> {
    if channels == 0 {
        return Vec::new();
    }
    if channels == 1 {
        return samples.to_vec();
    }

    let channels = usize::from(channels);
    let frames = samples.len() / channels;
    let mut mono = Vec::with_capacity(frames);

    for frame in 0..frames {
        let offset = frame * channels;
        let sum: f32 = samples[offset..offset + channels].iter().sum();
        mono.push(sum / channels as f32);
    }

    mono
}

// ---------------------------------------------------------------------------
// resample_to_16k
// ---------------------------------------------------------------------------

/// Resample mono `samples` from `source_rate` Hz to 16 000 Hz.
///
/// Output positions step through the input at `source_rate / 16_000` and
/// interpolate linearly between the neighbouring samples; the final position
/// clamps to the last input sample.  Input already at 16 kHz (or empty) is
/// returned as an owned copy.
///
/// # Example
///
/// ```rust
/// use speak_coach::audio::resample_to_16k;
///
/// // 10 ms at 48 kHz becomes 10 ms at 16 kHz.
/// let out = resample_to_16k(&vec![0.25_f32; 480], 48_000);
/// assert_eq!(out.len(), 160);
/// ```
pub fn resample_to_16k(samples: &[f32], source_rate: u32) -> Vec<f32> {
    const TARGET_RATE: u32 = 16_000;

    if source_rate == TARGET_RATE || samples.is_empty() {
        return samples.to_vec();
    }

    let step = source_rate as f64 / TARGET_RATE as f64;
    let output_len = (samples.len() as f64 / step).ceil() as usize;
    let mut out = Vec::with_capacity(output_len);

    let mut pos = 0.0_f64;
    for _ in 0..output_len {
        let idx = pos as usize;
        let sample = if idx + 1 < samples.len() {
            let frac = (pos - idx as f64) as f32;
            samples[idx] + (samples[idx + 1] - samples[idx]) * frac
        } else {
            samples[samples.len() - 1]
        };
        out.push(sample);
        pos += step;
    }

    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
