//! Fixed-capacity ring buffer for captured audio samples.
//!
//! The capture thread pushes resampled audio while the learner holds the
//! record button; the session runner drains it in one go when the button is
//! released.  On overflow the oldest samples are overwritten, so the buffer
//! always holds the most recent `capacity` samples — the tail of a too-long
//! recording is the part worth transcribing.
//!
//! # Example
//!
//! ```rust
//! use speak_coach::audio::RingBuffer;
//!
//! let mut buf = RingBuffer::new(4);
//! buf.push_slice(&[1.0, 2.0, 3.0, 4.0, 5.0]); // one over capacity
//! assert_eq!(buf.drain(), vec![2.0, 3.0, 4.0, 5.0]);
//! ```

// ---------------------------------------------------------------------------
// RingBuffer
// ---------------------------------------------------------------------------

/// A fixed-capacity circular buffer that overwrites its oldest contents.
///
/// Generic over `T: Copy + Default`; the capture path uses `RingBuffer<f32>`.
/// Storage is allocated once in [`new`](Self::new) and never grows.
pub struct RingBuffer<T> {
    buf: Vec<T>,
    /// Index of the oldest stored sample.
    start: usize,
    /// Number of valid samples currently stored.
    len: usize,
}

impl<T: Copy + Default> RingBuffer<T> {
    /// Create a buffer holding up to `capacity` samples.
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "RingBuffer capacity must be > 0");
        Self {
            buf: vec![T::default(); capacity],
            start: 0,
            len: 0,
        }
    }

    /// Maximum number of samples the buffer can hold.
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Append `data`, overwriting the oldest samples once full.
    pub fn push_slice(&mut self, data: &[T]) {
        let cap = self.buf.len();
        for &sample in data {
            let end = (self.start + self.len) % cap;
            self.buf[end] = sample;
            if self.len == cap {
                // Full: the write just replaced the oldest sample.
                self.start = (self.start + 1) % cap;
            } else {
                self.len += 1;
            }
        }
    }

    /// Take every stored sample in chronological order, leaving the buffer
    /// empty.
    pub fn drain(&mut self) -> Vec<T> {
        let cap = self.buf.len();
        let mut out = Vec::with_capacity(self.len);
        for i in 0..self.len {
            out.push(self.buf[(self.start + i) % cap]);
        }
        self.clear();
        out
    }

    /// Discard all stored samples.
    pub fn clear(&mut self) {
        self.start = 0;
        self.len = 0;
    }

    /// Number of valid samples currently stored.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
