//! Circular delay buffer with fractional reads.
//!
//! One [`DelayBuffer`] holds a single channel. Capacity is fixed when the
//! buffer is created or resized (control path only); reads and writes never
//! allocate.
//!
//! # Indexing
//!
//! With write index `w` and capacity `cap`, a lag of `n` samples lives at
//! `(w - n + cap) % cap`: the sample written `n` writes ago. A fractional
//! delay `d` interpolates linearly between lags `⌊d⌋` and `⌊d⌋ + 1`, so an
//! integer delay returns exactly the sample written `d` samples earlier.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec;
use alloc::vec::Vec;
use libm::ceilf;

use crate::lerp;

/// Smallest capacity a buffer is created with.
const MIN_CAPACITY: usize = 3;

/// Single-channel circular delay buffer.
///
/// # Example
///
/// ```rust
/// use cadenza_core::DelayBuffer;
///
/// let mut line = DelayBuffer::new(16);
/// line.write(1.0);
/// for _ in 0..3 {
///     line.write(0.0);
/// }
/// // The impulse was written four samples ago.
/// assert_eq!(line.read(4.0), 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct DelayBuffer {
    buffer: Vec<f32>,
    write_pos: usize,
}

impl DelayBuffer {
    /// Create a silent buffer holding `capacity` samples (minimum 3).
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: vec![0.0; capacity.max(MIN_CAPACITY)],
            write_pos: 0,
        }
    }

    /// Capacity needed for `max_seconds` of delay: `ceil(max_seconds × sr) + 1`.
    pub fn capacity_for(sample_rate: f32, max_seconds: f32) -> usize {
        ceilf((max_seconds * sample_rate).max(0.0)) as usize + 1
    }

    /// Create a buffer sized for `max_seconds` at `sample_rate`.
    pub fn for_time(sample_rate: f32, max_seconds: f32) -> Self {
        Self::new(Self::capacity_for(sample_rate, max_seconds))
    }

    /// Reallocate to `capacity` samples and silence the contents.
    ///
    /// Allocates; call from the control path only.
    pub fn resize(&mut self, capacity: usize) {
        let capacity = capacity.max(MIN_CAPACITY);
        self.buffer.clear();
        self.buffer.resize(capacity, 0.0);
        self.write_pos = 0;
    }

    /// Read the signal `delay_samples` behind the write index.
    ///
    /// The delay is clamped to `[1, capacity - 1]`, so a buffer from
    /// [`for_time`](Self::for_time) reaches its full length exactly.
    #[inline]
    pub fn read(&self, delay_samples: f32) -> f32 {
        let cap = self.buffer.len();
        let max_delay = (cap - 1) as f32;
        let delay = if delay_samples.is_finite() {
            delay_samples.clamp(1.0, max_delay)
        } else {
            1.0
        };

        let whole = delay as usize;
        let frac = delay - whole as f32;

        let near = self.buffer[(self.write_pos + cap - whole) % cap];
        let far = self.buffer[(self.write_pos + cap - whole - 1) % cap];
        lerp(near, far, frac)
    }

    /// Store `sample` at the write index and advance it.
    #[inline]
    pub fn write(&mut self, sample: f32) {
        self.buffer[self.write_pos] = sample;
        self.write_pos = (self.write_pos + 1) % self.buffer.len();
    }

    /// Silence the buffer and rewind the write index.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }

    /// Capacity in samples.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Current write index, always `< capacity()`.
    pub fn write_pos(&self) -> usize {
        self.write_pos
    }

    /// Longest delay [`read`](Self::read) honours, in samples.
    pub fn max_delay(&self) -> f32 {
        (self.buffer.len() - 1) as f32
    }
}
