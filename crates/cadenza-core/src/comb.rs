//! Damped feedback comb filter.
//!
//! The Freeverb comb: a fixed-length delay whose feedback path runs through
//! a one-pole lowpass, so high frequencies die away faster than lows.
//!
//! ```text
//! out   = buf[i]
//! store = out * (1 - damp) + store * damp
//! buf[i] = in + store * feedback
//! ```

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec;
use alloc::vec::Vec;

use crate::flush_denormal;

/// Lowpass-feedback comb filter with a fixed delay length.
///
/// # Example
///
/// ```rust
/// use cadenza_core::CombFilter;
///
/// let mut comb = CombFilter::new(1116);
/// comb.set_feedback(0.84);
/// comb.set_damp(0.2);
/// let out = comb.process(1.0);
/// assert_eq!(out, 0.0); // nothing has come round yet
/// ```
#[derive(Debug, Clone)]
pub struct CombFilter {
    buffer: Vec<f32>,
    index: usize,
    feedback: f32,
    damp: f32,
    store: f32,
}

impl CombFilter {
    /// Create a comb with a delay of `length` samples (minimum 1).
    pub fn new(length: usize) -> Self {
        Self {
            buffer: vec![0.0; length.max(1)],
            index: 0,
            feedback: 0.5,
            damp: 0.5,
            store: 0.0,
        }
    }

    /// Feedback gain, clamped to [0, 0.99].
    #[inline]
    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback.clamp(0.0, 0.99);
    }

    /// Damping amount: 0 is bright, 1 is fully damped.
    #[inline]
    pub fn set_damp(&mut self, damp: f32) {
        self.damp = damp.clamp(0.0, 1.0);
    }

    /// Process one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let output = self.buffer[self.index];
        self.store = flush_denormal(output * (1.0 - self.damp) + self.store * self.damp);
        self.buffer[self.index] = flush_denormal(input + self.store * self.feedback);
        self.index = (self.index + 1) % self.buffer.len();
        output
    }

    /// Silence the comb.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.store = 0.0;
        self.index = 0;
    }

    /// Delay length in samples.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Always `false`; a comb holds at least one sample.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}
