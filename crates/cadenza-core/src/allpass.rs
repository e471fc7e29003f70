//! Schroeder allpass for reverb diffusion.
//!
//! Freeverb form:
//!
//! ```text
//! delayed = buf[i]
//! out     = delayed - in
//! buf[i]  = in + delayed * feedback
//! ```

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec;
use alloc::vec::Vec;

use crate::flush_denormal;

/// Fixed-length Schroeder allpass.
#[derive(Debug, Clone)]
pub struct AllpassFilter {
    buffer: Vec<f32>,
    index: usize,
    feedback: f32,
}

impl AllpassFilter {
    /// Create an allpass with a delay of `length` samples (minimum 1) and
    /// feedback 0.5.
    pub fn new(length: usize) -> Self {
        Self {
            buffer: vec![0.0; length.max(1)],
            index: 0,
            feedback: 0.5,
        }
    }

    /// Feedback coefficient, clamped to (-1, 1).
    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback.clamp(-0.99, 0.99);
    }

    /// Process one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let delayed = self.buffer[self.index];
        self.buffer[self.index] = flush_denormal(input + delayed * self.feedback);
        self.index = (self.index + 1) % self.buffer.len();
        delayed - input
    }

    /// Silence the allpass.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.index = 0;
    }
}
