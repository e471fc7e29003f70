//! One-pole lowpass filter.
//!
//! ```text
//! y[n] = x[n] + coeff * (y[n-1] - x[n])
//! ```
//!
//! with `coeff = exp(-2π * freq / sample_rate)`. 6 dB/oct, zero latency, one
//! multiply per sample. The noise generator uses it to colour white noise.

use crate::flush_denormal;
use libm::expf;

/// One-pole (6 dB/oct) lowpass filter.
///
/// # Invariants
///
/// - `coeff` is always in [0, 1) for positive cutoff and sample rate
/// - `state` is flushed to zero when below 1e-20
///
/// # Example
///
/// ```rust
/// use cadenza_core::OnePole;
///
/// let mut lp = OnePole::new(48000.0, 4000.0);
/// let filtered = lp.process(1.0);
/// assert!(filtered < 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct OnePole {
    state: f32,
    coeff: f32,
    sample_rate: f32,
    freq: f32,
}

impl OnePole {
    /// Create a new one-pole lowpass at `freq_hz`.
    pub fn new(sample_rate: f32, freq_hz: f32) -> Self {
        let mut filter = Self {
            state: 0.0,
            coeff: 0.0,
            sample_rate,
            freq: freq_hz,
        };
        filter.recalculate_coeff();
        filter
    }

    /// Set the cutoff frequency in Hz.
    ///
    /// Skips the `exp` when the frequency is unchanged, so calling this
    /// every sample with a steady parameter is cheap.
    pub fn set_frequency(&mut self, freq_hz: f32) {
        if freq_hz != self.freq {
            self.freq = freq_hz;
            self.recalculate_coeff();
        }
    }

    /// Current cutoff frequency in Hz.
    pub fn frequency(&self) -> f32 {
        self.freq
    }

    /// Update the sample rate and recalculate the coefficient.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        if sample_rate != self.sample_rate {
            self.sample_rate = sample_rate;
            self.recalculate_coeff();
        }
    }

    /// Filter one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        self.state = flush_denormal(input + self.coeff * (self.state - input));
        self.state
    }

    /// Reset filter state to zero.
    pub fn reset(&mut self) {
        self.state = 0.0;
    }

    fn recalculate_coeff(&mut self) {
        let freq = self.freq.max(0.0);
        self.coeff = expf(-core::f32::consts::TAU * freq / self.sample_rate.max(1.0));
    }
}
