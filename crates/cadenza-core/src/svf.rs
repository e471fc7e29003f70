//! State variable filter.
//!
//! Topology-Preserving Transform (TPT) SVF after Zavalishin, "The Art of VA
//! Filter Design" (2012), chapter 3. The trapezoidal integrators keep the
//! filter stable while cutoff and resonance are swept every sample, which is
//! how the synth voice drives it (envelope and LFO modulation).
//!
//! Only the lowpass and highpass responses are exposed; both are computed
//! from the same state so switching mode mid-note does not reset anything.

use core::f32::consts::PI;
use libm::tanf;

use crate::flush_denormal;

/// Lowest accepted cutoff in Hz.
pub const MIN_CUTOFF_HZ: f32 = 20.0;
/// Lowest accepted Q.
pub const MIN_Q: f32 = 0.5;
/// Highest accepted Q.
pub const MAX_Q: f32 = 100.0;

/// Which response the filter returns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FilterMode {
    /// Passes frequencies below the cutoff.
    #[default]
    Lowpass,
    /// Passes frequencies above the cutoff.
    Highpass,
}

/// 2-pole (12 dB/oct) TPT state variable filter.
///
/// ## Parameters
///
/// - `cutoff`: 20 Hz to `sample_rate × 0.49` (clamped)
/// - `q`: 0.5 to 100 (clamped)
/// - `mode`: lowpass or highpass
///
/// # Example
///
/// ```rust
/// use cadenza_core::{FilterMode, StateVariableFilter};
///
/// let mut svf = StateVariableFilter::new(48000.0);
/// svf.set_params(1000.0, 0.707);
/// svf.set_mode(FilterMode::Highpass);
/// let y = svf.process(0.5);
/// assert!(y.is_finite());
/// ```
#[derive(Debug, Clone)]
pub struct StateVariableFilter {
    ic1eq: f32,
    ic2eq: f32,
    g: f32,
    k: f32,
    sample_rate: f32,
    cutoff: f32,
    q: f32,
    mode: FilterMode,
}

impl Default for StateVariableFilter {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl StateVariableFilter {
    /// Create a lowpass SVF at 1 kHz, Q = 0.707.
    pub fn new(sample_rate: f32) -> Self {
        let mut svf = Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            g: 0.0,
            k: 0.0,
            sample_rate,
            cutoff: 1000.0,
            q: 0.707,
            mode: FilterMode::Lowpass,
        };
        svf.update_coefficients();
        svf
    }

    /// Set the sample rate, re-clamping the cutoff to the new Nyquist limit.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.set_params(self.cutoff, self.q);
    }

    /// Set cutoff (Hz) and Q together and recompute coefficients once.
    pub fn set_params(&mut self, cutoff: f32, q: f32) {
        let max_cutoff = (self.sample_rate * 0.49).max(MIN_CUTOFF_HZ);
        self.cutoff = if cutoff.is_finite() {
            cutoff.clamp(MIN_CUTOFF_HZ, max_cutoff)
        } else {
            max_cutoff
        };
        self.q = if q.is_finite() { q.clamp(MIN_Q, MAX_Q) } else { MIN_Q };
        self.update_coefficients();
    }

    /// Current (clamped) cutoff in Hz.
    pub fn cutoff(&self) -> f32 {
        self.cutoff
    }

    /// Current (clamped) Q.
    pub fn q(&self) -> f32 {
        self.q
    }

    /// Select the output response.
    pub fn set_mode(&mut self, mode: FilterMode) {
        self.mode = mode;
    }

    /// Current output response.
    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    fn update_coefficients(&mut self) {
        self.g = tanf(PI * self.cutoff / self.sample_rate);
        self.k = 1.0 / self.q;
    }

    /// Process one sample and return `(lowpass, highpass)`.
    #[inline]
    pub fn process_both(&mut self, input: f32) -> (f32, f32) {
        let v3 = input - self.ic2eq;
        let v1 = (self.g * v3 + self.ic1eq) / (1.0 + self.g * (self.g + self.k));
        let v2 = self.ic2eq + self.g * v1;

        self.ic1eq = flush_denormal(2.0 * v1 - self.ic1eq);
        self.ic2eq = flush_denormal(2.0 * v2 - self.ic2eq);

        let hp = input - self.k * v1 - v2;
        (v2, hp)
    }

    /// Process one sample through the selected response.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let (lp, hp) = self.process_both(input);
        match self.mode {
            FilterMode::Lowpass => lp,
            FilterMode::Highpass => hp,
        }
    }

    /// Clear the integrator state.
    pub fn reset(&mut self) {
        self.ic1eq = 0.0;
        self.ic2eq = 0.0;
    }
}
