//! Audio-rate tone oscillator.
//!
//! A phase accumulator in [0, 1) driving one of six waveforms. Each voice
//! owns two oscillators; [`OscSlot`] says which parameter subset an
//! instance reads.
//!
//! # Pitch
//!
//! ```text
//! f = base × 2^octave × 2^((cents + lfo_cents) / 1200)
//! f += lfo × f                  (when the LFO targets frequency)
//! ```
//!
//! The LFO cents contribution is `lfo × 100`, one semitone at full depth.
//!
//! # Waveforms
//!
//! - **Push Square**: `tanh(push × sin(2πφ))`. At push 1 this is a softened
//!   sine; as push grows the flanks steepen into a square.
//! - **Better Sawtooth**: rising saw with a 2nd-order PolyBLEP correction at
//!   the wrap. The residual keeps the output inside [-1, 1].

use core::f32::consts::TAU;
use libm::{exp2f, floorf, sinf};

use cadenza_core::soft_clip;

use crate::params::{ChoiceParam, ParamId, SynthParams};

/// Phase every note starts from.
pub const START_PHASE: f32 = 0.0;

/// Cents of detune per unit of LFO output.
pub const LFO_CENTS_RANGE: f32 = 100.0;

/// Oscillator waveform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OscWaveform {
    /// Pure sine.
    #[default]
    Sine,
    /// Linear triangle.
    Triangle,
    /// Naive ±1 square.
    Square,
    /// Naive rising sawtooth.
    Saw,
    /// Sine soft-clipped toward a square by the push amount.
    PushSquare,
    /// PolyBLEP band-limited rising sawtooth.
    BetterSaw,
}

impl ChoiceParam for OscWaveform {
    fn from_index(index: usize) -> Self {
        match index {
            0 => OscWaveform::Sine,
            1 => OscWaveform::Triangle,
            2 => OscWaveform::Square,
            3 => OscWaveform::Saw,
            4 => OscWaveform::PushSquare,
            _ => OscWaveform::BetterSaw,
        }
    }
}

/// Which of the two voice oscillators an instance is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OscSlot {
    /// Oscillator 1 (`osc1_*` parameters).
    One,
    /// Oscillator 2 (`osc2_*` parameters).
    Two,
}

/// Parameter values an oscillator renders with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OscSettings {
    /// Waveform.
    pub waveform: OscWaveform,
    /// Output gain, 0..1.
    pub gain: f32,
    /// Octave offset.
    pub octave: f32,
    /// Detune in cents.
    pub cents: f32,
    /// Push Square drive, ≥ 1.
    pub push: f32,
}

impl Default for OscSettings {
    fn default() -> Self {
        Self {
            waveform: OscWaveform::Sine,
            gain: 0.5,
            octave: 0.0,
            cents: 0.0,
            push: 1.0,
        }
    }
}

impl OscSlot {
    /// Read this slot's parameter subset.
    pub fn read(self, params: &SynthParams) -> OscSettings {
        let [kind, gain, octave, cents, push] = match self {
            OscSlot::One => [
                ParamId::Osc1Type,
                ParamId::Osc1Gain,
                ParamId::Osc1Octave,
                ParamId::Osc1Cents,
                ParamId::Osc1Push,
            ],
            OscSlot::Two => [
                ParamId::Osc2Type,
                ParamId::Osc2Gain,
                ParamId::Osc2Octave,
                ParamId::Osc2Cents,
                ParamId::Osc2Push,
            ],
        };
        OscSettings {
            waveform: params.choice(kind),
            gain: params.get(gain),
            octave: params.get(octave),
            cents: params.get(cents),
            push: params.get(push),
        }
    }
}

/// Phase-accumulating tone oscillator.
///
/// # Example
///
/// ```rust
/// use cadenza_synth::{OscSettings, OscSlot, OscWaveform, Oscillator};
///
/// let mut osc = Oscillator::new(OscSlot::One);
/// osc.start_note(440.0);
/// let settings = OscSettings { waveform: OscWaveform::BetterSaw, ..OscSettings::default() };
/// osc.update(48000.0, settings, false, false, 0.0);
/// let sample = osc.next_sample();
/// assert!(sample.abs() <= settings.gain);
/// ```
#[derive(Debug, Clone)]
pub struct Oscillator {
    slot: OscSlot,
    phase: f32,
    phase_inc: f32,
    base_freq: f32,
    frequency: f32,
    settings: OscSettings,
}

impl Oscillator {
    /// Create a silent oscillator for `slot`.
    pub fn new(slot: OscSlot) -> Self {
        Self {
            slot,
            phase: START_PHASE,
            phase_inc: 0.0,
            base_freq: 0.0,
            frequency: 0.0,
            settings: OscSettings::default(),
        }
    }

    /// Set the note frequency and restart the phase.
    pub fn start_note(&mut self, frequency: f32) {
        self.base_freq = frequency.max(0.0);
        self.phase = START_PHASE;
    }

    /// Re-read this slot's parameters and recompute the pitch.
    pub fn update_params(
        &mut self,
        params: &SynthParams,
        sample_rate: f32,
        lfo_targets_frequency: bool,
        lfo_targets_cents: bool,
        lfo: f32,
    ) {
        let settings = self.slot.read(params);
        self.update(
            sample_rate,
            settings,
            lfo_targets_frequency,
            lfo_targets_cents,
            lfo,
        );
    }

    /// Apply `settings` and recompute the effective frequency with the given
    /// LFO sample.
    pub fn update(
        &mut self,
        sample_rate: f32,
        settings: OscSettings,
        lfo_targets_frequency: bool,
        lfo_targets_cents: bool,
        lfo: f32,
    ) {
        self.settings = settings;

        let lfo_cents = if lfo_targets_cents {
            lfo * LFO_CENTS_RANGE
        } else {
            0.0
        };
        let mut freq =
            self.base_freq * exp2f(settings.octave) * exp2f((settings.cents + lfo_cents) / 1200.0);
        if lfo_targets_frequency {
            freq += lfo * freq;
        }
        self.frequency = freq.max(0.0);
        self.phase_inc = if sample_rate > 0.0 {
            self.frequency / sample_rate
        } else {
            0.0
        };
    }

    /// Advance the phase and return the scaled waveform value.
    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        self.phase += self.phase_inc;
        if self.phase >= 1.0 {
            self.phase -= floorf(self.phase);
        }
        self.waveform_at(self.phase) * self.settings.gain
    }

    fn waveform_at(&self, phase: f32) -> f32 {
        match self.settings.waveform {
            OscWaveform::Sine => sinf(TAU * phase),
            OscWaveform::Triangle => 4.0 * (phase - 0.5).abs() - 1.0,
            OscWaveform::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            OscWaveform::Saw => 2.0 * phase - 1.0,
            OscWaveform::PushSquare => soft_clip(sinf(TAU * phase), self.settings.push),
            OscWaveform::BetterSaw => 2.0 * phase - 1.0 - poly_blep(phase, self.phase_inc),
        }
    }

    /// Current phase in [0, 1).
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Effective frequency after octave, cents and LFO.
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Settings applied by the last update.
    pub fn settings(&self) -> OscSettings {
        self.settings
    }
}

/// 2nd-order polynomial band-limited step residual for a unit falling edge
/// at phase 0.
///
/// `dt` is capped at 0.5 so the two correction regions never overlap.
#[inline]
fn poly_blep(t: f32, dt: f32) -> f32 {
    let dt = dt.min(0.5);
    if dt <= 0.0 {
        return 0.0;
    }
    if t < dt {
        let x = t / dt;
        2.0 * x - x * x - 1.0
    } else if t > 1.0 - dt {
        let x = (t - 1.0) / dt;
        x * x + 2.0 * x + 1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f32::consts::PI;

    extern crate alloc;
    use alloc::vec::Vec;

    const SR: f32 = 48000.0;

    fn osc(waveform: OscWaveform, freq: f32) -> Oscillator {
        let mut o = Oscillator::new(OscSlot::One);
        o.start_note(freq);
        o.update(
            SR,
            OscSettings {
                waveform,
                gain: 1.0,
                ..OscSettings::default()
            },
            false,
            false,
            0.0,
        );
        o
    }

    fn zero_crossings(o: &mut Oscillator, n: usize) -> usize {
        let mut prev = o.next_sample();
        let mut count = 0;
        for _ in 1..n {
            let s = o.next_sample();
            if prev <= 0.0 && s > 0.0 {
                count += 1;
            }
            prev = s;
        }
        count
    }

    #[test]
    fn test_sine_frequency() {
        let mut o = osc(OscWaveform::Sine, 440.0);
        let crossings = zero_crossings(&mut o, SR as usize);
        assert!((439..=441).contains(&crossings), "expected ~440, got {crossings}");
    }

    #[test]
    fn test_octave_and_cents() {
        let mut o = Oscillator::new(OscSlot::One);
        o.start_note(220.0);
        let up_one = OscSettings {
            octave: 1.0,
            ..OscSettings::default()
        };
        o.update(SR, up_one, false, false, 0.0);
        assert!((o.frequency() - 440.0).abs() < 1e-3);

        let down_cents = OscSettings {
            octave: 0.0,
            cents: -1200.0,
            ..OscSettings::default()
        };
        o.update(SR, down_cents, false, false, 0.0);
        assert!((o.frequency() - 110.0).abs() < 1e-3);
    }

    #[test]
    fn test_lfo_modulation_paths() {
        let mut o = Oscillator::new(OscSlot::Two);
        o.start_note(400.0);
        let s = OscSettings::default();

        o.update(SR, s, true, false, 0.5);
        assert!((o.frequency() - 600.0).abs() < 1e-3, "freq mod adds lfo × f");

        o.update(SR, s, false, true, 1.0);
        let semitone_up = 400.0 * exp2f(1.0 / 12.0);
        assert!((o.frequency() - semitone_up).abs() < 1e-2, "cents mod adds lfo × 100 cents");

        o.update(SR, s, false, false, 1.0);
        assert_eq!(o.frequency(), 400.0, "untargeted LFO is ignored");

        o.update(SR, s, true, false, -2.0);
        assert_eq!(o.frequency(), 0.0, "frequency floors at zero");
    }

    #[test]
    fn test_start_note_resets_phase() {
        let mut o = osc(OscWaveform::Saw, 1000.0);
        for _ in 0..17 {
            o.next_sample();
        }
        o.start_note(1000.0);
        assert_eq!(o.phase(), START_PHASE);
    }

    #[test]
    fn test_all_waveforms_bounded_by_gain() {
        let waveforms = [
            OscWaveform::Sine,
            OscWaveform::Triangle,
            OscWaveform::Square,
            OscWaveform::Saw,
            OscWaveform::PushSquare,
            OscWaveform::BetterSaw,
        ];
        for waveform in waveforms {
            for freq in [20.0, 440.0, 9000.0, 30000.0] {
                let mut o = Oscillator::new(OscSlot::One);
                o.start_note(freq);
                let settings = OscSettings {
                    waveform,
                    gain: 0.7,
                    push: 100.0,
                    ..OscSettings::default()
                };
                o.update(SR, settings, false, false, 0.0);
                for _ in 0..4800 {
                    let s = o.next_sample();
                    assert!(s.abs() <= 0.7 + 1e-6, "{waveform:?} at {freq} Hz gave {s}");
                    assert!((0.0..1.0).contains(&o.phase()));
                }
            }
        }
    }

    #[test]
    fn test_push_hardens_square() {
        let mut soft = Oscillator::new(OscSlot::One);
        let mut hard = Oscillator::new(OscSlot::One);
        soft.start_note(100.0);
        hard.start_note(100.0);
        let base = OscSettings {
            waveform: OscWaveform::PushSquare,
            gain: 1.0,
            ..OscSettings::default()
        };
        soft.update(SR, OscSettings { push: 1.0, ..base }, false, false, 0.0);
        hard.update(SR, OscSettings { push: 100.0, ..base }, false, false, 0.0);

        let n = 480;
        let rms = |o: &mut Oscillator| {
            let sum: f32 = (0..n).map(|_| o.next_sample().powi(2)).sum();
            libm::sqrtf(sum / n as f32)
        };
        let soft_rms = rms(&mut soft);
        let hard_rms = rms(&mut hard);
        assert!(hard_rms > 0.95, "push 100 should be nearly square, rms {hard_rms}");
        assert!(soft_rms < hard_rms, "push 1 rms {soft_rms} vs push 100 rms {hard_rms}");
    }

    #[test]
    fn test_zero_frequency_is_static() {
        let mut o = osc(OscWaveform::Sine, 0.0);
        for _ in 0..100 {
            assert_eq!(o.next_sample(), 0.0);
        }
    }

    fn goertzel_magnitude_db(signal: &[f32], bin: usize, n: usize) -> f32 {
        let w = 2.0 * PI * bin as f32 / n as f32;
        let coeff = 2.0 * libm::cosf(w);
        let mut s0: f64 = 0.0;
        let mut s1: f64 = 0.0;
        let mut s2: f64;
        for &x in signal.iter().take(n) {
            s2 = s1;
            s1 = s0;
            s0 = f64::from(x) + f64::from(coeff) * s1 - s2;
        }
        let real = s0 - s1 * f64::from(libm::cosf(w));
        let imag = s1 * f64::from(libm::sinf(w));
        let magnitude = libm::sqrt(real * real + imag * imag) / (n as f64 / 2.0);
        20.0 * libm::log10(magnitude.max(1e-12)) as f32
    }

    /// A 5 kHz saw at 48 kHz folds its 11th harmonic (55 kHz) to 7 kHz, a
    /// non-harmonic bin. The PolyBLEP saw must leave markedly less there.
    #[test]
    fn test_better_saw_reduces_aliasing() {
        let n = 48000;
        let render = |waveform| -> Vec<f32> {
            let mut o = osc(waveform, 5000.0);
            (0..n).map(|_| o.next_sample()).collect()
        };
        let naive = render(OscWaveform::Saw);
        let better = render(OscWaveform::BetterSaw);

        for bin in [2000_usize, 7000] {
            let naive_db = goertzel_magnitude_db(&naive, bin, n);
            let better_db = goertzel_magnitude_db(&better, bin, n);
            assert!(
                better_db < naive_db - 6.0,
                "alias at {bin} Hz: better {better_db:.1} dB vs naive {naive_db:.1} dB"
            );
        }
    }

    #[test]
    fn test_poly_blep_regions() {
        assert_eq!(poly_blep(0.5, 0.01), 0.0);
        assert_eq!(poly_blep(0.0, 0.01), -1.0);
        assert!((poly_blep(0.999_999, 0.01) - 1.0).abs() < 1e-3);
        assert_eq!(poly_blep(0.3, 0.0), 0.0);
    }
}
