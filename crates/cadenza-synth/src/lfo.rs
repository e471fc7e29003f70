//! Low-frequency modulation source and its target router.
//!
//! The synth owns a single [`Lfo`]. It is advanced once per rendered sample
//! and the resulting scalar is handed by value to every voice, so all
//! consumers see the same phase. The phase is never reset by note events.
//!
//! [`LfoRouting`] answers "does the LFO modulate X?" for each consumer. It is
//! a plain `Copy` value with no mutable state, so the order in which voices
//! and their components query it does not matter.

use core::f32::consts::TAU;
use libm::{floorf, sinf};

use crate::params::{ChoiceParam, ParamId, SynthParams};

/// LFO waveform
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LfoWaveform {
    /// Sine.
    #[default]
    Sine,
    /// Symmetric triangle.
    Triangle,
    /// -1 for the first half cycle, +1 for the second.
    Square,
    /// Rising ramp.
    Saw,
    /// Falling ramp.
    InvertedSaw,
}

impl ChoiceParam for LfoWaveform {
    fn from_index(index: usize) -> Self {
        match index {
            0 => LfoWaveform::Sine,
            1 => LfoWaveform::Triangle,
            2 => LfoWaveform::Square,
            3 => LfoWaveform::Saw,
            _ => LfoWaveform::InvertedSaw,
        }
    }
}

/// The single destination the LFO is routed to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LfoTarget {
    /// Oscillator 1 frequency.
    #[default]
    Osc1Frequency,
    /// Oscillator 1 cents.
    Osc1Cents,
    /// Oscillator 2 frequency.
    Osc2Frequency,
    /// Oscillator 2 cents.
    Osc2Cents,
    /// Frequency of both oscillators.
    OscBothFrequency,
    /// Cents of both oscillators.
    OscBothCents,
    /// Filter cutoff.
    FilterFrequency,
    /// Filter resonance.
    FilterQ,
    /// Amplifier volume.
    AmpVolume,
    /// Amplifier distortion drive.
    AmpDistortion,
}

impl ChoiceParam for LfoTarget {
    fn from_index(index: usize) -> Self {
        match index {
            0 => LfoTarget::Osc1Frequency,
            1 => LfoTarget::Osc1Cents,
            2 => LfoTarget::Osc2Frequency,
            3 => LfoTarget::Osc2Cents,
            4 => LfoTarget::OscBothFrequency,
            5 => LfoTarget::OscBothCents,
            6 => LfoTarget::FilterFrequency,
            7 => LfoTarget::FilterQ,
            8 => LfoTarget::AmpVolume,
            _ => LfoTarget::AmpDistortion,
        }
    }
}

/// Target queries for one block.
///
/// Every query is `false` while the LFO is off. Frequency and cents queries
/// for each oscillator also match the combined "both oscillators" target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LfoRouting {
    /// LFO switched on.
    pub enabled: bool,
    /// Selected destination.
    pub target: LfoTarget,
}

impl LfoRouting {
    /// Read `lfo_on` and `lfo_applies_to`.
    pub fn read(params: &SynthParams) -> Self {
        Self {
            enabled: params.flag(ParamId::LfoOn),
            target: params.choice(ParamId::LfoAppliesTo),
        }
    }

    #[inline]
    fn is(self, target: LfoTarget) -> bool {
        self.enabled && self.target == target
    }

    /// Modulates oscillator 1 frequency.
    #[inline]
    pub fn osc1_frequency(self) -> bool {
        self.is(LfoTarget::Osc1Frequency) || self.is(LfoTarget::OscBothFrequency)
    }

    /// Modulates oscillator 1 cents.
    #[inline]
    pub fn osc1_cents(self) -> bool {
        self.is(LfoTarget::Osc1Cents) || self.is(LfoTarget::OscBothCents)
    }

    /// Modulates oscillator 2 frequency.
    #[inline]
    pub fn osc2_frequency(self) -> bool {
        self.is(LfoTarget::Osc2Frequency) || self.is(LfoTarget::OscBothFrequency)
    }

    /// Modulates oscillator 2 cents.
    #[inline]
    pub fn osc2_cents(self) -> bool {
        self.is(LfoTarget::Osc2Cents) || self.is(LfoTarget::OscBothCents)
    }

    /// Modulates the frequency of both oscillators.
    #[inline]
    pub fn osc_both_frequency(self) -> bool {
        self.is(LfoTarget::OscBothFrequency)
    }

    /// Modulates the cents of both oscillators.
    #[inline]
    pub fn osc_both_cents(self) -> bool {
        self.is(LfoTarget::OscBothCents)
    }

    /// Modulates filter cutoff.
    #[inline]
    pub fn filter_frequency(self) -> bool {
        self.is(LfoTarget::FilterFrequency)
    }

    /// Modulates filter Q.
    #[inline]
    pub fn filter_q(self) -> bool {
        self.is(LfoTarget::FilterQ)
    }

    /// Modulates amplifier volume.
    #[inline]
    pub fn amp_volume(self) -> bool {
        self.is(LfoTarget::AmpVolume)
    }

    /// Modulates amplifier distortion drive.
    #[inline]
    pub fn amp_distortion(self) -> bool {
        self.is(LfoTarget::AmpDistortion)
    }
}

/// Parameter values the LFO renders with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LfoSettings {
    /// Waveform.
    pub waveform: LfoWaveform,
    /// Rate in Hz.
    pub frequency: f32,
    /// Output scale, 0..1.
    pub depth: f32,
}

impl Default for LfoSettings {
    fn default() -> Self {
        Self {
            waveform: LfoWaveform::Sine,
            frequency: 1.0,
            depth: 0.5,
        }
    }
}

impl LfoSettings {
    /// Read `lfo_type`, `lfo_frequency` and `lfo_depth`.
    pub fn read(params: &SynthParams) -> Self {
        Self {
            waveform: params.choice(ParamId::LfoType),
            frequency: params.get(ParamId::LfoFrequency),
            depth: params.get(ParamId::LfoDepth),
        }
    }
}

/// Free-running low-frequency oscillator.
///
/// ```rust
/// use cadenza_synth::{Lfo, LfoSettings, LfoWaveform};
///
/// let mut lfo = Lfo::new();
/// lfo.update(1000.0, LfoSettings { waveform: LfoWaveform::Saw, frequency: 1.0, depth: 1.0 });
/// let first = lfo.next_sample();
/// assert!((first - (2.0 * 0.001 - 1.0)).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Lfo {
    phase: f32,
    phase_inc: f32,
    settings: LfoSettings,
}

impl Lfo {
    /// Create an LFO at phase 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-read the LFO parameters.
    pub fn update_params(&mut self, params: &SynthParams, sample_rate: f32) {
        self.update(sample_rate, LfoSettings::read(params));
    }

    /// Apply `settings` and recompute the phase increment.
    pub fn update(&mut self, sample_rate: f32, settings: LfoSettings) {
        self.settings = settings;
        self.phase_inc = if sample_rate > 0.0 {
            settings.frequency.max(0.0) / sample_rate
        } else {
            0.0
        };
    }

    /// Advance the phase and return the depth-scaled waveform value.
    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        self.phase += self.phase_inc;
        if self.phase >= 1.0 {
            self.phase -= floorf(self.phase);
        }
        let p = self.phase;
        let value = match self.settings.waveform {
            LfoWaveform::Sine => sinf(TAU * p),
            LfoWaveform::Triangle => 4.0 * (p - 0.5).abs() - 1.0,
            LfoWaveform::Square => {
                if p < 0.5 {
                    -1.0
                } else {
                    1.0
                }
            }
            LfoWaveform::Saw => 2.0 * p - 1.0,
            LfoWaveform::InvertedSaw => 1.0 - 2.0 * p,
        };
        value * self.settings.depth
    }

    /// Fill `out` with consecutive samples, re-reading parameters before each.
    pub fn fill(&mut self, params: &SynthParams, sample_rate: f32, out: &mut [f32]) {
        for slot in out.iter_mut() {
            self.update_params(params, sample_rate);
            *slot = self.next_sample();
        }
    }

    /// Current phase in [0, 1).
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Settings applied by the last update.
    pub fn settings(&self) -> LfoSettings {
        self.settings
    }
}
