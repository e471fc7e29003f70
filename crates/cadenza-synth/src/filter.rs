//! Per-voice envelope- and LFO-modulated filter.
//!
//! The filter envelope sweeps one base value, selected by
//! `filter_applies_to`:
//!
//! ```text
//! Frequency: cutoff = 20 + env × (filter_freq − 20),  q = filter_q
//! Q:         cutoff = filter_freq,                    q = 1 + env × (filter_q − 1)
//! ```
//!
//! An LFO routed to the filter then adds `lfo × value` to the cutoff or the
//! Q. The results are clamped (cutoff to [20, min(20000, 0.49 × sr)], Q to
//! [0.5, 100]) and the coefficients recomputed for every sample.
//!
//! A disabled filter returns its input untouched, but its envelope keeps
//! running so re-enabling mid-note picks up at the right level.

use cadenza_core::FilterMode;
use cadenza_core::StateVariableFilter;
use cadenza_core::svf::MIN_CUTOFF_HZ;

use crate::envelope::{AdsrEnvelope, AdsrParams};
use crate::params::{ChoiceParam, ParamId, SynthParams};

/// Highest cutoff the voice filter is driven to.
pub const MAX_CUTOFF_HZ: f32 = 20_000.0;

/// Base value of the Q sweep.
const Q_FLOOR: f32 = 1.0;

/// What the filter envelope sweeps.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FilterEnvTarget {
    /// Cutoff frequency.
    #[default]
    Frequency,
    /// Resonance.
    Q,
}

impl ChoiceParam for FilterEnvTarget {
    fn from_index(index: usize) -> Self {
        match index {
            0 => FilterEnvTarget::Frequency,
            _ => FilterEnvTarget::Q,
        }
    }
}

/// Parameter values the filter renders with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FilterSettings {
    /// Filter switched on.
    pub enabled: bool,
    /// Lowpass or highpass.
    pub mode: FilterMode,
    /// Envelope destination.
    pub env_target: FilterEnvTarget,
    /// Base cutoff in Hz.
    pub frequency: f32,
    /// Base Q.
    pub q: f32,
    /// Envelope timing.
    pub envelope: AdsrParams,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            mode: FilterMode::Lowpass,
            env_target: FilterEnvTarget::Frequency,
            frequency: MAX_CUTOFF_HZ,
            q: Q_FLOOR,
            envelope: AdsrParams {
                attack: 0.1,
                decay: 0.33,
                sustain: 0.5,
                release: 0.1,
            },
        }
    }
}

impl FilterSettings {
    /// Read the `filter_*` parameters.
    pub fn read(params: &SynthParams) -> Self {
        Self {
            enabled: params.flag(ParamId::FilterOn),
            mode: params.choice(ParamId::FilterType),
            env_target: params.choice(ParamId::FilterAppliesTo),
            frequency: params.get(ParamId::FilterFreq),
            q: params.get(ParamId::FilterQ),
            envelope: AdsrParams {
                attack: params.get(ParamId::FilterAttack),
                decay: params.get(ParamId::FilterDecay),
                sustain: params.get(ParamId::FilterSustain),
                release: params.get(ParamId::FilterRelease),
            },
        }
    }

    /// Cutoff and Q for envelope level `env` and LFO sample `lfo`, before
    /// range clamping.
    pub fn modulated(&self, env: f32, lfo_frequency: bool, lfo_q: bool, lfo: f32) -> (f32, f32) {
        let (mut cutoff, mut q) = match self.env_target {
            FilterEnvTarget::Frequency => (
                MIN_CUTOFF_HZ + env * (self.frequency - MIN_CUTOFF_HZ),
                self.q,
            ),
            FilterEnvTarget::Q => (self.frequency, Q_FLOOR + env * (self.q - Q_FLOOR)),
        };
        if lfo_frequency {
            cutoff += lfo * cutoff;
        }
        if lfo_q {
            q += lfo * q;
        }
        (cutoff, q)
    }
}

/// Switchable lowpass/highpass filter with its own envelope.
#[derive(Debug, Clone)]
pub struct VoiceFilter {
    svf: StateVariableFilter,
    envelope: AdsrEnvelope,
    sample_rate: f32,
}

impl VoiceFilter {
    /// Create a filter at `sample_rate`.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            svf: StateVariableFilter::new(sample_rate),
            envelope: AdsrEnvelope::new(sample_rate),
            sample_rate,
        }
    }

    /// Clear the filter state and restart the envelope.
    pub fn start_note(&mut self) {
        self.svf.reset();
        self.envelope.note_on();
    }

    /// Release the envelope.
    pub fn stop_note(&mut self) {
        self.envelope.note_off();
    }

    /// Read the filter parameters and filter one sample.
    #[inline]
    pub fn apply(
        &mut self,
        params: &SynthParams,
        sample_rate: f32,
        sample: f32,
        lfo_frequency: bool,
        lfo_q: bool,
        lfo: f32,
    ) -> f32 {
        let settings = FilterSettings::read(params);
        self.process(sample_rate, &settings, sample, lfo_frequency, lfo_q, lfo)
    }

    /// Filter one sample with explicit settings.
    #[inline]
    pub fn process(
        &mut self,
        sample_rate: f32,
        settings: &FilterSettings,
        sample: f32,
        lfo_frequency: bool,
        lfo_q: bool,
        lfo: f32,
    ) -> f32 {
        if sample_rate != self.sample_rate {
            self.sample_rate = sample_rate;
            self.svf.set_sample_rate(sample_rate);
            self.envelope.set_sample_rate(sample_rate);
        }
        self.envelope.set_params(settings.envelope);
        let env = self.envelope.next_sample();

        if !settings.enabled {
            return sample;
        }

        let (cutoff, q) = settings.modulated(env, lfo_frequency, lfo_q, lfo);
        self.svf.set_mode(settings.mode);
        self.svf.set_params(cutoff.min(MAX_CUTOFF_HZ), q);
        self.svf.process(sample)
    }

    /// Cutoff applied to the last processed sample.
    pub fn cutoff(&self) -> f32 {
        self.svf.cutoff()
    }

    /// Q applied to the last processed sample.
    pub fn q(&self) -> f32 {
        self.svf.q()
    }

    /// The filter envelope.
    pub fn envelope(&self) -> &AdsrEnvelope {
        &self.envelope
    }
}
