//! The synth's parameter table and lock-free parameter store.
//!
//! [`ParamId`] names every parameter; [`DESCRIPTORS`] holds its metadata in
//! the same order. [`SynthParams`] keeps the live values as atomics (`f32`
//! bit-cast to `u32`) so a control thread can write while the audio thread
//! reads, without locks and without the audio thread ever writing.
//!
//! ```rust
//! use cadenza_synth::{ParamId, SynthParams};
//!
//! let params = SynthParams::new();
//! assert_eq!(params.get(ParamId::AmpVolume), 0.1);
//!
//! // Writes are clamped to the descriptor range.
//! params.set(ParamId::AmpVolume, 3.0);
//! assert_eq!(params.get(ParamId::AmpVolume), 1.0);
//!
//! assert_eq!(ParamId::from_string_id("delay_type"), Some(ParamId::DelayType));
//! ```

use core::sync::atomic::{AtomicU32, Ordering};

use cadenza_core::{FilterMode, ParamDescriptor, ParamScale};
use cadenza_effects::DelayMode;

/// Option labels for the oscillator waveform choice.
pub const OSC_WAVEFORMS: &[&str] = &[
    "Sine",
    "Triangle",
    "Square",
    "Sawtooth",
    "Push Square",
    "Better Sawtooth",
];
/// Option labels for the LFO waveform choice.
pub const LFO_WAVEFORMS: &[&str] = &["Sine", "Triangle", "Square", "Sawtooth", "Inverted Sawtooth"];
/// Option labels for the LFO target choice.
pub const LFO_TARGETS: &[&str] = &[
    "Osc 1 Frequency",
    "Osc 1 Cents",
    "Osc 2 Frequency",
    "Osc 2 Cents",
    "Osc 1&2 Frequency",
    "Osc 1&2 Cents",
    "Filter Frequency",
    "Filter Q",
    "Amp Volume",
    "Amp Distortion",
];
/// Option labels for the filter response choice.
pub const FILTER_TYPES: &[&str] = &["Low pass", "High pass"];
/// Option labels for what the filter envelope sweeps.
pub const FILTER_ENV_TARGETS: &[&str] = &["Frequency", "Q"];
/// Option labels for the delay topology choice.
pub const DELAY_TYPES: &[&str] = &["Normal", "Ping Pong"];

/// An enumeration stored in a choice parameter.
pub trait ChoiceParam: Sized {
    /// Decode an option index. Out-of-range indices map to the last option.
    fn from_index(index: usize) -> Self;
}

impl ChoiceParam for FilterMode {
    fn from_index(index: usize) -> Self {
        match index {
            0 => FilterMode::Lowpass,
            _ => FilterMode::Highpass,
        }
    }
}

impl ChoiceParam for DelayMode {
    fn from_index(index: usize) -> Self {
        match index {
            0 => DelayMode::Normal,
            _ => DelayMode::PingPong,
        }
    }
}

/// Identifier of every synth parameter, in table order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(usize)]
#[allow(missing_docs)]
pub enum ParamId {
    Osc1Type,
    Osc1Gain,
    Osc1Octave,
    Osc1Cents,
    Osc1Push,
    Osc2Type,
    Osc2Gain,
    Osc2Octave,
    Osc2Cents,
    Osc2Push,
    NoiseOn,
    NoiseGain,
    NoiseFilter,
    NoiseDuration,
    LfoOn,
    LfoType,
    LfoAppliesTo,
    LfoFrequency,
    LfoDepth,
    FilterOn,
    FilterType,
    FilterAppliesTo,
    FilterFreq,
    FilterQ,
    FilterAttack,
    FilterDecay,
    FilterSustain,
    FilterRelease,
    AmpEnvAttack,
    AmpEnvDecay,
    AmpEnvSustain,
    AmpEnvRelease,
    AmpDistOn,
    AmpDistGain,
    AmpVolume,
    DelayOn,
    DelayType,
    DelayTime,
    DelayWetLevel,
    DelayDryLevel,
    DelayFeedback,
    DelayDepth,
    ReverbOn,
    ReverbRoomSize,
    ReverbDamping,
    ReverbWetLevel,
    ReverbDryLevel,
    ReverbWidth,
}

/// Number of parameters.
pub const PARAM_COUNT: usize = 48;

/// Longest noise duration; selecting it holds the noise indefinitely.
pub const NOISE_DURATION_MAX: f32 = 100.0;

/// Metadata for every parameter, indexed by [`ParamId::index`].
pub static DESCRIPTORS: [ParamDescriptor; PARAM_COUNT] = [
    ParamDescriptor::choice("osc1_type", "Osc 1: Type", OSC_WAVEFORMS, 0),
    ParamDescriptor::float("osc1_gain", "Osc 1: Gain", 0.0, 1.0, 0.5),
    ParamDescriptor::int("osc1_octave", "Osc 1: Octave", -2, 2, 0),
    ParamDescriptor::int("osc1_cents", "Osc 1: Cents", -100, 100, 0),
    ParamDescriptor::float("osc1_push", "Osc 1: Push", 1.0, 100.0, 1.0)
        .with_scale(ParamScale::Skewed(0.33)),
    ParamDescriptor::choice("osc2_type", "Osc 2: Type", OSC_WAVEFORMS, 0),
    ParamDescriptor::float("osc2_gain", "Osc 2: Gain", 0.0, 1.0, 0.5),
    ParamDescriptor::int("osc2_octave", "Osc 2: Octave", -2, 2, 0),
    ParamDescriptor::int("osc2_cents", "Osc 2: Cents", -100, 100, 0),
    ParamDescriptor::float("osc2_push", "Osc 2: Push", 1.0, 100.0, 1.0)
        .with_scale(ParamScale::Skewed(0.33)),
    ParamDescriptor::toggle("noise_on", "Noise: On", false),
    ParamDescriptor::float("noise_gain", "Noise: Gain", 0.0, 1.0, 0.0),
    ParamDescriptor::float("noise_filter", "Noise: Filter", 0.0, 1.0, 1.0),
    ParamDescriptor::float("noise_duration", "Noise: Duration", 0.0, NOISE_DURATION_MAX, 1.0)
        .with_scale(ParamScale::Skewed(0.25)),
    ParamDescriptor::toggle("lfo_on", "LFO: On", false),
    ParamDescriptor::choice("lfo_type", "LFO: Type", LFO_WAVEFORMS, 0),
    ParamDescriptor::choice("lfo_applies_to", "LFO: Applies To", LFO_TARGETS, 0),
    ParamDescriptor::float("lfo_frequency", "LFO: Frequency", 0.1, 20.0, 1.0)
        .with_scale(ParamScale::Skewed(0.33)),
    ParamDescriptor::float("lfo_depth", "LFO: Depth", 0.0, 1.0, 0.5),
    ParamDescriptor::toggle("filter_on", "Filter: On", true),
    ParamDescriptor::choice("filter_type", "Filter: Type", FILTER_TYPES, 0),
    ParamDescriptor::choice(
        "filter_applies_to",
        "Filter: Applies To",
        FILTER_ENV_TARGETS,
        0,
    ),
    ParamDescriptor::float("filter_freq", "Filter: Frequency", 20.0, 20000.0, 20000.0)
        .with_scale(ParamScale::Skewed(0.25)),
    ParamDescriptor::float("filter_q", "Filter: Q", 1.0, 100.0, 1.0)
        .with_scale(ParamScale::Skewed(0.33)),
    ParamDescriptor::float("filter_attack", "Filter: Attack", 0.0, 1.0, 0.1),
    ParamDescriptor::float("filter_decay", "Filter: Decay", 0.0, 1.0, 0.33),
    ParamDescriptor::float("filter_sustain", "Filter: Sustain", 0.0, 1.0, 0.5),
    ParamDescriptor::float("filter_release", "Filter: Release", 0.0, 1.0, 0.1),
    ParamDescriptor::float("amp_env_attack", "Amp: Envelope Attack", 0.001, 1.0, 0.1),
    ParamDescriptor::float("amp_env_decay", "Amp: Envelope Decay", 0.0, 1.0, 0.33),
    ParamDescriptor::float("amp_env_sustain", "Amp: Envelope Sustain", 0.0, 1.0, 0.5),
    ParamDescriptor::float("amp_env_release", "Amp: Envelope Release", 0.0, 1.0, 0.1),
    ParamDescriptor::toggle("amp_dist_on", "Amp: Distortion On", false),
    ParamDescriptor::float("amp_dist_gain", "Amp: Distortion Gain", 1.0, 100.0, 1.0)
        .with_scale(ParamScale::Skewed(0.4)),
    ParamDescriptor::float("amp_volume", "Amp: Volume", 0.0, 1.0, 0.1)
        .with_scale(ParamScale::Skewed(0.25)),
    ParamDescriptor::toggle("delay_on", "Delay: On", false),
    ParamDescriptor::choice("delay_type", "Delay: Type", DELAY_TYPES, 1),
    ParamDescriptor::float("delay_delay_time", "Delay: Delay Time (s)", 0.0, 2.0, 0.5),
    ParamDescriptor::float("delay_wet_level", "Delay: Wet Level", 0.0, 1.0, 0.0),
    ParamDescriptor::float("delay_dry_level", "Delay: Dry Level", 0.0, 1.0, 0.4),
    ParamDescriptor::float("delay_feedback", "Delay: Feedback", 0.0, 1.0, 0.0),
    ParamDescriptor::float("delay_depth", "Delay: Depth", 0.5, 1.0, 1.0),
    ParamDescriptor::toggle("reverb_on", "Reverb: On", false),
    ParamDescriptor::float("reverb_room_size", "Reverb: Room Size", 0.0, 1.0, 0.5),
    ParamDescriptor::float("reverb_damping", "Reverb: Damping", 0.0, 1.0, 0.5),
    ParamDescriptor::float("reverb_wet_level", "Reverb: Wet Level", 0.0, 1.0, 0.33),
    ParamDescriptor::float("reverb_dry_level", "Reverb: Dry Level", 0.0, 1.0, 0.4),
    ParamDescriptor::float("reverb_width", "Reverb: Width", 0.0, 1.0, 1.0),
];

impl ParamId {
    /// Every parameter, in table order.
    pub const ALL: [ParamId; PARAM_COUNT] = [
        ParamId::Osc1Type,
        ParamId::Osc1Gain,
        ParamId::Osc1Octave,
        ParamId::Osc1Cents,
        ParamId::Osc1Push,
        ParamId::Osc2Type,
        ParamId::Osc2Gain,
        ParamId::Osc2Octave,
        ParamId::Osc2Cents,
        ParamId::Osc2Push,
        ParamId::NoiseOn,
        ParamId::NoiseGain,
        ParamId::NoiseFilter,
        ParamId::NoiseDuration,
        ParamId::LfoOn,
        ParamId::LfoType,
        ParamId::LfoAppliesTo,
        ParamId::LfoFrequency,
        ParamId::LfoDepth,
        ParamId::FilterOn,
        ParamId::FilterType,
        ParamId::FilterAppliesTo,
        ParamId::FilterFreq,
        ParamId::FilterQ,
        ParamId::FilterAttack,
        ParamId::FilterDecay,
        ParamId::FilterSustain,
        ParamId::FilterRelease,
        ParamId::AmpEnvAttack,
        ParamId::AmpEnvDecay,
        ParamId::AmpEnvSustain,
        ParamId::AmpEnvRelease,
        ParamId::AmpDistOn,
        ParamId::AmpDistGain,
        ParamId::AmpVolume,
        ParamId::DelayOn,
        ParamId::DelayType,
        ParamId::DelayTime,
        ParamId::DelayWetLevel,
        ParamId::DelayDryLevel,
        ParamId::DelayFeedback,
        ParamId::DelayDepth,
        ParamId::ReverbOn,
        ParamId::ReverbRoomSize,
        ParamId::ReverbDamping,
        ParamId::ReverbWetLevel,
        ParamId::ReverbDryLevel,
        ParamId::ReverbWidth,
    ];

    /// Position in [`DESCRIPTORS`] and in the value store.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Metadata for this parameter.
    #[inline]
    pub fn descriptor(self) -> &'static ParamDescriptor {
        &DESCRIPTORS[self.index()]
    }

    /// Stable string id, e.g. `"filter_freq"`.
    pub fn string_id(self) -> &'static str {
        self.descriptor().string_id
    }

    /// Look a parameter up by its string id.
    pub fn from_string_id(id: &str) -> Option<ParamId> {
        ParamId::ALL.into_iter().find(|p| p.string_id() == id)
    }
}

/// Live parameter values shared between the control and audio threads.
///
/// Control code writes with [`set`](Self::set) (clamped to the descriptor
/// range); the engine only reads. Reads of different parameters are not
/// transactionally consistent, which is fine for audio use.
///
/// Wrap in an `Arc` to share it with a [`Synth`](crate::Synth).
#[derive(Debug)]
pub struct SynthParams {
    values: [AtomicU32; PARAM_COUNT],
}

impl Default for SynthParams {
    fn default() -> Self {
        Self::new()
    }
}

impl SynthParams {
    /// Create a store holding every parameter's default.
    pub fn new() -> Self {
        Self {
            values: core::array::from_fn(|i| AtomicU32::new(DESCRIPTORS[i].default.to_bits())),
        }
    }

    /// Current plain value.
    #[inline]
    pub fn get(&self, id: ParamId) -> f32 {
        f32::from_bits(self.values[id.index()].load(Ordering::Acquire))
    }

    /// Store `value`, clamped to the parameter's range. Returns what was stored.
    pub fn set(&self, id: ParamId, value: f32) -> f32 {
        let clamped = id.descriptor().clamp(value);
        self.values[id.index()].store(clamped.to_bits(), Ordering::Release);
        clamped
    }

    /// Current value mapped to `[0, 1]`.
    pub fn normalized(&self, id: ParamId) -> f32 {
        id.descriptor().normalize(self.get(id))
    }

    /// Store a value given in normalised `[0, 1]` host space.
    pub fn set_normalized(&self, id: ParamId, normalized: f32) -> f32 {
        self.set(id, id.descriptor().denormalize(normalized))
    }

    /// Boolean view of a toggle parameter.
    #[inline]
    pub fn flag(&self, id: ParamId) -> bool {
        self.get(id) >= 0.5
    }

    /// Decode a choice parameter.
    #[inline]
    pub fn choice<T: ChoiceParam>(&self, id: ParamId) -> T {
        T::from_index(self.get(id).max(0.0) as usize)
    }

    /// Restore every parameter to its default.
    pub fn reset_to_defaults(&self) {
        for id in ParamId::ALL {
            self.set(id, id.descriptor().default);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_order_matches_ids() {
        for (i, id) in ParamId::ALL.into_iter().enumerate() {
            assert_eq!(id.index(), i, "{id:?} is out of order");
        }
    }

    #[test]
    fn test_string_ids_unique_and_resolvable() {
        for id in ParamId::ALL {
            assert_eq!(ParamId::from_string_id(id.string_id()), Some(id));
        }
        assert_eq!(ParamId::from_string_id("nope"), None);
        assert_eq!(ParamId::DelayTime.string_id(), "delay_delay_time");
    }

    #[test]
    fn test_defaults() {
        let p = SynthParams::new();
        assert_eq!(p.get(ParamId::Osc1Gain), 0.5);
        assert_eq!(p.get(ParamId::FilterFreq), 20000.0);
        assert!(p.flag(ParamId::FilterOn));
        assert!(!p.flag(ParamId::LfoOn));
        assert_eq!(p.choice::<DelayMode>(ParamId::DelayType), DelayMode::PingPong);
        assert_eq!(p.choice::<FilterMode>(ParamId::FilterType), FilterMode::Lowpass);
    }

    #[test]
    fn test_defaults_lie_in_range() {
        for d in &DESCRIPTORS {
            assert!(d.contains(d.default), "{} default out of range", d.string_id);
        }
    }

    #[test]
    fn test_set_clamps_and_rounds() {
        let p = SynthParams::new();
        assert_eq!(p.set(ParamId::Osc1Octave, 7.6), 2.0);
        assert_eq!(p.set(ParamId::LfoAppliesTo, 3.2), 3.0);
        assert_eq!(p.set(ParamId::DelayDepth, 0.0), 0.5);
    }

    #[test]
    fn test_normalized_access() {
        let p = SynthParams::new();
        p.set_normalized(ParamId::AmpVolume, 1.0);
        assert_eq!(p.get(ParamId::AmpVolume), 1.0);
        assert_eq!(p.normalized(ParamId::AmpVolume), 1.0);
    }

    #[test]
    fn test_reset_to_defaults() {
        let p = SynthParams::new();
        p.set(ParamId::ReverbWidth, 0.2);
        p.set(ParamId::NoiseOn, 1.0);
        p.reset_to_defaults();
        assert_eq!(p.get(ParamId::ReverbWidth), 1.0);
        assert!(!p.flag(ParamId::NoiseOn));
    }
}
