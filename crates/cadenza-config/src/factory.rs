//! Built-in patches.

use cadenza_synth::ParamId;

use crate::patch::Patch;

/// Names of the built-in patches, in listing order.
pub const FACTORY_PATCH_NAMES: &[&str] = &["Init", "Pluck", "Pad", "Noise Hat"];

/// Every built-in patch.
pub fn factory_patches() -> Vec<Patch> {
    vec![init(), pluck(), pad(), noise_hat()]
}

/// Look up a built-in patch by name, case-insensitively.
pub fn factory_patch(name: &str) -> Option<Patch> {
    factory_patches()
        .into_iter()
        .find(|p| p.name.eq_ignore_ascii_case(name))
}

fn init() -> Patch {
    Patch::new("Init").with_description("Every parameter at its default")
}

fn pluck() -> Patch {
    Patch::new("Pluck")
        .with_description("Short filtered saw with a dotted echo")
        .with_param(ParamId::Osc1Type, 5.0)
        .with_param(ParamId::Osc2Type, 5.0)
        .with_param(ParamId::Osc2Cents, 7.0)
        .with_param(ParamId::FilterFreq, 2400.0)
        .with_param(ParamId::FilterQ, 4.0)
        .with_param(ParamId::FilterAttack, 0.0)
        .with_param(ParamId::FilterDecay, 0.2)
        .with_param(ParamId::FilterSustain, 0.0)
        .with_param(ParamId::AmpEnvAttack, 0.001)
        .with_param(ParamId::AmpEnvDecay, 0.3)
        .with_param(ParamId::AmpEnvSustain, 0.0)
        .with_param(ParamId::AmpEnvRelease, 0.2)
        .with_param(ParamId::DelayOn, true)
        .with_param(ParamId::DelayTime, 0.375)
        .with_param(ParamId::DelayWetLevel, 0.3)
        .with_param(ParamId::DelayFeedback, 0.35)
}

fn pad() -> Patch {
    Patch::new("Pad")
        .with_description("Slow detuned pad with a drifting filter")
        .with_param(ParamId::Osc1Type, 1.0)
        .with_param(ParamId::Osc2Type, 5.0)
        .with_param(ParamId::Osc2Cents, -8.0)
        .with_param(ParamId::LfoOn, true)
        .with_param(ParamId::LfoAppliesTo, 6.0)
        .with_param(ParamId::LfoFrequency, 0.3)
        .with_param(ParamId::LfoDepth, 0.3)
        .with_param(ParamId::FilterFreq, 3000.0)
        .with_param(ParamId::AmpEnvAttack, 0.8)
        .with_param(ParamId::AmpEnvSustain, 0.8)
        .with_param(ParamId::AmpEnvRelease, 1.0)
        .with_param(ParamId::ReverbOn, true)
        .with_param(ParamId::ReverbRoomSize, 0.85)
        .with_param(ParamId::ReverbWetLevel, 0.5)
}

fn noise_hat() -> Patch {
    Patch::new("Noise Hat")
        .with_description("High-passed noise burst")
        .with_param(ParamId::Osc1Gain, 0.0)
        .with_param(ParamId::Osc2Gain, 0.0)
        .with_param(ParamId::NoiseOn, true)
        .with_param(ParamId::NoiseGain, 0.8)
        .with_param(ParamId::NoiseDuration, 0.05)
        .with_param(ParamId::FilterType, 1.0)
        .with_param(ParamId::FilterFreq, 6000.0)
        .with_param(ParamId::AmpEnvAttack, 0.001)
        .with_param(ParamId::AmpEnvDecay, 0.05)
        .with_param(ParamId::AmpEnvSustain, 0.0)
        .with_param(ParamId::AmpEnvRelease, 0.05)
}
