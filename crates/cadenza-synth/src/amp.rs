//! Voice output stage.
//!
//! Fixed order per sample:
//!
//! 1. `s = velocity × envelope × input`
//! 2. distortion on: `s = tanh(drive × s)` with `drive = max(0, g + lfo × g)`
//!    when the LFO targets distortion, else `g`
//! 3. `s × volume`, with `volume = clamp(v + lfo × v, 0, 1)` when the LFO
//!    targets volume, else `v`
//!
//! The envelope closing is the signal a releasing voice waits for.

use cadenza_core::soft_clip;

use crate::envelope::{AdsrEnvelope, AdsrParams};
use crate::params::{ParamId, SynthParams};

/// Parameter values the amplifier renders with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AmpSettings {
    /// Envelope timing.
    pub envelope: AdsrParams,
    /// Distortion switched on.
    pub distortion: bool,
    /// Distortion drive, ≥ 1.
    pub drive: f32,
    /// Master volume, 0..1.
    pub volume: f32,
}

impl Default for AmpSettings {
    fn default() -> Self {
        Self {
            envelope: AdsrParams {
                attack: 0.1,
                decay: 0.33,
                sustain: 0.5,
                release: 0.1,
            },
            distortion: false,
            drive: 1.0,
            volume: 0.1,
        }
    }
}

impl AmpSettings {
    /// Read the `amp_*` parameters.
    pub fn read(params: &SynthParams) -> Self {
        Self {
            envelope: AdsrParams {
                attack: params.get(ParamId::AmpEnvAttack),
                decay: params.get(ParamId::AmpEnvDecay),
                sustain: params.get(ParamId::AmpEnvSustain),
                release: params.get(ParamId::AmpEnvRelease),
            },
            distortion: params.flag(ParamId::AmpDistOn),
            drive: params.get(ParamId::AmpDistGain),
            volume: params.get(ParamId::AmpVolume),
        }
    }
}

/// Envelope-shaped, velocity-scaled, optionally distorted gain stage.
///
/// ```rust
/// use cadenza_synth::{AdsrParams, AmpSettings, Amplifier};
///
/// let mut amp = Amplifier::new(48000.0);
/// amp.update(48000.0, AmpSettings {
///     envelope: AdsrParams { attack: 0.0, decay: 0.0, sustain: 1.0, release: 0.0 },
///     volume: 1.0,
///     ..AmpSettings::default()
/// });
/// amp.start_note(0.5);
/// assert_eq!(amp.apply(0.8, false, false, 0.0), 0.4);
/// ```
#[derive(Debug, Clone)]
pub struct Amplifier {
    envelope: AdsrEnvelope,
    velocity: f32,
    settings: AmpSettings,
}

impl Amplifier {
    /// Create an idle amplifier.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            envelope: AdsrEnvelope::new(sample_rate),
            velocity: 0.0,
            settings: AmpSettings::default(),
        }
    }

    /// Restart the envelope and latch `velocity` (0..1) for the note.
    pub fn start_note(&mut self, velocity: f32) {
        self.velocity = velocity.clamp(0.0, 1.0);
        self.envelope.note_on();
    }

    /// Release the envelope.
    pub fn stop_note(&mut self) {
        self.envelope.note_off();
    }

    /// Silence immediately.
    pub fn reset(&mut self) {
        self.envelope.reset();
    }

    /// Re-read the `amp_*` parameters.
    pub fn update_params(&mut self, params: &SynthParams, sample_rate: f32) {
        self.update(sample_rate, AmpSettings::read(params));
    }

    /// Apply `settings` at `sample_rate`.
    pub fn update(&mut self, sample_rate: f32, settings: AmpSettings) {
        self.settings = settings;
        self.envelope.set_sample_rate(sample_rate);
        self.envelope.set_params(settings.envelope);
    }

    /// Shape one sample. Advances the envelope.
    #[inline]
    pub fn apply(&mut self, sample: f32, lfo_volume: bool, lfo_distortion: bool, lfo: f32) -> f32 {
        let mut out = sample * self.velocity * self.envelope.next_sample();

        if self.settings.distortion {
            let base = self.settings.drive;
            let drive = if lfo_distortion {
                (base + lfo * base).max(0.0)
            } else {
                base
            };
            out = soft_clip(out, drive);
        }

        let base = self.settings.volume;
        let volume = if lfo_volume {
            (base + lfo * base).clamp(0.0, 1.0)
        } else {
            base
        };
        out * volume
    }

    /// `true` once the envelope has released to silence.
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.envelope.is_closed()
    }

    /// Velocity latched by the last note-on.
    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    /// The amplitude envelope.
    pub fn envelope(&self) -> &AdsrEnvelope {
        &self.envelope
    }
}
