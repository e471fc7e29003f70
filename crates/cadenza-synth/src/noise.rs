//! Envelope-gated coloured noise source.
//!
//! White noise from a xorshift32 generator, darkened by a one-pole lowpass
//! whose cutoff follows the colour parameter, then shaped by a private
//! percussive envelope: fixed 10 ms attack and release, zero sustain, and a
//! decay set by the duration parameter. Selecting the maximum duration holds
//! the noise for as long as the note does.

use cadenza_core::OnePole;

use crate::envelope::{AdsrEnvelope, AdsrParams};
use crate::params::{NOISE_DURATION_MAX, ParamId, SynthParams};

/// Attack and release of the noise envelope, in seconds.
pub const NOISE_EDGE_SECS: f32 = 0.01;
/// Decay used when the duration parameter is at its maximum.
pub const SUSTAINED_DECAY_SECS: f32 = 10_000.0;
/// Cutoff at colour 0.
pub const COLOUR_MIN_HZ: f32 = 20.0;
/// Cutoff span covered by colour 0..1.
pub const COLOUR_SPAN_HZ: f32 = 5000.0;

/// Parameter values the noise generator renders with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NoiseSettings {
    /// Whether the generator sounds at all.
    pub enabled: bool,
    /// Output gain.
    pub gain: f32,
    /// Colour, 0 (dark) to 1 (bright).
    pub colour: f32,
    /// Decay time in seconds; [`NOISE_DURATION_MAX`] means sustained.
    pub duration: f32,
}

impl NoiseSettings {
    /// Read the `noise_*` parameters.
    pub fn read(params: &SynthParams) -> Self {
        Self {
            enabled: params.flag(ParamId::NoiseOn),
            gain: params.get(ParamId::NoiseGain),
            colour: params.get(ParamId::NoiseFilter),
            duration: params.get(ParamId::NoiseDuration),
        }
    }

    /// Lowpass cutoff for this colour.
    pub fn cutoff_hz(&self) -> f32 {
        self.colour.clamp(0.0, 1.0) * COLOUR_SPAN_HZ + COLOUR_MIN_HZ
    }

    /// Envelope decay for this duration.
    pub fn decay_secs(&self) -> f32 {
        if self.duration >= NOISE_DURATION_MAX {
            SUSTAINED_DECAY_SECS
        } else {
            self.duration.max(0.0)
        }
    }
}

/// Noise generator with its own envelope.
#[derive(Debug, Clone)]
pub struct NoiseGenerator {
    rng_state: u32,
    filter: OnePole,
    envelope: AdsrEnvelope,
    enabled: bool,
    gain: f32,
}

impl NoiseGenerator {
    /// Create a generator. `seed` selects the random sequence; zero is
    /// replaced by a fixed non-zero seed.
    pub fn new(sample_rate: f32, seed: u32) -> Self {
        Self {
            rng_state: if seed == 0 { 0x9E37_79B9 } else { seed },
            filter: OnePole::new(sample_rate, COLOUR_MIN_HZ + COLOUR_SPAN_HZ),
            envelope: AdsrEnvelope::new(sample_rate),
            enabled: false,
            gain: 0.0,
        }
    }

    /// Clear the colour filter and restart the envelope.
    pub fn start_note(&mut self) {
        self.filter.reset();
        self.envelope.note_on();
    }

    /// Release the envelope.
    pub fn stop_note(&mut self) {
        self.envelope.note_off();
    }

    /// Re-read the `noise_*` parameters.
    pub fn update_params(&mut self, params: &SynthParams, sample_rate: f32) {
        self.update(sample_rate, NoiseSettings::read(params));
    }

    /// Apply `settings` at `sample_rate`.
    pub fn update(&mut self, sample_rate: f32, settings: NoiseSettings) {
        self.enabled = settings.enabled;
        self.gain = settings.gain;
        self.filter.set_sample_rate(sample_rate);
        self.filter.set_frequency(settings.cutoff_hz());
        self.envelope.set_sample_rate(sample_rate);
        self.envelope.set_params(AdsrParams {
            attack: NOISE_EDGE_SECS,
            decay: settings.decay_secs(),
            sustain: 0.0,
            release: NOISE_EDGE_SECS,
        });
    }

    /// Next noise sample, or 0 while disabled.
    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        if !self.enabled {
            return 0.0;
        }
        let white = self.next_white();
        let coloured = self.filter.process(white);
        coloured * self.envelope.next_sample() * self.gain
    }

    /// The private envelope.
    pub fn envelope(&self) -> &AdsrEnvelope {
        &self.envelope
    }

    /// Uniform value in [-1, 1] from xorshift32.
    #[inline]
    fn next_white(&mut self) -> f32 {
        let mut x = self.rng_state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.rng_state = x;
        (x as f32 / u32::MAX as f32) * 2.0 - 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::EnvelopeState;

    const SR: f32 = 48000.0;

    fn settings(duration: f32) -> NoiseSettings {
        NoiseSettings {
            enabled: true,
            gain: 1.0,
            colour: 1.0,
            duration,
        }
    }

    #[test]
    fn test_disabled_is_silent() {
        let mut noise = NoiseGenerator::new(SR, 1);
        noise.update(
            SR,
            NoiseSettings {
                enabled: false,
                ..settings(1.0)
            },
        );
        noise.start_note();
        for _ in 0..1000 {
            assert_eq!(noise.next_sample(), 0.0);
        }
    }

    #[test]
    fn test_white_is_uniform_in_range() {
        let mut noise = NoiseGenerator::new(SR, 12345);
        let mut min = f32::MAX;
        let mut max = f32::MIN;
        let mut sum = 0.0f32;
        let n = 100_000;
        for _ in 0..n {
            let x = noise.next_white();
            assert!((-1.0..=1.0).contains(&x));
            min = min.min(x);
            max = max.max(x);
            sum += x;
        }
        assert!(min < -0.99 && max > 0.99, "range [{min}, {max}]");
        assert!((sum / n as f32).abs() < 0.02, "mean should be near 0");
    }

    #[test]
    fn test_percussive_gate_decays_to_silence() {
        let mut noise = NoiseGenerator::new(SR, 7);
        noise.update(SR, settings(0.1));
        noise.start_note();
        let mut peak_early = 0.0f32;
        for _ in 0..2400 {
            peak_early = peak_early.max(noise.next_sample().abs());
        }
        // 10 ms attack + 100 ms decay, then zero sustain.
        for _ in 0..4000 {
            noise.next_sample();
        }
        assert!(peak_early > 0.05, "noise should sound at note start");
        assert_eq!(noise.envelope().state(), EnvelopeState::Sustain);
        assert_eq!(noise.next_sample(), 0.0);
    }

    #[test]
    fn test_max_duration_is_sustained() {
        let s = settings(NOISE_DURATION_MAX);
        assert_eq!(s.decay_secs(), SUSTAINED_DECAY_SECS);
        assert_eq!(settings(2.5).decay_secs(), 2.5);

        let mut noise = NoiseGenerator::new(SR, 99);
        noise.update(SR, s);
        noise.start_note();
        for _ in 0..(SR as usize) {
            noise.next_sample();
        }
        assert!(noise.envelope().level() > 0.99, "still sounding after one second");
    }

    #[test]
    fn test_colour_maps_to_cutoff() {
        let mut s = settings(1.0);
        s.colour = 0.0;
        assert_eq!(s.cutoff_hz(), 20.0);
        s.colour = 1.0;
        assert_eq!(s.cutoff_hz(), 5020.0);
    }

    #[test]
    fn test_stop_note_releases() {
        let mut noise = NoiseGenerator::new(SR, 3);
        noise.update(SR, settings(NOISE_DURATION_MAX));
        noise.start_note();
        for _ in 0..1000 {
            noise.next_sample();
        }
        noise.stop_note();
        for _ in 0..480 {
            noise.next_sample();
        }
        assert!(noise.envelope().is_closed());
    }
}
