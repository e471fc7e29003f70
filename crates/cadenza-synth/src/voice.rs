//! Voices and the fixed voice pool.
//!
//! A [`Voice`] sequences its components per sample:
//!
//! ```text
//! lfo[i] ─┬─> osc1 ─┐
//!         ├─> osc2 ─┼─(+)─> filter ─> amp ─> += every output channel
//!         │  noise ─┘          ^        ^
//!         └────────────────────┴────────┘
//! ```
//!
//! Noise and amplifier settings are refreshed once per block; the
//! oscillators and the filter re-read their parameters every sample.
//!
//! Lifecycle: idle → note-on → playing → note-off with tail → releasing →
//! amp envelope closed → idle. A note-off without tail goes straight to idle.

use crate::amp::Amplifier;
use crate::filter::VoiceFilter;
use crate::lfo::LfoRouting;
use crate::noise::NoiseGenerator;
use crate::oscillator::{OscSlot, Oscillator};
use crate::params::SynthParams;

/// Number of voices in a [`VoicePool`].
pub const VOICE_COUNT: usize = 16;

/// Everything a voice needs to render one block.
///
/// `lfo` holds one modulation sample per output sample; its length is the
/// block length.
#[derive(Debug, Clone, Copy)]
pub struct BlockContext<'a> {
    /// Parameter store.
    pub params: &'a SynthParams,
    /// Sample rate in Hz.
    pub sample_rate: f32,
    /// LFO destinations for this block.
    pub routing: LfoRouting,
    /// LFO samples for this block.
    pub lfo: &'a [f32],
}

/// One monophonic synthesis unit.
///
/// # Example
///
/// ```rust
/// use cadenza_synth::{BlockContext, LfoRouting, SynthParams, Voice};
///
/// let params = SynthParams::new();
/// let lfo = [0.0f32; 64];
/// let block = BlockContext { params: &params, sample_rate: 48000.0, routing: LfoRouting::default(), lfo: &lfo };
///
/// let mut voice = Voice::new(48000.0, 1);
/// voice.start_note(69, 440.0, 1.0);
///
/// let mut out = [0.0f32; 64];
/// voice.render(&block, &mut [&mut out[..]], 0);
/// assert!(out.iter().any(|s| *s != 0.0));
/// ```
#[derive(Debug, Clone)]
pub struct Voice {
    osc1: Oscillator,
    osc2: Oscillator,
    noise: NoiseGenerator,
    filter: VoiceFilter,
    amp: Amplifier,
    playing: bool,
    releasing: bool,
    note: u8,
    frequency: f32,
    /// Note-on order stamp, for stealing.
    age: u64,
}

impl Voice {
    /// Create an idle voice. `seed` picks the noise sequence.
    pub fn new(sample_rate: f32, seed: u32) -> Self {
        Self {
            osc1: Oscillator::new(OscSlot::One),
            osc2: Oscillator::new(OscSlot::Two),
            noise: NoiseGenerator::new(sample_rate, seed),
            filter: VoiceFilter::new(sample_rate),
            amp: Amplifier::new(sample_rate),
            playing: false,
            releasing: false,
            note: 0,
            frequency: 0.0,
            age: 0,
        }
    }

    /// Start `note` at `frequency` Hz with `velocity` in [0, 1].
    pub fn start_note(&mut self, note: u8, frequency: f32, velocity: f32) {
        self.note = note;
        self.frequency = frequency;
        self.osc1.start_note(frequency);
        self.osc2.start_note(frequency);
        self.noise.start_note();
        self.filter.start_note();
        self.amp.start_note(velocity);
        self.playing = true;
        self.releasing = false;
    }

    /// Release the note. Without `allow_tail_off` the voice stops at once.
    pub fn stop_note(&mut self, allow_tail_off: bool) {
        if !self.playing {
            return;
        }
        if allow_tail_off {
            self.releasing = true;
            self.noise.stop_note();
            self.filter.stop_note();
            self.amp.stop_note();
        } else {
            self.clear_note();
        }
    }

    fn clear_note(&mut self) {
        self.playing = false;
        self.releasing = false;
        self.amp.reset();
    }

    /// Add this voice's output for `block.lfo.len()` samples into every
    /// channel, starting at `start`.
    ///
    /// Does nothing while idle. A releasing voice whose amplifier closes
    /// returns to idle mid-block and contributes nothing further.
    pub fn render(&mut self, block: &BlockContext<'_>, channels: &mut [&mut [f32]], start: usize) {
        if !self.playing {
            return;
        }
        let params = block.params;
        let sr = block.sample_rate;
        let route = block.routing;

        self.noise.update_params(params, sr);
        self.amp.update_params(params, sr);

        for (i, &lfo) in block.lfo.iter().enumerate() {
            self.osc1
                .update_params(params, sr, route.osc1_frequency(), route.osc1_cents(), lfo);
            self.osc2
                .update_params(params, sr, route.osc2_frequency(), route.osc2_cents(), lfo);

            let source = self.osc1.next_sample() + self.osc2.next_sample() + self.noise.next_sample();
            let filtered = self.filter.apply(
                params,
                sr,
                source,
                route.filter_frequency(),
                route.filter_q(),
                lfo,
            );
            let out = self
                .amp
                .apply(filtered, route.amp_volume(), route.amp_distortion(), lfo);

            for channel in channels.iter_mut() {
                if let Some(sample) = channel.get_mut(start + i) {
                    *sample += out;
                }
            }

            if self.releasing && self.amp.is_closed() {
                self.clear_note();
                break;
            }
        }
    }

    /// `true` from note-on until the voice returns to idle.
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// `true` while the release tail is sounding.
    pub fn is_releasing(&self) -> bool {
        self.releasing
    }

    /// MIDI note of the current (or last) note.
    pub fn note(&self) -> u8 {
        self.note
    }

    /// Note frequency in Hz.
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Note-on order stamp.
    pub fn age(&self) -> u64 {
        self.age
    }

    /// Set the note-on order stamp.
    pub fn set_age(&mut self, age: u64) {
        self.age = age;
    }

    /// Oscillator 1.
    pub fn osc1(&self) -> &Oscillator {
        &self.osc1
    }

    /// Oscillator 2.
    pub fn osc2(&self) -> &Oscillator {
        &self.osc2
    }

    /// The amplifier.
    pub fn amp(&self) -> &Amplifier {
        &self.amp
    }
}

/// Fixed pool of [`VOICE_COUNT`] voices.
///
/// Note-on takes the first idle voice, or steals the voice that started
/// longest ago. Re-triggering a note that is still held releases the old
/// voice first.
#[derive(Debug)]
pub struct VoicePool {
    voices: [Voice; VOICE_COUNT],
    age_counter: u64,
}

impl VoicePool {
    /// Create a pool of idle voices.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            voices: core::array::from_fn(|i| Voice::new(sample_rate, noise_seed(i))),
            age_counter: 0,
        }
    }

    /// Start `note` with MIDI `velocity` (0..=127). Returns the voice index.
    pub fn note_on(&mut self, note: u8, velocity: u8) -> usize {
        for voice in &mut self.voices {
            if voice.is_playing() && !voice.is_releasing() && voice.note() == note {
                voice.stop_note(true);
            }
        }

        let idx = self.allocate_voice();
        #[cfg(feature = "tracing")]
        {
            if self.voices[idx].is_playing() {
                tracing::debug!(
                    voice = idx,
                    stolen_note = self.voices[idx].note(),
                    note,
                    "voice stolen"
                );
            }
        }

        self.age_counter += 1;
        let voice = &mut self.voices[idx];
        voice.set_age(self.age_counter);
        voice.start_note(note, midi_to_freq(note), velocity_to_gain(velocity));
        idx
    }

    /// Release the held voice playing `note`.
    pub fn note_off(&mut self, note: u8, allow_tail_off: bool) {
        for voice in &mut self.voices {
            if voice.is_playing() && !voice.is_releasing() && voice.note() == note {
                voice.stop_note(allow_tail_off);
            }
        }
    }

    /// Release every voice.
    pub fn all_notes_off(&mut self, allow_tail_off: bool) {
        for voice in &mut self.voices {
            voice.stop_note(allow_tail_off);
        }
    }

    /// Number of voices not idle.
    pub fn active_voice_count(&self) -> usize {
        self.voices.iter().filter(|v| v.is_playing()).count()
    }

    /// Render every playing voice into `channels`.
    pub fn render(&mut self, block: &BlockContext<'_>, channels: &mut [&mut [f32]], start: usize) {
        for voice in &mut self.voices {
            voice.render(block, channels, start);
        }
    }

    /// Read access to the voices.
    pub fn voices(&self) -> &[Voice; VOICE_COUNT] {
        &self.voices
    }

    fn allocate_voice(&self) -> usize {
        if let Some(free) = self.voices.iter().position(|v| !v.is_playing()) {
            return free;
        }
        self.voices
            .iter()
            .enumerate()
            .min_by_key(|(_, v)| v.age())
            .map(|(i, _)| i)
            .unwrap_or(0)
    }
}

/// Distinct non-zero noise seed per voice slot.
fn noise_seed(index: usize) -> u32 {
    (index as u32 + 1).wrapping_mul(0x9E37_79B9) ^ 0x2545_F491
}

/// Convert MIDI note number to frequency in Hz.
///
/// Uses standard tuning: A4 (note 69) = 440 Hz.
#[inline]
pub fn midi_to_freq(note: u8) -> f32 {
    440.0 * libm::exp2f((f32::from(note) - 69.0) / 12.0)
}

/// Map MIDI velocity 0..=127 to a gain in [0, 1].
#[inline]
pub fn velocity_to_gain(velocity: u8) -> f32 {
    f32::from(velocity.min(127)) / 127.0
}

#[cfg(test)]
mod tests {
    extern crate alloc;
    use alloc::vec;
    use alloc::vec::Vec;

    use super::*;
    use crate::params::ParamId;

    const SR: f32 = 48000.0;

    fn render(voice: &mut Voice, params: &SynthParams, n: usize) -> Vec<f32> {
        let lfo = vec![0.0; n];
        let block = BlockContext {
            params,
            sample_rate: SR,
            routing: LfoRouting::default(),
            lfo: &lfo,
        };
        let mut out = vec![0.0; n];
        voice.render(&block, &mut [&mut out[..]], 0);
        out
    }

    fn short_release() -> SynthParams {
        let params = SynthParams::new();
        params.set(ParamId::AmpEnvAttack, 0.001);
        params.set(ParamId::AmpEnvRelease, 0.01);
        params
    }

    #[test]
    fn test_midi_to_freq_a4() {
        assert!((midi_to_freq(69) - 440.0).abs() < 1e-3);
        assert!((midi_to_freq(81) - 880.0).abs() < 1e-2);
        assert!((midi_to_freq(60) - 261.6256).abs() < 1e-2);
    }

    #[test]
    fn test_velocity_to_gain() {
        assert_eq!(velocity_to_gain(0), 0.0);
        assert_eq!(velocity_to_gain(127), 1.0);
        assert_eq!(velocity_to_gain(200), 1.0);
    }

    #[test]
    fn test_unstarted_voice_is_silent() {
        let params = SynthParams::new();
        let mut voice = Voice::new(SR, 1);
        let out = render(&mut voice, &params, 1024);
        assert!(out.iter().all(|s| *s == 0.0));
    }

    #[test]
    fn test_render_accumulates_into_all_channels() {
        let params = SynthParams::new();
        let mut voice = Voice::new(SR, 1);
        voice.start_note(69, 440.0, 1.0);
        let lfo = [0.0f32; 256];
        let block = BlockContext {
            params: &params,
            sample_rate: SR,
            routing: LfoRouting::default(),
            lfo: &lfo,
        };
        let mut left = [0.5f32; 256];
        let mut right = [0.0f32; 256];
        voice.render(&block, &mut [&mut left[..], &mut right[..]], 0);
        for (l, r) in left.iter().zip(right.iter()) {
            assert!((l - 0.5 - r).abs() < 1e-6, "same sample added to both channels");
        }
        assert!(right.iter().any(|s| *s != 0.0));
    }

    #[test]
    fn test_release_returns_to_idle_mid_block() {
        let params = short_release();
        let mut voice = Voice::new(SR, 1);
        voice.start_note(60, midi_to_freq(60), 1.0);
        render(&mut voice, &params, 4800);
        voice.stop_note(true);
        assert!(voice.is_playing() && voice.is_releasing());

        // 10 ms release = 480 samples.
        let out = render(&mut voice, &params, 1024);
        assert!(!voice.is_playing());
        assert!(out[600..].iter().all(|s| *s == 0.0), "nothing after the voice frees itself");
    }

    #[test]
    fn test_stop_without_tail_is_immediate() {
        let params = SynthParams::new();
        let mut voice = Voice::new(SR, 1);
        voice.start_note(60, 261.6, 1.0);
        render(&mut voice, &params, 128);
        voice.stop_note(false);
        assert!(!voice.is_playing());
        assert!(render(&mut voice, &params, 128).iter().all(|s| *s == 0.0));
    }

    #[test]
    fn test_pool_uses_idle_voices_first() {
        let mut pool = VoicePool::new(SR);
        let a = pool.note_on(60, 100);
        let b = pool.note_on(64, 100);
        assert_ne!(a, b);
        assert_eq!(pool.active_voice_count(), 2);
    }

    #[test]
    fn test_pool_steals_oldest() {
        let mut pool = VoicePool::new(SR);
        for n in 0..VOICE_COUNT as u8 {
            pool.note_on(40 + n, 100);
        }
        assert_eq!(pool.active_voice_count(), VOICE_COUNT);
        let idx = pool.note_on(100, 100);
        assert_eq!(idx, 0, "first note is the oldest");
        assert_eq!(pool.active_voice_count(), VOICE_COUNT);
        assert!(!pool.voices().iter().any(|v| v.note() == 40));
        assert!(pool.voices().iter().any(|v| v.note() == 41));
    }

    #[test]
    fn test_pool_note_off_and_all_notes_off() {
        let mut pool = VoicePool::new(SR);
        pool.note_on(60, 100);
        pool.note_on(64, 100);
        pool.note_off(60, false);
        assert_eq!(pool.active_voice_count(), 1);

        pool.note_on(67, 100);
        pool.all_notes_off(true);
        assert!(pool.voices().iter().filter(|v| v.is_playing()).all(|v| v.is_releasing()));
        pool.all_notes_off(false);
        assert_eq!(pool.active_voice_count(), 0);
    }

    #[test]
    fn test_retrigger_releases_previous_voice() {
        let mut pool = VoicePool::new(SR);
        let first = pool.note_on(60, 100);
        let second = pool.note_on(60, 100);
        assert_ne!(first, second);
        assert!(pool.voices()[first].is_releasing());
        assert!(!pool.voices()[second].is_releasing());
    }

    #[test]
    fn test_noise_seeds_differ() {
        let seeds: Vec<u32> = (0..VOICE_COUNT).map(noise_seed).collect();
        for (i, a) in seeds.iter().enumerate() {
            assert_ne!(*a, 0);
            assert!(seeds[i + 1..].iter().all(|b| b != a));
        }
    }
}
